//! Grabbit library
//!
//! Shopping list tracker: a JSON-file item store, the facade that agents
//! and the dashboard call, and the HTTP server that exposes it.

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod server;
pub mod services;
pub mod store;
