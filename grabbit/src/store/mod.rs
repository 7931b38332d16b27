//! Store module
//!
//! This module provides the item store:
//! - Model definitions
//! - Input normalization tables
//! - The JSON-file repository for CRUD and query operations

pub mod models;
pub mod normalize;
pub mod repository;
pub mod timestamp;

pub use models::*;
pub use repository::ItemStore;
