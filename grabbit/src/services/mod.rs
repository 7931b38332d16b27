//! Services module
//!
//! Business logic that sits between the interface layers and the store.

pub mod grabbit;
pub mod import;
pub mod responses;
pub mod secret;

pub use grabbit::{Grabbit, ListQuery};
pub use responses::*;
pub use secret::SecretManager;
