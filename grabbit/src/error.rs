//! Error types for Grabbit
//!
//! All errors use thiserror for structured error handling.
//! Domain errors are turned into failure responses by the facade;
//! persistence errors are the only ones that escape it.

use crate::store::Item;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Found {} items matching '{query}'", .matches.len())]
    AmbiguousItem { query: String, matches: Vec<Item> },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Template error: {0}")]
    Template(#[from] handlebars::RenderError),
}

impl AppError {
    /// Errors from the storage layer that have no recovery path
    pub fn is_persistence(&self) -> bool {
        matches!(self, AppError::Io(_) | AppError::Serialization(_))
    }
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
