//! Application configuration
//!
//! Central location for constants, defaults and the runtime paths
//! derived from the data directory.

use std::path::{Path, PathBuf};

// ===== Storage =====

/// File holding the JSON array of item records
pub const ITEMS_FILE_NAME: &str = "items.json";

/// File holding the dashboard capability secret
pub const SECRET_FILE_NAME: &str = ".dashboard_secret";

/// Directory name used under the platform data directory
pub const APP_DIR_NAME: &str = "grabbit";

/// Number of characters kept from a v4 UUID for item ids
pub const ITEM_ID_LENGTH: usize = 8;

// ===== Server =====

/// Default bind address for the dashboard/API server
pub const DEFAULT_ADDR: &str = "0.0.0.0:4002";

/// Length of a generated dashboard secret
pub const SECRET_LENGTH: usize = 32;

/// Minimum accepted length for a user-supplied secret.
/// Shorter values are trivially guessable as a path segment.
pub const MIN_SECRET_LENGTH: usize = 8;

// ===== Facade defaults =====

/// Default window for recent purchases, in days
pub const DEFAULT_RECENT_DAYS: i64 = 7;

/// Upper bound for the recent purchases window (ten years)
pub const MAX_RECENT_DAYS: i64 = 3650;

pub const DEFAULT_FOR_PERSON: &str = "self";

pub const DEFAULT_SOURCE: &str = "manual";

/// Source tag used for items brought in by the list importer
pub const IMPORT_SOURCE: &str = "google_keep";

/// Resolved runtime paths
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
}

impl AppConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Platform default: `<data dir>/grabbit`, falling back to `./data`
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("data"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn items_path(&self) -> PathBuf {
        self.data_dir.join(ITEMS_FILE_NAME)
    }

    pub fn secret_path(&self) -> PathBuf {
        self.data_dir.join(SECRET_FILE_NAME)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(Self::default_data_dir())
    }
}
