//! Application state and initialization
//!
//! This module is the composition root: it builds the store and facade
//! from configuration and makes them available through AppState.

use crate::config::AppConfig;
use crate::error::Result;
use crate::services::{Grabbit, SecretManager};
use crate::store::ItemStore;

/// Central application state shared with the HTTP layer
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub grabbit: Grabbit,
    /// Path segment every dashboard and API route sits under
    pub secret: String,
}

impl AppState {
    pub fn new(config: AppConfig, grabbit: Grabbit, secret: String) -> Self {
        Self {
            config,
            grabbit,
            secret,
        }
    }

    /// Open the store and resolve the dashboard secret.
    /// An explicit secret takes precedence over the stored one.
    pub async fn initialize(config: AppConfig, secret: Option<String>) -> Result<Self> {
        tracing::info!("Initializing application");

        let grabbit = open_grabbit(&config).await?;

        let secret = match secret {
            Some(secret) => {
                SecretManager::validate(&secret)?;
                secret
            }
            None => SecretManager::load_or_create(&config.secret_path()).await?,
        };

        tracing::info!("Application initialized successfully");

        Ok(Self::new(config, grabbit, secret))
    }
}

/// Open the item store under the configured data directory
pub async fn open_grabbit(config: &AppConfig) -> Result<Grabbit> {
    tracing::info!("Data directory: {:?}", config.data_dir());

    tokio::fs::create_dir_all(config.data_dir()).await?;
    let store = ItemStore::open(config.items_path()).await?;

    Ok(Grabbit::new(store))
}
