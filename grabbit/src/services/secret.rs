//! Dashboard secret
//!
//! The dashboard is served under a capability URL: every route sits
//! below `/{secret}/`. The secret is generated once and stored next to
//! the data file.

use crate::config::{MIN_SECRET_LENGTH, SECRET_LENGTH};
use crate::error::{AppError, Result};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::path::Path;
use tokio::fs;

/// Loads the stored secret or creates a new one
pub struct SecretManager;

impl SecretManager {
    /// Read the secret at `path`, generating and saving one if missing
    pub async fn load_or_create(path: &Path) -> Result<String> {
        if fs::try_exists(path).await? {
            let secret = fs::read_to_string(path).await?.trim().to_string();
            Self::validate(&secret)?;
            tracing::info!("Dashboard secret loaded from {:?}", path);
            return Ok(secret);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let secret = Self::generate();
        fs::write(path, &secret).await?;
        tracing::info!("Dashboard secret created at {:?}", path);

        Ok(secret)
    }

    /// Random alphanumeric token
    pub fn generate() -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SECRET_LENGTH)
            .map(char::from)
            .collect()
    }

    /// A secret must be usable as a single URL path segment
    pub fn validate(secret: &str) -> Result<()> {
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(AppError::InvalidInput(format!(
                "dashboard secret must be at least {} characters",
                MIN_SECRET_LENGTH
            )));
        }
        if !secret
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(AppError::InvalidInput(
                "dashboard secret may only contain letters, digits, '-' and '_'".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_secret_created_once() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".dashboard_secret");

        let first = SecretManager::load_or_create(&path).await.unwrap();
        assert_eq!(first.len(), SECRET_LENGTH);
        assert!(path.exists());

        let second = SecretManager::load_or_create(&path).await.unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_validate() {
        assert!(SecretManager::validate("abc").is_err());
        assert!(SecretManager::validate("has/slash-in-it").is_err());
        assert!(SecretManager::validate("Good_secret-123").is_ok());
        assert!(SecretManager::validate(&SecretManager::generate()).is_ok());
    }
}
