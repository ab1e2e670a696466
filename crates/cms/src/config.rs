//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `ADMIN_EMAIL` - The only account allowed into the admin dashboard
//! - `GOOGLE_CLIENT_ID` - Client id of the Google sign-in widget
//! - `SITE_DATA_DIR` - Directory for file-backed storage (default: .soft-stories)
//!
//! Admin login is only available when both `ADMIN_EMAIL` and
//! `GOOGLE_CLIENT_ID` are set.

use std::path::PathBuf;

use soft_stories_core::Email;
use thiserror::Error;

use crate::auth::IdentityConfig;

const DEFAULT_DATA_DIR: &str = ".soft-stories";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Site configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Admin identity checked by the login gate.
    pub identity: IdentityConfig,
    /// Directory holding durable storage for file-backed contexts.
    pub data_dir: PathBuf,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            identity: IdentityConfig::default(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl SiteConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `ADMIN_EMAIL` is set but is not an email.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `ADMIN_EMAIL` is set but is not an email.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let admin_email = get("ADMIN_EMAIL")
            .map(|raw| {
                Email::parse(&raw)
                    .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_EMAIL".to_string(), e.to_string()))
            })
            .transpose()?;
        let client_id = get("GOOGLE_CLIENT_ID");
        let data_dir = get("SITE_DATA_DIR").map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);

        if client_id.is_none() {
            tracing::warn!("GOOGLE_CLIENT_ID is not set, admin login is disabled");
        }
        if admin_email.is_none() {
            tracing::warn!("ADMIN_EMAIL is not set, admin login is disabled");
        }

        Ok(Self {
            identity: IdentityConfig::new(admin_email, client_id),
            data_dir,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<SiteConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        SiteConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_empty_environment() {
        let config = load(&[]).unwrap();
        assert!(!config.identity.is_configured());
        assert_eq!(config.data_dir, PathBuf::from(".soft-stories"));
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn test_fully_configured() {
        let config = load(&[
            ("ADMIN_EMAIL", "admin@site.com"),
            ("GOOGLE_CLIENT_ID", "abc.apps.googleusercontent.com"),
            ("SITE_DATA_DIR", "/var/lib/site"),
        ])
        .unwrap();

        assert!(config.identity.is_configured());
        assert_eq!(
            config.identity.admin_email.as_ref().map(Email::as_str),
            Some("admin@site.com")
        );
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/site"));
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let config = load(&[("ADMIN_EMAIL", "admin@site.com"), ("GOOGLE_CLIENT_ID", "  ")]).unwrap();
        assert!(!config.identity.is_configured());
    }

    #[test]
    fn test_invalid_admin_email() {
        let err = load(&[("ADMIN_EMAIL", "not-an-email")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref var, _) if var == "ADMIN_EMAIL"));
    }
}
