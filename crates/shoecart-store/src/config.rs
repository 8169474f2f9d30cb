//! # Cart Configuration
//!
//! Where the catalog lives and where the cart snapshot is kept.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SHOECART_API_URL=http://localhost:3333                             │
//! │     SHOECART_STORAGE_KEY=@RocketShoes:cart                             │
//! │     SHOECART_DATA_DIR=/var/lib/shoecart                                │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/shoecart/cart.toml (Linux)                               │
//! │     ~/Library/Application Support/com.shoecart.shoecart/cart.toml      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [catalog]
//! base_url = "http://localhost:3333"
//!
//! [storage]
//! key = "@RocketShoes:cart"
//! data_dir = "/var/lib/shoecart"  # optional
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use shoecart_core::DEFAULT_STORAGE_KEY;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Catalog Settings
// =============================================================================

/// Location of the catalog API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// API root; `/products/{id}` and `/stock/{id}` hang off it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:3333".to_string()
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            base_url: default_base_url(),
        }
    }
}

impl CatalogSettings {
    /// Parses `base_url`, accepting only http and https.
    pub fn url(&self) -> ConfigResult<Url> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::InvalidUrl(format!(
                "Catalog URL must use http or https, got: {}",
                other
            ))),
        }
    }
}

// =============================================================================
// Storage Settings
// =============================================================================

/// Where the snapshot is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Key the snapshot is stored under.
    #[serde(default = "default_storage_key")]
    pub key: String,

    /// Snapshot directory. Platform data dir when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            key: default_storage_key(),
            data_dir: None,
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete cart configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartConfig {
    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub storage: StorageSettings,
}

impl CartConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (cart.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading cart config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load cart config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML document. Missing sections fall back to defaults.
    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::InvalidConfig("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, toml::to_string_pretty(self)?)?;

        info!(?path, "Cart config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.catalog.url()?;

        if self.storage.key.trim().is_empty() {
            return Err(ConfigError::InvalidConfig("storage key must not be empty".into()));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Applies overrides from any variable source.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("SHOECART_API_URL") {
            debug!(url = %url, "Overriding catalog URL from environment");
            self.catalog.base_url = url;
        }

        if let Some(key) = lookup("SHOECART_STORAGE_KEY") {
            debug!(key = %key, "Overriding storage key from environment");
            self.storage.key = key;
        }

        if let Some(dir) = lookup("SHOECART_DATA_DIR") {
            debug!(dir = %dir, "Overriding data dir from environment");
            self.storage.data_dir = Some(PathBuf::from(dir));
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "shoecart", "shoecart")
            .map(|dirs| dirs.config_dir().join("cart.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CartConfig::default();
        assert_eq!(config.catalog.base_url, "http://localhost:3333");
        assert_eq!(config.storage.key, "@RocketShoes:cart");
        assert!(config.storage.data_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = CartConfig::from_toml(
            r#"
            [catalog]
            base_url = "https://api.rocketshoes.example"
            "#,
        )
        .unwrap();

        assert_eq!(config.catalog.base_url, "https://api.rocketshoes.example");
        assert_eq!(config.storage.key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn test_config_validation() {
        let mut config = CartConfig::default();

        config.catalog.base_url = "ws://localhost:3333".into();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl(_))));

        config.catalog.base_url = "not a url".into();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl(_))));

        config.catalog.base_url = "http://localhost:3333".into();
        config.storage.key = " ".into();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidConfig(_))));
    }

    #[test]
    fn test_overrides() {
        let mut config = CartConfig::default();
        config.apply_overrides(|name| match name {
            "SHOECART_API_URL" => Some("http://10.0.0.5:3333".to_string()),
            "SHOECART_DATA_DIR" => Some("/tmp/shoecart".to_string()),
            _ => None,
        });

        assert_eq!(config.catalog.base_url, "http://10.0.0.5:3333");
        assert_eq!(config.storage.key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/tmp/shoecart")));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.toml");

        let mut config = CartConfig::default();
        config.storage.key = "cart-test".into();
        config.save(Some(path.clone())).unwrap();

        let loaded = CartConfig::from_toml(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, config);
    }
}
