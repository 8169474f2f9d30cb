//! # Store Error Types
//!
//! Errors raised by the I/O seams of the store. Cart command failures are
//! `shoecart_core::CartError`; these types cover what happens around them.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  StoreError (CartStore::open)                                           │
//! │  ├── Config   ◄── ConfigError   (file, TOML, URL, validation)          │
//! │  ├── Storage  ◄── StorageError  (I/O, key)                             │
//! │  └── Gateway  ◄── GatewayError  (HTTP client construction)             │
//! │                                                                         │
//! │  StorageError is also folded into CartError::Storage when a snapshot   │
//! │  write fails mid-command.                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use shoecart_core::GatewayError;
use thiserror::Error;

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Storage Error
// =============================================================================

/// Key-value storage failures.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying file system error.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key cannot be mapped to a storage location.
    #[error("Invalid storage key: '{0}'")]
    InvalidKey(String),

    /// No platform data directory could be determined.
    #[error("Could not determine app data directory")]
    NoDataDir,
}

// =============================================================================
// Config Error
// =============================================================================

/// Configuration loading and validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read or written.
    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for `CartConfig`.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be serialized.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Catalog base URL is unusable.
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),

    /// Any other rule violation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// =============================================================================
// Store Error
// =============================================================================

/// Failures while assembling a `CartStore` from configuration.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
