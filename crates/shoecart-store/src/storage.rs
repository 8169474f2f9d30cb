//! # Snapshot Storage
//!
//! A string key-value store, the same shape as browser `localStorage`.
//!
//! ## Implementations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  MemoryStorage                       FileStorage                        │
//! │  ─────────────                       ───────────                        │
//! │  • HashMap behind a Mutex            • One file per key                 │
//! │  • Cloned handles share data         • Write temp file, then rename     │
//! │  • Tests, embedded use               • Default dir from ProjectDirs     │
//! │                                        Linux: ~/.local/share/shoecart   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Whole-Snapshot Writes
//! `FileStorage::write` never leaves a half-written file behind: the value is
//! written to a uniquely named sibling and renamed over the target, which is
//! atomic on the same file system. A reader sees the old snapshot or the new
//! one, nothing in between.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use directories::ProjectDirs;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::{StorageError, StorageResult};

/// String key-value storage.
pub trait Storage: Send + Sync {
    /// Returns the value under `key`, or `None` if nothing was stored.
    fn read(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replaces the value under `key`.
    fn write(&self, key: &str, value: &str) -> StorageResult<()>;
}

// =============================================================================
// Memory Storage
// =============================================================================

/// In-process storage. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage pre-populated with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::new();
        storage.lock().insert(key.into(), value.into());
        storage
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// =============================================================================
// File Storage
// =============================================================================

/// Directory-backed storage, one file per key.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Opens storage rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        debug!(?dir, "File storage opened");
        Ok(FileStorage { dir })
    }

    /// Opens storage in the platform data directory.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.shoecart.shoecart/`
    /// - **Windows**: `%APPDATA%\shoecart\shoecart\data\`
    /// - **Linux**: `~/.local/share/shoecart/`
    pub fn in_default_location() -> StorageResult<Self> {
        let dir = default_data_dir().ok_or(StorageError::NoDataDir)?;
        Self::new(dir)
    }

    /// Directory holding the snapshot files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Maps a key to its file.
    ///
    /// `[A-Za-z0-9-]` is kept as is; every other byte, `_` included, becomes
    /// `_` plus two hex digits. Distinct keys never share a file.
    ///
    /// ```text
    /// "@RocketShoes:cart"  ──►  _40RocketShoes_3acart.json
    /// "a_b"                ──►  a_5fb.json
    /// ```
    pub fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        if key.trim().is_empty() {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        let mut name = String::with_capacity(key.len());
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' {
                name.push(char::from(byte));
            } else {
                name.push_str(&format!("_{:02x}", byte));
            }
        }

        Ok(self.dir.join(format!("{}.json", name)))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key)?;

        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, value), fields(bytes = value.len()))]
    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        let tmp = self.dir.join(format!(".{}.tmp", Uuid::new_v4()));

        let result = write_file(&tmp, value).and_then(|()| fs::rename(&tmp, &path));
        if let Err(e) = result {
            // Best effort; the temp file may not exist
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        debug!(?path, "Snapshot written");
        Ok(())
    }
}

fn write_file(path: &Path, value: &str) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(value.as_bytes())?;
    file.sync_all()
}

/// Platform data directory for the cart, if one can be determined.
pub fn default_data_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "shoecart", "shoecart").map(|dirs| dirs.data_dir().to_path_buf())
}
