//! Durable local storage for the engagement record.
//!
//! Storage is modeled as a single key-value entry: one well-known key
//! ([`STORAGE_KEY`]) maps to one serialized text value. The [`RecordStore`]
//! trait keeps the tracker independent of where that value lives, so hosts
//! inject the implementation they need ([`FileStore`] for durability,
//! [`MemoryStore`] for tests or diskless environments).
//!
//! # Error Handling
//!
//! Every operation returns an explicit [`Result`]. The store reports what
//! happened; deciding whether a failure is tolerable is the caller's
//! concern. Notably, a missing value is `Ok(None)`, not an error.
//!
//! # Concurrency
//!
//! [`FileStore`] replaces the whole value atomically (write to a sibling
//! temp file, then rename), so concurrent writers converge on the last
//! writer. No cross-process coordination is attempted.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use thiserror::Error;
use tracing::trace;

/// Well-known key under which the engagement record is stored.
///
/// For [`FileStore`] this becomes the file stem of the record file.
pub const STORAGE_KEY: &str = "engagement";

/// Errors that can occur during storage operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// File system I/O failed (permissions, disk full, etc.).
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing store cannot be used.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A durable key-value slot holding the serialized engagement record.
///
/// Implementations store exactly one value (the one under [`STORAGE_KEY`]).
/// The value is opaque text; serialization and parsing happen above this
/// trait.
pub trait RecordStore {
    /// Reads the stored value.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the value exists but cannot be read.
    fn read(&self) -> Result<Option<String>, StoreError>;

    /// Replaces the stored value.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the value cannot be written.
    fn write(&self, value: &str) -> Result<(), StoreError>;

    /// Removes the stored value.
    ///
    /// Clearing an already-empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the value exists but cannot be removed.
    fn clear(&self) -> Result<(), StoreError>;
}

/// File-backed record store.
///
/// The record lives at `<data_dir>/engagement.json`. Writes replace the
/// file atomically via a sibling temp file and rename.
///
/// # Example
///
/// ```no_run
/// use engage_tracker::store::{FileStore, RecordStore};
///
/// let store = FileStore::new("/home/user/.engage".as_ref());
/// assert!(store.read().unwrap().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `data_dir`.
    ///
    /// The directory is created lazily on first write, so constructing a
    /// store never touches the file system.
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(format!("{STORAGE_KEY}.json")),
        }
    }

    /// Path of the record file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for FileStore {
    fn read(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(None),
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, value: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Whole-value replace: never leave a half-written record behind.
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, value)?;
        fs::rename(&tmp_path, &self.path)?;

        trace!(path = %self.path.display(), bytes = value.len(), "Record written");
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory record store.
///
/// Useful in tests and for hosts without a writable data directory. The
/// value lives only as long as the store itself.
#[derive(Debug, Default)]
pub struct MemoryStore {
    value: RwLock<Option<String>>,
}

impl MemoryStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn read(&self) -> Result<Option<String>, StoreError> {
        let guard = self
            .value
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn write(&self, value: &str) -> Result<(), StoreError> {
        let mut guard = self
            .value
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;
        *guard = Some(value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut guard = self
            .value
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;
        *guard = None;
        Ok(())
    }
}
