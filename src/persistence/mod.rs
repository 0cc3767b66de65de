//! Snapshot persistence module
//!
//! Provides durability by rewriting the whole keyspace to disk after every
//! mutating command. Each namespace has its own file, in a compact binary
//! format with a checksum.

mod format;
mod reader;
mod restore;
mod writer;

pub use format::{SnapshotKind, FORMAT_VERSION};
pub use reader::SnapshotReader;
pub use restore::{restore_lists, restore_strings};
pub use writer::SnapshotWriter;

use crate::store::MemoryStore;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

/// File name of the string namespace snapshot
pub const STRINGS_FILE: &str = "strings.snap";

/// File name of the list namespace snapshot
pub const LISTS_FILE: &str = "lists.snap";

/// Snapshot errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("not a snapshot file (bad magic)")]
    BadMagic,

    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u8),

    #[error("expected a {expected:?} snapshot, found kind {found}")]
    WrongKind { expected: SnapshotKind, found: u8 },

    #[error("snapshot truncated")]
    Truncated,

    #[error("checksum mismatch: stored {stored:#x}, calculated {calculated:#x}")]
    ChecksumMismatch { stored: u64, calculated: u64 },

    #[error("unexpected bytes after the last record")]
    TrailingBytes,
}

/// Persistence configuration
#[derive(Debug, Clone)]
pub struct PersistenceConfig {
    /// Directory holding the snapshot files
    pub dir: PathBuf,
}

impl PersistenceConfig {
    /// Snapshots in `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        PersistenceConfig { dir: dir.into() }
    }

    /// Path of the string namespace file
    pub fn strings_path(&self) -> PathBuf {
        self.dir.join(STRINGS_FILE)
    }

    /// Path of the list namespace file
    pub fn lists_path(&self) -> PathBuf {
        self.dir.join(LISTS_FILE)
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        PersistenceConfig::new(".")
    }
}

/// What a startup load brought back
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub string_keys: usize,
    pub list_keys: usize,
}

/// Snapshot persistence
///
/// `save` and `load` never fail from the caller's point of view: errors
/// are logged and the in-memory state is left as it is.
pub struct Persistence {
    config: PersistenceConfig,
    writer: SnapshotWriter,
}

impl Persistence {
    /// Open the snapshot directory, creating it if needed
    ///
    /// A directory that cannot be created is logged; the server then runs
    /// without durable state and every save reports its own failure.
    pub fn open(config: PersistenceConfig) -> Self {
        if let Err(e) = std::fs::create_dir_all(&config.dir) {
            warn!("Cannot use snapshot directory {:?}: {}", config.dir, e);
        }

        let writer = SnapshotWriter::new(config.strings_path(), config.lists_path());
        Persistence { config, writer }
    }

    /// Load both snapshot files into the store
    ///
    /// Missing files mean there is nothing to load. A file that cannot be
    /// read or decoded is logged and its namespace stays empty.
    pub fn load(&self, store: &MemoryStore) -> LoadStats {
        let mut stats = LoadStats::default();

        let strings_path = self.config.strings_path();
        if strings_path.exists() {
            info!("Loading strings snapshot from {:?}", strings_path);
            match SnapshotReader::load(&strings_path).and_then(|r| r.strings()) {
                Ok(entries) => stats.string_keys = restore_strings(store, entries),
                Err(e) => warn!("Failed to load strings snapshot {:?}: {}", strings_path, e),
            }
        }

        let lists_path = self.config.lists_path();
        if lists_path.exists() {
            info!("Loading lists snapshot from {:?}", lists_path);
            match SnapshotReader::load(&lists_path).and_then(|r| r.lists()) {
                Ok(entries) => stats.list_keys = restore_lists(store, entries),
                Err(e) => warn!("Failed to load lists snapshot {:?}: {}", lists_path, e),
            }
        }

        // What is in memory now is what is on disk
        self.writer.mark_written(store.generation());

        info!(
            "Restored {} string keys and {} list keys",
            stats.string_keys, stats.list_keys
        );
        stats
    }

    /// Save the whole store, propagating errors
    ///
    /// Returns Ok(false) if the files already hold this state or a newer one.
    pub fn try_save(&self, store: &MemoryStore) -> Result<bool, PersistenceError> {
        let snapshot = store.snapshot();
        let written = self.writer.write(&snapshot)?;

        if written {
            debug!(
                "Saved snapshot generation {} ({} keys)",
                snapshot.generation,
                snapshot.key_count()
            );
        }
        Ok(written)
    }

    /// Save the whole store, logging any error
    pub fn save(&self, store: &MemoryStore) {
        if let Err(e) = self.try_save(store) {
            warn!("Failed to save snapshot to {:?}: {}", self.config.dir, e);
        }
    }
}
