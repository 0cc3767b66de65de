//! Snapshot writer
//!
//! Writes both namespace files. Each file is written to a temporary sibling,
//! synced, then renamed over the previous snapshot.

use super::format::{encode_lists, encode_strings};
use super::PersistenceError;
use crate::store::Snapshot;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Snapshot writer
///
/// Saves are serialised by an internal lock. A snapshot whose generation is
/// not newer than the last one written is dropped, so the files on disk
/// never go back in time when two saves race.
pub struct SnapshotWriter {
    strings_path: PathBuf,
    lists_path: PathBuf,
    last_generation: Mutex<Option<u64>>,
}

impl SnapshotWriter {
    /// Create a writer for the two snapshot files
    pub fn new(strings_path: impl Into<PathBuf>, lists_path: impl Into<PathBuf>) -> Self {
        SnapshotWriter {
            strings_path: strings_path.into(),
            lists_path: lists_path.into(),
            last_generation: Mutex::new(None),
        }
    }

    /// Write a snapshot
    ///
    /// Returns Ok(false) when the snapshot was skipped because nothing newer
    /// than the files on disk is in it.
    pub fn write(&self, snapshot: &Snapshot) -> Result<bool, PersistenceError> {
        let mut last = self.last_generation.lock().unwrap_or_else(PoisonError::into_inner);

        if last.is_some_and(|written| snapshot.generation <= written) {
            return Ok(false);
        }

        write_atomic(&self.strings_path, &encode_strings(&snapshot.strings))?;
        write_atomic(&self.lists_path, &encode_lists(&snapshot.lists))?;

        *last = Some(snapshot.generation);
        Ok(true)
    }

    /// Record that the files on disk already hold `generation`
    pub fn mark_written(&self, generation: u64) {
        *self.last_generation.lock().unwrap_or_else(PoisonError::into_inner) = Some(generation);
    }

    /// Generation of the last snapshot written, if any
    pub fn last_generation(&self) -> Option<u64> {
        *self.last_generation.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Replace `path` with `data` via a temporary file and a rename
///
/// The parent directory is synced after the rename so the new entry
/// survives a power loss.
fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut tmp: OsString = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let result = (|| {
        let mut file = File::create(&tmp)?;
        file.write_all(data)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
        return result;
    }
    sync_parent(path)
}

#[cfg(unix)]
fn sync_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => File::open(parent)?.sync_all(),
        _ => File::open(".")?.sync_all(),
    }
}

// Directories cannot be opened as files here
#[cfg(not(unix))]
fn sync_parent(_path: &Path) -> io::Result<()> {
    Ok(())
}
