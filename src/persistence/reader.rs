//! Snapshot reader
//!
//! Loads a snapshot file into memory and decodes it.

use super::format::{decode_lists, decode_strings};
use super::PersistenceError;
use bytes::Bytes;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Snapshot reader
pub struct SnapshotReader {
    data: Vec<u8>,
}

impl SnapshotReader {
    /// Load a snapshot file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let data = fs::read(path.as_ref())?;
        debug!("Read {} bytes from {:?}", data.len(), path.as_ref());
        Ok(SnapshotReader { data })
    }

    /// Decode as a string namespace
    pub fn strings(&self) -> Result<Vec<(Bytes, Bytes)>, PersistenceError> {
        decode_strings(&self.data)
    }

    /// Decode as a list namespace
    pub fn lists(&self) -> Result<Vec<(Bytes, Vec<Bytes>)>, PersistenceError> {
        decode_lists(&self.data)
    }
}
