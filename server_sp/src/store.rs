//! A small persistent keyed store of submitted grids and their results
//!
//! Every record lives in memory; the whole set is rewritten to one file on each insert.

use bincode::error::{DecodeError, EncodeError};
use core_sp::messages::Record;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode records: {0}")]
    Encode(#[from] EncodeError),

    #[error("Failed to decode records: {0}")]
    Decode(#[from] DecodeError),

    #[error("A store already exists at {0}")]
    AlreadyExists(PathBuf),

    #[error("No store at {0}; create one first")]
    NotFound(PathBuf),

    #[error("A record with id {0} already exists")]
    DuplicateId(String),

    #[error("Store lock was poisoned")]
    Poisoned,
}

pub struct RecordStore {
    location: PathBuf,
    /// in insertion order
    records: Mutex<Vec<Record>>,
    /// Held for the whole of an insert so file writes happen one at a time; readers never take it
    writer: Mutex<()>,
}

impl RecordStore {
    /// Create a new, empty store file. Fails if one is already there.
    pub fn create(location: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let location = location.into();
        if location.exists() {
            return Err(StoreError::AlreadyExists(location));
        }
        let store = Self {
            location,
            records: Mutex::new(vec![]),
            writer: Mutex::new(()),
        };
        store.write(&[])?;
        Ok(store)
    }

    /// Load an existing store file
    pub fn open(location: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let location = location.into();
        let bytes = match fs::read(&location) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(location))
            }
            Err(e) => return Err(e.into()),
        };
        let (records, _): (Vec<Record>, usize) =
            bincode::serde::decode_from_slice(&bytes, bincode::config::standard())?;
        Ok(Self {
            location,
            records: Mutex::new(records),
            writer: Mutex::new(()),
        })
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Add a record and persist the store
    ///
    /// If writing fails the record is not kept in memory either. The file is written from a
    /// snapshot, so [`get`](Self::get) and [`all`](Self::all) are not held up by the disk.
    pub fn insert(&self, record: Record) -> Result<(), StoreError> {
        let _writer = self.writer.lock().map_err(|_| StoreError::Poisoned)?;
        let mut snapshot = self.all()?;
        if snapshot.iter().any(|r| r.id == record.id) {
            return Err(StoreError::DuplicateId(record.id));
        }
        snapshot.push(record.clone());
        self.write(&snapshot)?;
        self.lock()?.push(record);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<Option<Record>, StoreError> {
        Ok(self.lock()?.iter().find(|r| r.id == id).cloned())
    }

    /// Every record, oldest first
    pub fn all(&self) -> Result<Vec<Record>, StoreError> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Record>>, StoreError> {
        self.records.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Write to a sibling file, then move it into place
    fn write(&self, records: &[Record]) -> Result<(), StoreError> {
        let bytes = bincode::serde::encode_to_vec(records, bincode::config::standard())?;
        let mut tmp = self.location.clone().into_os_string();
        tmp.push(".tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.location)?;
        Ok(())
    }
}
