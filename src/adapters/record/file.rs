//! File-backed record store
//!
//! One record file per task identity. Writes go through a temporary file in
//! the same directory and are renamed into place.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tempfile::NamedTempFile;
use thiserror::Error;

use super::codec::{self, CodecError, StoredRecord};
use crate::core::models::RunRecord;
use crate::core::ports::RecordStore;

/// Errors writing a record file
#[derive(Debug, Error)]
pub enum RecordError {
    /// Filesystem failure
    #[error("{path}: {source}")]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Encoding failure
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The temporary file could not be renamed into place
    #[error("cannot replace {path}: {source}")]
    Persist {
        /// Destination
        path: PathBuf,
        /// Underlying error
        #[source]
        source: tempfile::PersistError,
    },
}

/// [`RecordStore`] backed by a single file
#[derive(Debug, Clone)]
pub struct FileRecordStore {
    path: PathBuf,
}

impl FileRecordStore {
    /// Store records at `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The record file location
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record along with when it was written
    ///
    /// Unreadable or undecodable files load as `None`.
    #[must_use]
    pub fn load_stored(&self) -> Option<StoredRecord> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no record at {}", self.path.display());
                return None;
            },
            Err(e) => {
                log::warn!("ignoring unreadable record {}: {e}", self.path.display());
                return None;
            },
        };

        match codec::decode(&bytes) {
            Ok(stored) => Some(stored),
            Err(e) => {
                log::warn!("ignoring incompatible record {}: {e}", self.path.display());
                None
            },
        }
    }

    /// Encode and atomically write `record`
    pub fn write(&self, record: &RunRecord) -> Result<(), RecordError> {
        let bytes = codec::encode(record, Utc::now())?;
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir).map_err(|source| RecordError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let io_err = |source| RecordError::Io {
            path: self.path.clone(),
            source,
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(&bytes).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|source| RecordError::Persist {
            path: self.path.clone(),
            source,
        })?;

        log::debug!("wrote {} fingerprints to {}", record.len(), self.path.display());
        Ok(())
    }
}

impl RecordStore for FileRecordStore {
    fn load(&self) -> Option<RunRecord> {
        self.load_stored().map(|stored| stored.record)
    }

    fn save(&self, record: &RunRecord) -> anyhow::Result<()> {
        Ok(self.write(record)?)
    }

    fn clear(&self) -> anyhow::Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
