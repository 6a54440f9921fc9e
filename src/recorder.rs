//! SQLite persistence of samples.
//!
//! Every call opens its own connection, inserts one row inside a
//! transaction, commits and closes. Nothing is pooled between samples.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};
use thiserror::Error;
use tracing::debug;

use crate::data::Sample;

/// Timestamp layout of the `dated` column.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

// Column names are fixed by databases written by earlier versions of the tool.
const CREATE_TABLE: &str =
    "CREATE TABLE IF NOT EXISTS wifi_data (signal REAL, shor REAL, dated TEXT)";
const INSERT_SAMPLE: &str = "INSERT INTO wifi_data (signal, shor, dated) VALUES (?1, ?2, ?3)";

/// Failure to open, write or commit to the sample database.
#[derive(Debug, Error)]
#[error("failed to persist sample to {path}: {source}")]
pub struct PersistError {
    path: PathBuf,
    #[source]
    source: rusqlite::Error,
}

impl PersistError {
    /// The database file involved.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Appends samples to a local SQLite file.
#[derive(Debug, Clone)]
pub struct Recorder {
    path: PathBuf,
}

impl Recorder {
    /// Create a recorder for the given database file.
    ///
    /// The file is not touched until the first sample is persisted.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the database path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert one row for `sample`.
    pub fn persist(&self, sample: &Sample) -> Result<(), PersistError> {
        self.insert(sample).map_err(|source| PersistError {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "sample persisted");
        Ok(())
    }

    fn insert(&self, sample: &Sample) -> rusqlite::Result<()> {
        let mut conn = Connection::open(&self.path)?;
        let tx = conn.transaction()?;
        tx.execute(CREATE_TABLE, [])?;
        tx.execute(
            INSERT_SAMPLE,
            params![
                sample.signal(),
                sample.noise(),
                sample.timestamp().format(TIMESTAMP_FORMAT).to_string()
            ],
        )?;
        tx.commit()?;
        conn.close().map_err(|(_, e)| e)
    }
}
