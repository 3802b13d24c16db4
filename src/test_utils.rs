//! Helper utilities for testing and development.

use std::path::PathBuf;

use tempfile::TempDir;

use crate::config::SQLITE_PREFIX;

/// A file-backed `SQLite` database that lives as long as the value.
///
/// Every facade call opens its own connection, so state shared between calls
/// needs a file rather than `:memory:`.
#[derive(Debug)]
pub struct TempSqliteDb {
    dir: TempDir,
}

impl TempSqliteDb {
    /// Create an empty database in a fresh temporary directory.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the directory cannot be created.
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.path().join("facade.db")
    }

    /// Connection string selecting this database.
    #[must_use]
    pub fn connection_string(&self) -> String {
        format!("{SQLITE_PREFIX}{}", self.path().display())
    }
}
