use rusqlite::Connection;

use crate::error::SqlFacadeError;

/// Where a `SQLite` connection string points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteOptions {
    pub db_path: String,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Parse the part of a connection string after `sqlite:`.
    ///
    /// `:memory:`, `//path` and a bare path are accepted.
    ///
    /// # Errors
    ///
    /// Returns `SqlFacadeError::ConfigError` when no location is given.
    pub fn from_location(location: &str) -> Result<Self, SqlFacadeError> {
        let path = location.strip_prefix("//").unwrap_or(location).trim();
        if path.is_empty() {
            return Err(SqlFacadeError::ConfigError(
                "SQLite connection string names no database".to_string(),
            ));
        }
        Ok(Self::new(path))
    }

    /// Open a new connection owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns `SqlFacadeError::ConnectionError` if the database cannot be opened.
    pub fn open(&self) -> Result<Connection, SqlFacadeError> {
        Connection::open(&self.db_path).map_err(|e| {
            SqlFacadeError::ConnectionError(format!(
                "failed to open SQLite database `{}`: {e}",
                self.db_path
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_locations() {
        assert_eq!(SqliteOptions::from_location(":memory:").unwrap().db_path, ":memory:");
        assert_eq!(
            SqliteOptions::from_location("//var/db/app.db").unwrap().db_path,
            "var/db/app.db"
        );
        assert_eq!(SqliteOptions::from_location("app.db").unwrap().db_path, "app.db");
        assert!(SqliteOptions::from_location("").is_err());
    }
}
