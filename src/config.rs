use crate::error::SqlFacadeError;
use crate::types::DatabaseType;

#[cfg(feature = "mssql")]
use crate::mssql::MssqlOptions;
#[cfg(feature = "sqlite")]
use crate::sqlite::SqliteOptions;

/// Prefix that routes a connection string to the `SQLite` backend.
pub const SQLITE_PREFIX: &str = "sqlite:";

/// The database a connection string points at.
///
/// `sqlite::memory:`, `sqlite:<path>` and `sqlite://<path>` select `SQLite`;
/// anything else is read as an ADO.NET-style SQL Server connection string
/// (`Server=host,1433;Database=db;User Id=sa;Password=...`).
#[derive(Debug, Clone)]
pub enum DataSource {
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteOptions),
    #[cfg(feature = "mssql")]
    Mssql(MssqlOptions),
}

impl DataSource {
    /// Resolve a connection string to a backend.
    ///
    /// # Errors
    ///
    /// Returns `SqlFacadeError::ConfigError` for an empty or malformed string and
    /// `SqlFacadeError::Unimplemented` when the matching backend feature is off.
    pub fn parse(connection_string: &str) -> Result<Self, SqlFacadeError> {
        let trimmed = connection_string.trim();
        if trimmed.is_empty() {
            return Err(SqlFacadeError::ConfigError(
                "connection string has not been initialized".to_string(),
            ));
        }

        if let Some(rest) = strip_prefix_ignore_case(trimmed, SQLITE_PREFIX) {
            return Self::sqlite(rest);
        }
        Self::mssql(trimmed)
    }

    #[must_use]
    pub fn database_type(&self) -> DatabaseType {
        match self {
            #[cfg(feature = "sqlite")]
            DataSource::Sqlite(_) => DatabaseType::Sqlite,
            #[cfg(feature = "mssql")]
            DataSource::Mssql(_) => DatabaseType::Mssql,
        }
    }

    #[cfg(feature = "sqlite")]
    fn sqlite(rest: &str) -> Result<Self, SqlFacadeError> {
        Ok(DataSource::Sqlite(SqliteOptions::from_location(rest)?))
    }

    #[cfg(not(feature = "sqlite"))]
    fn sqlite(_rest: &str) -> Result<Self, SqlFacadeError> {
        Err(SqlFacadeError::Unimplemented(
            "SQLite support requires the `sqlite` feature".to_string(),
        ))
    }

    #[cfg(feature = "mssql")]
    fn mssql(connection_string: &str) -> Result<Self, SqlFacadeError> {
        Ok(DataSource::Mssql(MssqlOptions::from_ado_string(
            connection_string,
        )?))
    }

    #[cfg(not(feature = "mssql"))]
    fn mssql(_connection_string: &str) -> Result<Self, SqlFacadeError> {
        Err(SqlFacadeError::Unimplemented(
            "SQL Server support requires the `mssql` feature".to_string(),
        ))
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        s.get(prefix.len()..)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_connection_string_is_rejected() {
        let err = DataSource::parse("   ").unwrap_err();
        assert!(matches!(err, SqlFacadeError::ConfigError(_)));
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn sqlite_prefixes_select_sqlite() {
        for cs in ["sqlite::memory:", "SQLite:data.db", "sqlite://data.db"] {
            let source = DataSource::parse(cs).unwrap();
            assert_eq!(source.database_type(), DatabaseType::Sqlite, "{cs}");
        }
    }

    #[cfg(feature = "mssql")]
    #[test]
    fn ado_strings_select_mssql() {
        let source =
            DataSource::parse("Server=tcp:localhost,1433;Database=musicstore;User Id=sa;Password=x")
                .unwrap();
        assert_eq!(source.database_type(), DatabaseType::Mssql);
    }
}
