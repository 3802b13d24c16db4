use tiberius::Config as TiberiusConfig;
use tokio::net::TcpStream;
use tokio_util::compat::Compat;

use crate::error::SqlFacadeError;

/// Type alias for SQL Server client
pub type MssqlClient = tiberius::Client<Compat<TcpStream>>;

/// Connection settings for one SQL Server database.
#[derive(Debug, Clone)]
pub struct MssqlOptions {
    config: TiberiusConfig,
}

impl MssqlOptions {
    /// Parse an ADO.NET connection string, e.g.
    /// `Server=tcp:db.local,1433;Database=musicstore;User Id=app;Password=...;TrustServerCertificate=true`.
    ///
    /// # Errors
    ///
    /// Returns `SqlFacadeError::ConfigError` if tiberius cannot parse the string.
    /// The message leaves out the string itself since it may carry a password.
    pub fn from_ado_string(connection_string: &str) -> Result<Self, SqlFacadeError> {
        let config = TiberiusConfig::from_ado_string(connection_string).map_err(|e| {
            SqlFacadeError::ConfigError(format!("invalid SQL Server connection string: {e}"))
        })?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn tiberius_config(&self) -> &TiberiusConfig {
        &self.config
    }
}
