use tiberius::{Client, SqlBrowser};
use tokio::net::TcpStream;
use tokio_util::compat::TokioAsyncWriteCompatExt;

use super::config::{MssqlClient, MssqlOptions};
use crate::error::SqlFacadeError;

/// Open a new SQL Server connection.
///
/// Named instances are resolved through SQL Browser. A routing redirect (as
/// sent by Azure SQL gateways) is followed once.
///
/// # Errors
/// Returns `SqlFacadeError::ConnectionError` if the TCP or TDS handshake fails.
pub async fn create_mssql_client(opts: &MssqlOptions) -> Result<MssqlClient, SqlFacadeError> {
    let config = opts.tiberius_config().clone();

    let tcp = TcpStream::connect_named(&config).await.map_err(|e| {
        SqlFacadeError::ConnectionError(format!("TCP connection error: {e}"))
    })?;
    tcp.set_nodelay(true)?;

    match Client::connect(config.clone(), tcp.compat_write()).await {
        Ok(client) => Ok(client),
        Err(tiberius::error::Error::Routing { host, port }) => {
            tracing::debug!(%host, port, "following SQL Server routing redirect");
            let mut config = config;
            config.host(&host);
            config.port(port);

            let tcp = TcpStream::connect(config.get_addr()).await.map_err(|e| {
                SqlFacadeError::ConnectionError(format!("TCP connection error: {e}"))
            })?;
            tcp.set_nodelay(true)?;

            Client::connect(config, tcp.compat_write())
                .await
                .map_err(|e| {
                    SqlFacadeError::ConnectionError(format!("SQL Server connection error: {e}"))
                })
        }
        Err(e) => Err(SqlFacadeError::ConnectionError(format!(
            "SQL Server connection error: {e}"
        ))),
    }
}
