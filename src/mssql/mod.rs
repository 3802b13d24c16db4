// MSSQL module - runs facade commands against SQL Server through tiberius
//
// - config: ADO.NET connection-string parsing
// - client: per-call TCP + TDS connection setup
// - params: named parameters, output capture and command-kind batch composition
// - query: result-set streaming and column conversion
// - executor: reader / scalar / non-query entry points

pub mod client;
pub mod config;
pub mod executor;
pub mod params;
pub mod query;

pub use client::create_mssql_client;
pub use config::{MssqlClient, MssqlOptions};
pub use executor::{execute_non_query, execute_reader, execute_scalar};
