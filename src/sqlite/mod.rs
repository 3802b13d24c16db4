// SQLite module - runs facade commands against file or in-memory databases
//
// - config: connection-string location parsing and connection opening
// - params: binding named parameters to each statement
// - query: statement iteration and result-set materialization
// - executor: reader / scalar / non-query entry points

pub mod config;
pub mod executor;
pub mod params;
pub mod query;

pub use config::SqliteOptions;
pub use executor::{execute_non_query, execute_reader, execute_scalar};
