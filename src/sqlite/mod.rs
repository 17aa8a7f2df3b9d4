// SQLite backend, driven synchronously through rusqlite.
//
// - config: extra options and connection opening
// - params: argument conversion to rusqlite values
// - query: result extraction
// - executor: one-connection-per-call execution

pub mod config;
pub mod executor;
pub mod params;
pub mod query;

pub use config::SqliteExtras;
pub use executor::SqliteBackend;
pub use params::Params;
pub use query::build_result_set;
