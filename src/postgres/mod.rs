// PostgreSQL backend.
//
// tokio-postgres is async; each call runs on a private current-thread runtime so
// the executor stays blocking.
//
// - config: extra options and `tokio_postgres::Config` assembly
// - params: `ToSql` for `RowValues`
// - query: result extraction
// - executor: one-connection-per-call execution

pub mod config;
pub mod executor;
pub mod params;
pub mod query;

pub use config::PostgresExtras;
pub use executor::PostgresBackend;
pub use query::build_result_set;
