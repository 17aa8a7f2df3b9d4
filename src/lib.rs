//! Named SQL procedures over `SQLite` and `PostgreSQL`.
//!
//! Callers pick an operation by name, pass named arguments, and get back an
//! [`ExecutedStatement`] or a [`ProcedureError`] whose message is safe to show to
//! users. Driver errors are logged through `tracing` and never returned.

#[cfg(not(any(feature = "sqlite", feature = "postgres")))]
compile_error!("enable at least one of the `sqlite` or `postgres` features");

pub mod arguments;
pub mod call_state;
pub mod config;
pub mod error;
pub mod executor;
pub mod prelude;
pub mod procedure;
pub mod results;
pub mod statement;
pub mod translation;
#[cfg(feature = "trusted-raw")]
pub mod trusted;
pub mod types;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;
#[cfg(feature = "test-utils-postgres")]
pub mod test_utils;

pub use arguments::Arguments;
pub use call_state::{CallPhase, CallState, Outcome};
pub use config::{ConnectionSettings, ConnectionSettingsBuilder};
pub use error::{ErrorKind, ErrorLog, ProcedureError};
pub use executor::ProcedureExecutor;
pub use procedure::{Arity, BoundQuery, Procedure, ProcedureRequest};
pub use results::{ResultSet, Row};
pub use statement::ExecutedStatement;
#[cfg(feature = "trusted-raw")]
pub use trusted::TrustedSql;
pub use types::{BackendKind, PlaceholderStyle, RowValues};
