use crate::config::ConnectionSettings;
use crate::error::{ProcedureError, StagedDriverError};
use crate::procedure::BoundQuery;
use crate::statement::ExecutedStatement;
use crate::types::{BackendKind, PlaceholderStyle};

#[cfg(feature = "postgres")]
use crate::postgres::PostgresBackend;
#[cfg(feature = "sqlite")]
use crate::sqlite::SqliteBackend;

/// The driver behind an executor, chosen once from the settings.
#[derive(Debug, Clone)]
pub(crate) enum Backend {
    #[cfg(feature = "postgres")]
    Postgres(PostgresBackend),
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteBackend),
}

impl Backend {
    pub(crate) fn from_settings(settings: &ConnectionSettings) -> Result<Self, ProcedureError> {
        match settings.backend() {
            #[cfg(feature = "postgres")]
            BackendKind::Postgres => Ok(Backend::Postgres(PostgresBackend::new(settings)?)),
            #[cfg(feature = "sqlite")]
            BackendKind::Sqlite => Ok(Backend::Sqlite(SqliteBackend::new(settings)?)),
        }
    }

    pub(crate) fn placeholder_style(&self) -> PlaceholderStyle {
        match self {
            #[cfg(feature = "postgres")]
            Backend::Postgres(_) => BackendKind::Postgres.placeholder_style(),
            #[cfg(feature = "sqlite")]
            Backend::Sqlite(_) => BackendKind::Sqlite.placeholder_style(),
        }
    }

    /// Open a connection, run `SELECT 1`, release it.
    pub(crate) fn ping(&self) -> Result<(), StagedDriverError> {
        match self {
            #[cfg(feature = "postgres")]
            Backend::Postgres(pg) => pg.ping(),
            #[cfg(feature = "sqlite")]
            Backend::Sqlite(sqlite) => sqlite.ping(),
        }
    }

    /// Open a connection, execute `bound`, release the connection.
    pub(crate) fn run(&self, bound: &BoundQuery<'_>) -> Result<ExecutedStatement, StagedDriverError> {
        match self {
            #[cfg(feature = "postgres")]
            Backend::Postgres(pg) => {
                let values: Vec<_> = bound.values().collect();
                pg.run(bound.sql(), &values)
            }
            #[cfg(feature = "sqlite")]
            Backend::Sqlite(sqlite) => sqlite.run(bound.sql(), bound.bindings()),
        }
    }
}
