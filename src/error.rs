use thiserror::Error;

/// Message returned whenever the database itself rejected or failed a call.
/// The underlying detail only goes to the log.
pub const GENERIC_EXECUTION_MESSAGE: &str =
    "Database connection error - This has been logged and the admin has been notified";

/// Message returned when no connection could be established.
pub const GENERIC_CONNECTION_MESSAGE: &str =
    "Database connection error - Initial connection could not be made to the server";

/// Errors surfaced to callers of the procedure executor.
///
/// Every variant renders a message that is safe to show to an end user.
/// Driver errors are never carried here; they are logged through `tracing`
/// and collapsed into [`ProcedureError::ConnectionError`] or
/// [`ProcedureError::ExecutionError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcedureError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid procedure: {0}")]
    InvalidProcedure(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Recorded by the staged setter when the procedure name is empty.
    #[error("Database connection error - Invalid connection procedures")]
    EmptyProcedureName,

    /// Recorded by the staged setter when arguments were explicitly left unset.
    #[error("Database connection error - Invalid connection arguments")]
    ArgumentsNotProvided,

    #[error("Database connection error - Initial connection could not be made to the server")]
    ConnectionError,

    #[error("Database connection error - This has been logged and the admin has been notified")]
    ExecutionError,

    #[error("Invalid state: {0}")]
    StateError(String),
}

/// Discriminant of a [`ProcedureError`], handy for assertions and metrics labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Config,
    InvalidProcedure,
    InvalidArguments,
    Connection,
    Execution,
    State,
}

impl ProcedureError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProcedureError::ConfigError(_) => ErrorKind::Config,
            ProcedureError::InvalidProcedure(_) | ProcedureError::EmptyProcedureName => {
                ErrorKind::InvalidProcedure
            }
            ProcedureError::InvalidArguments(_) | ProcedureError::ArgumentsNotProvided => {
                ErrorKind::InvalidArguments
            }
            ProcedureError::ConnectionError => ErrorKind::Connection,
            ProcedureError::ExecutionError => ErrorKind::Execution,
            ProcedureError::StateError(_) => ErrorKind::State,
        }
    }
}

/// Raw failures from the database client libraries. Crate-private: these are
/// logged and then mapped onto [`ProcedureError`].
#[derive(Debug, Error)]
pub(crate) enum DriverError {
    #[cfg(feature = "postgres")]
    #[error(transparent)]
    Postgres(#[from] tokio_postgres::Error),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[cfg(feature = "postgres")]
    #[error("runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Which phase of a call a driver failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailureStage {
    Connect,
    Execute,
}

/// A driver failure tagged with the stage it occurred in.
#[derive(Debug)]
pub(crate) struct StagedDriverError {
    pub(crate) stage: FailureStage,
    pub(crate) source: DriverError,
}

impl StagedDriverError {
    pub(crate) fn connect(source: impl Into<DriverError>) -> Self {
        Self {
            stage: FailureStage::Connect,
            source: source.into(),
        }
    }

    pub(crate) fn execute(source: impl Into<DriverError>) -> Self {
        Self {
            stage: FailureStage::Execute,
            source: source.into(),
        }
    }

    /// Log the driver detail and return the caller-safe error.
    pub(crate) fn into_public(self, procedure: &str) -> ProcedureError {
        match self.stage {
            FailureStage::Connect => {
                tracing::error!(procedure, error = %self.source, "database connection failed");
                ProcedureError::ConnectionError
            }
            FailureStage::Execute => {
                tracing::error!(procedure, error = %self.source, "database execution failed");
                ProcedureError::ExecutionError
            }
        }
    }
}

/// Ordered list of errors recorded during one staged call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorLog {
    entries: Vec<ProcedureError>,
}

impl ErrorLog {
    pub fn push(&mut self, err: ProcedureError) {
        self.entries.push(err);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&ProcedureError> {
        self.entries.first()
    }

    #[must_use]
    pub fn entries(&self) -> &[ProcedureError] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// All messages joined with `", "`; empty when nothing was recorded.
    #[must_use]
    pub fn joined(&self) -> String {
        self.entries
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
