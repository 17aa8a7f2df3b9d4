mod dispatch;

use crate::arguments::Arguments;
use crate::call_state::{CallPhase, CallState, Outcome};
use crate::config::ConnectionSettings;
use crate::error::ProcedureError;
use crate::procedure::ProcedureRequest;
use crate::statement::ExecutedStatement;

#[cfg(feature = "trusted-raw")]
use crate::procedure::{BoundQuery, check_placeholders};
#[cfg(feature = "trusted-raw")]
use crate::trusted::TrustedSql;

use dispatch::Backend;

/// Runs named procedures against one database.
///
/// Every execute opens its own connection and releases it before returning.
/// Two ways to call:
///
/// - [`ProcedureExecutor::execute_request`] takes a complete [`ProcedureRequest`].
/// - The staged methods (`set_procedure`, `set_arguments`, `execute`, `clear`)
///   record values on an internal [`CallState`]. Those values and any errors stay
///   in place after `execute` until `clear` is called.
///
/// ```rust,no_run
/// use sql_procedures::prelude::*;
///
/// # fn main() -> Result<(), ProcedureError> {
/// let settings = ConnectionSettings::sqlite("app.db")?;
/// let mut executor = ProcedureExecutor::new(settings)?;
///
/// let request = ProcedureRequest::from_name(
///     "getUserByKey",
///     Arguments::new().with("key", "f82ba7sMc1"),
/// )?;
/// let statement = executor.execute_request(&request)?;
/// for row in statement.rows() {
///     println!("{:?}", row.get("username"));
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ProcedureExecutor {
    settings: ConnectionSettings,
    backend: Backend,
    call: CallState,
    last_insert_id: Option<i64>,
}

impl ProcedureExecutor {
    /// # Errors
    /// Returns `ProcedureError::ConfigError` if the backend cannot use the settings.
    pub fn new(settings: ConnectionSettings) -> Result<Self, ProcedureError> {
        let backend = Backend::from_settings(&settings)?;
        Ok(Self {
            settings,
            backend,
            call: CallState::new(),
            last_insert_id: None,
        })
    }

    #[must_use]
    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    /// Open a connection and run a trivial query.
    ///
    /// # Errors
    /// Returns `ProcedureError::ConnectionError`; the driver detail is logged.
    pub fn check_connection(&self) -> Result<(), ProcedureError> {
        self.backend
            .ping()
            .map_err(|err| err.into_public("testConnection"))
    }

    /// `true` when a connection can be made with the current settings. Never fails.
    #[must_use]
    pub fn test_connection(&self) -> bool {
        match self.check_connection() {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(backend = ?self.settings.backend(), error = %err, "connection test failed");
                false
            }
        }
    }

    /// Execute a complete request.
    ///
    /// # Errors
    /// Returns `ProcedureError::ConnectionError` or `ProcedureError::ExecutionError` when the
    /// database fails; the driver detail is logged, not returned.
    pub fn execute_request(
        &mut self,
        request: &ProcedureRequest,
    ) -> Result<ExecutedStatement, ProcedureError> {
        self.last_insert_id = None;
        let procedure = request.procedure();
        let bound = request.bind(self.backend.placeholder_style());
        tracing::debug!(
            procedure = procedure.name(),
            sql = bound.sql(),
            bound = bound.bindings().len(),
            "executing procedure"
        );

        let statement = self
            .backend
            .run(&bound)
            .map_err(|err| err.into_public(procedure.name()))?;
        self.last_insert_id = Some(statement.last_insert_id());
        Ok(statement)
    }

    /// Execute caller-vouched SQL text with named arguments.
    ///
    /// `SQLite` receives the text unchanged; `PostgreSQL` receives it with `:name`
    /// placeholders rewritten to `$N`.
    ///
    /// # Errors
    /// Returns `ProcedureError::InvalidArguments` if a placeholder has no argument, or the
    /// errors of [`ProcedureExecutor::execute_request`].
    #[cfg(feature = "trusted-raw")]
    pub fn execute_trusted(
        &mut self,
        sql: &TrustedSql,
        arguments: &Arguments,
    ) -> Result<ExecutedStatement, ProcedureError> {
        self.last_insert_id = None;
        check_placeholders(sql.as_str(), arguments)?;
        let bound = BoundQuery::new(sql.as_str(), arguments, self.backend.placeholder_style());
        tracing::warn!(sql = sql.as_str(), "executing trusted raw SQL");

        let statement = self
            .backend
            .run(&bound)
            .map_err(|err| err.into_public("trusted"))?;
        self.last_insert_id = Some(statement.last_insert_id());
        Ok(statement)
    }

    /// Id generated by the connection of the last successful execute.
    ///
    /// # Errors
    /// Returns `ProcedureError::StateError` if no execute has succeeded since the
    /// most recent attempt began.
    pub fn last_insert_id(&self) -> Result<i64, ProcedureError> {
        self.last_insert_id.ok_or_else(|| {
            ProcedureError::StateError(
                "no active connection: execute has not succeeded".to_string(),
            )
        })
    }

    pub fn set_procedure(&mut self, name: impl Into<String>) {
        self.call.set_procedure(name);
    }

    pub fn set_arguments(&mut self, arguments: Arguments) {
        self.call.set_arguments(arguments);
    }

    pub fn set_arguments_opt(&mut self, arguments: Option<Arguments>) {
        self.call.set_arguments_opt(arguments);
    }

    /// Execute the staged call.
    ///
    /// A call with recorded errors returns the first of them without touching the
    /// database. Any new failure is appended to [`ProcedureExecutor::errors`].
    ///
    /// # Errors
    /// `InvalidProcedure` or `InvalidArguments` for an incomplete or invalid call, otherwise
    /// the errors of [`ProcedureExecutor::execute_request`].
    pub fn execute(&mut self) -> Result<ExecutedStatement, ProcedureError> {
        if let Some(err) = self.call.blocking_error().cloned() {
            self.last_insert_id = None;
            self.call.record_outcome(Outcome::Failure);
            return Err(err);
        }

        let result = self
            .call
            .to_request()
            .and_then(|request| self.execute_request(&request));
        match &result {
            Ok(_) => self.call.record_outcome(Outcome::Success),
            Err(err) => {
                self.last_insert_id = None;
                self.call.record_failure(err.clone());
            }
        }
        result
    }

    /// Comma-joined messages recorded by the staged call.
    #[must_use]
    pub fn errors(&self) -> String {
        self.call.errors()
    }

    /// Reset the staged call.
    pub fn clear(&mut self) {
        self.call.clear();
    }

    #[must_use]
    pub fn phase(&self) -> CallPhase {
        self.call.phase()
    }

    #[must_use]
    pub fn call_state(&self) -> &CallState {
        &self.call
    }
}
