use rusqlite::Connection;

use crate::config::ConnectionSettings;
use crate::error::{ProcedureError, StagedDriverError};
use crate::results::ResultSet;
use crate::statement::ExecutedStatement;
use crate::types::RowValues;

use super::config::SqliteExtras;
use super::params::Params;
use super::query::build_result_set;

/// Opens a fresh `SQLite` connection for every call and closes it before returning.
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    path: String,
    extras: SqliteExtras,
}

impl SqliteBackend {
    /// # Errors
    /// Returns `ProcedureError::ConfigError` if the extras do not parse.
    pub fn new(settings: &ConnectionSettings) -> Result<Self, ProcedureError> {
        Ok(Self {
            path: settings.schema().to_string(),
            extras: SqliteExtras::parse(settings.extras())?,
        })
    }

    fn connect(&self) -> Result<Connection, StagedDriverError> {
        tracing::debug!(path = %self.path, "opening sqlite connection");
        self.extras.open(&self.path).map_err(StagedDriverError::connect)
    }

    /// Connectivity check; never creates the database file.
    pub(crate) fn ping(&self) -> Result<(), StagedDriverError> {
        tracing::debug!(path = %self.path, "checking sqlite connection");
        let conn = self
            .extras
            .open_existing(&self.path)
            .map_err(StagedDriverError::connect)?;
        let outcome = conn
            .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map(|_| ())
            .map_err(StagedDriverError::connect);
        close(conn);
        outcome
    }

    pub(crate) fn run(
        &self,
        sql: &str,
        bindings: &[(&str, &RowValues)],
    ) -> Result<ExecutedStatement, StagedDriverError> {
        let conn = self.connect()?;
        let outcome = execute_on(&conn, sql, bindings).map_err(StagedDriverError::execute);
        close(conn);
        outcome
    }
}

fn execute_on(
    conn: &Connection,
    sql: &str,
    bindings: &[(&str, &RowValues)],
) -> rusqlite::Result<ExecutedStatement> {
    let mut stmt = conn.prepare(sql)?;
    let params = Params::convert(bindings);
    let named = params.as_named();

    let (result_set, rows_affected) = if stmt.column_count() == 0 {
        let changed = stmt.execute(named.as_slice())?;
        (ResultSet::default(), changed)
    } else {
        let result_set = build_result_set(&mut stmt, named.as_slice())?;
        let returned = result_set.len();
        (result_set, returned)
    };

    Ok(ExecutedStatement::new(
        sql.to_string(),
        result_set,
        rows_affected,
        conn.last_insert_rowid(),
    ))
}

fn close(conn: Connection) {
    if let Err((_conn, err)) = conn.close() {
        tracing::warn!(error = %err, "failed to close sqlite connection");
    }
}
