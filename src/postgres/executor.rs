use tokio::runtime::{Builder, Runtime};
use tokio::task::JoinHandle;
use tokio_postgres::{Client, NoTls};

use crate::config::ConnectionSettings;
use crate::error::{ProcedureError, StagedDriverError};
use crate::results::ResultSet;
use crate::statement::ExecutedStatement;
use crate::types::RowValues;

use super::config::pg_config;
use super::params::as_refs;
use super::query::build_result_set;

type ConnectionTask = JoinHandle<Result<(), tokio_postgres::Error>>;

/// Opens a fresh `PostgreSQL` connection for every call.
///
/// Each call builds its own current-thread runtime, so the connection task is
/// joined and the runtime torn down before the call returns. Calling from inside
/// another tokio runtime panics, as with any blocking client.
#[derive(Debug, Clone)]
pub struct PostgresBackend {
    config: tokio_postgres::Config,
}

fn runtime() -> Result<Runtime, StagedDriverError> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(StagedDriverError::connect)
}

impl PostgresBackend {
    /// # Errors
    /// Returns `ProcedureError::ConfigError` if the extras do not parse.
    pub fn new(settings: &ConnectionSettings) -> Result<Self, ProcedureError> {
        Ok(Self {
            config: pg_config(settings)?,
        })
    }

    async fn connect(&self) -> Result<(Client, ConnectionTask), StagedDriverError> {
        tracing::debug!(
            hosts = ?self.config.get_hosts(),
            db = ?self.config.get_dbname(),
            "opening postgres connection"
        );
        let (client, connection) = self
            .config
            .connect(NoTls)
            .await
            .map_err(StagedDriverError::connect)?;
        Ok((client, tokio::spawn(connection)))
    }

    pub(crate) fn ping(&self) -> Result<(), StagedDriverError> {
        runtime()?.block_on(async {
            let (client, task) = self.connect().await?;
            let outcome = client
                .simple_query("SELECT 1")
                .await
                .map(|_| ())
                .map_err(StagedDriverError::connect);
            release(client, task).await;
            outcome
        })
    }

    pub(crate) fn run(
        &self,
        sql: &str,
        values: &[&RowValues],
    ) -> Result<ExecutedStatement, StagedDriverError> {
        runtime()?.block_on(async {
            let (client, task) = self.connect().await?;
            let outcome = execute_on(&client, sql, values)
                .await
                .map_err(StagedDriverError::execute);
            release(client, task).await;
            outcome
        })
    }
}

async fn execute_on(
    client: &Client,
    sql: &str,
    values: &[&RowValues],
) -> Result<ExecutedStatement, tokio_postgres::Error> {
    let stmt = client.prepare(sql).await?;
    let params = as_refs(values);

    let (result_set, rows_affected, insert_id) = if stmt.columns().is_empty() {
        let changed = client.execute(&stmt, &params).await?;
        (
            ResultSet::default(),
            usize::try_from(changed).unwrap_or(usize::MAX),
            last_insert_id(client).await,
        )
    } else {
        let rows = client.query(&stmt, &params).await?;
        let result_set = build_result_set(&stmt, &rows)?;
        let returned = result_set.len();
        (result_set, returned, 0)
    };

    Ok(ExecutedStatement::new(
        sql.to_string(),
        result_set,
        rows_affected,
        insert_id,
    ))
}

async fn last_insert_id(client: &Client) -> i64 {
    // lastval() errors until a sequence has been used on this connection.
    match client.query_one("SELECT lastval()", &[]).await {
        Ok(row) => row.try_get::<_, i64>(0).unwrap_or_else(|err| {
            tracing::debug!(error = %err, "lastval() did not return a bigint");
            0
        }),
        Err(err) => {
            tracing::debug!(error = %err, "no insert id available");
            0
        }
    }
}

/// Drop the client and wait for its connection task to finish.
async fn release(client: Client, task: ConnectionTask) {
    drop(client);
    match task.await {
        Ok(Ok(())) => tracing::debug!("postgres connection closed"),
        Ok(Err(err)) => tracing::warn!(error = %err, "postgres connection ended with an error"),
        Err(err) => tracing::warn!(error = %err, "postgres connection task failed"),
    }
}
