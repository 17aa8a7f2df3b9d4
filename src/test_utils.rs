//! An embedded `PostgreSQL` server for integration tests.
//!
//! The server runs on its own runtime; [`ProcedureExecutor`](crate::ProcedureExecutor)
//! calls must be made outside of it, as with any blocking client.

use std::error::Error;

use postgresql_embedded::PostgreSQL;
use tokio::runtime::{Builder, Runtime};
use tokio_postgres::NoTls;

use crate::config::ConnectionSettings;
use crate::postgres::config::pg_config;
use crate::types::BackendKind;

/// A running server with one freshly created database.
pub struct EmbeddedPostgres {
    runtime: Runtime,
    postgresql: PostgreSQL,
    settings: ConnectionSettings,
}

impl EmbeddedPostgres {
    /// Install (bundled binaries), start the server and create `db_name`.
    ///
    /// # Errors
    /// Returns an error if the server cannot be set up or started, or the database
    /// cannot be created.
    pub fn start(db_name: &str) -> Result<Self, Box<dyn Error>> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let (postgresql, settings) = runtime.block_on(async {
            let mut postgresql = PostgreSQL::default();
            postgresql.setup().await?;
            postgresql.start().await?;
            postgresql.create_database(db_name).await?;

            let server = postgresql.settings();
            let settings = ConnectionSettings::builder(BackendKind::Postgres)
                .host(server.host.clone())
                .port(server.port)
                .schema(db_name)
                .username(server.username.clone())
                .password(server.password.clone())
                .build()?;
            tracing::debug!(port = server.port, db = db_name, "embedded postgres started");
            Ok::<_, Box<dyn Error>>((postgresql, settings))
        })?;

        Ok(Self {
            runtime,
            postgresql,
            settings,
        })
    }

    /// Settings pointing at the test database.
    #[must_use]
    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    /// Run a batch of statements (schema, seed rows) on a direct connection.
    ///
    /// # Errors
    /// Returns the driver error if connecting or any statement fails.
    pub fn seed(&self, sql: &str) -> Result<(), Box<dyn Error>> {
        let config = pg_config(&self.settings)?;
        self.runtime.block_on(async {
            let (client, connection) = config.connect(NoTls).await?;
            let task = tokio::spawn(connection);
            let outcome = client.batch_execute(sql).await;
            drop(client);
            let _ = task.await;
            outcome?;
            Ok::<(), Box<dyn Error>>(())
        })
    }

    /// Stop the server.
    pub fn stop(self) {
        let Self {
            runtime,
            postgresql,
            ..
        } = self;
        runtime.block_on(async move {
            if let Err(err) = postgresql.stop().await {
                tracing::warn!(error = %err, "embedded postgres did not stop cleanly");
            }
        });
    }
}
