use std::collections::BTreeMap;
use std::time::Duration;

use crate::config::ConnectionSettings;
use crate::error::ProcedureError;

/// Parsed `PostgreSQL` extras.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostgresExtras {
    pub application_name: Option<String>,
    pub connect_timeout: Option<Duration>,
    pub options: Option<String>,
}

impl PostgresExtras {
    /// # Errors
    /// Returns `ProcedureError::ConfigError` if `connect_timeout` is not a whole number of seconds.
    pub fn parse(extras: &BTreeMap<String, String>) -> Result<Self, ProcedureError> {
        let connect_timeout = extras
            .get("connect_timeout")
            .map(|secs| {
                secs.parse::<u64>().map(Duration::from_secs).map_err(|_| {
                    ProcedureError::ConfigError(format!(
                        "connect_timeout must be a number of seconds, got '{secs}'"
                    ))
                })
            })
            .transpose()?;

        Ok(Self {
            application_name: extras.get("application_name").cloned(),
            connect_timeout,
            options: extras.get("options").cloned(),
        })
    }
}

/// Assemble the driver configuration from validated settings.
///
/// # Errors
/// Returns `ProcedureError::ConfigError` if the extras do not parse.
pub fn pg_config(settings: &ConnectionSettings) -> Result<tokio_postgres::Config, ProcedureError> {
    let extras = PostgresExtras::parse(settings.extras())?;

    let mut cfg = tokio_postgres::Config::new();
    cfg.host(settings.host())
        .port(settings.port())
        .dbname(settings.schema())
        .user(settings.username())
        .password(settings.password());
    if let Some(name) = &extras.application_name {
        cfg.application_name(name);
    }
    if let Some(timeout) = extras.connect_timeout {
        cfg.connect_timeout(timeout);
    }
    if let Some(options) = &extras.options {
        cfg.options(options);
    }
    Ok(cfg)
}
