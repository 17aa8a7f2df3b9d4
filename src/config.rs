use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use crate::error::ProcedureError;
use crate::types::BackendKind;

/// Extras understood by the `SQLite` backend.
pub const SQLITE_EXTRAS: &[&str] = &["mode", "busy_timeout_ms"];
/// Extras understood by the `PostgreSQL` backend.
pub const POSTGRES_EXTRAS: &[&str] = &["application_name", "connect_timeout", "options"];

/// Validated connection settings. Build one with [`ConnectionSettings::builder`]
/// or [`ConnectionSettings::from_json`]; there are no defaults to fall back on.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    backend: BackendKind,
    host: String,
    port: u16,
    schema: String,
    username: String,
    password: String,
    extras: BTreeMap<String, String>,
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("backend", &self.backend)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("schema", &self.schema)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("extras", &self.extras)
            .finish()
    }
}

impl ConnectionSettings {
    #[must_use]
    pub fn builder(backend: BackendKind) -> ConnectionSettingsBuilder {
        ConnectionSettingsBuilder::new(backend)
    }

    /// Shorthand for a `SQLite` database at `path`.
    ///
    /// # Errors
    /// Returns `ProcedureError::ConfigError` if `path` is empty.
    #[cfg(feature = "sqlite")]
    pub fn sqlite(path: impl Into<String>) -> Result<Self, ProcedureError> {
        Self::builder(BackendKind::Sqlite).schema(path).build()
    }

    /// Parse and validate settings from a JSON document such as
    /// `{"backend": "postgres", "host": "db", "port": 5432, "schema": "app",
    /// "username": "svc", "password": "pw"}`.
    ///
    /// # Errors
    /// Returns `ProcedureError::ConfigError` if the document is malformed or incomplete.
    pub fn from_json(json: &str) -> Result<Self, ProcedureError> {
        let raw: RawSettings = serde_json::from_str(json)
            .map_err(|e| ProcedureError::ConfigError(format!("invalid settings document: {e}")))?;
        raw.into_builder().build()
    }

    #[must_use]
    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    #[must_use]
    pub fn schema(&self) -> &str {
        &self.schema
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    #[must_use]
    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extras.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn extras(&self) -> &BTreeMap<String, String> {
        &self.extras
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSettings {
    backend: BackendKind,
    host: Option<String>,
    port: Option<u16>,
    schema: Option<String>,
    username: Option<String>,
    password: Option<String>,
    #[serde(default)]
    extras: BTreeMap<String, String>,
}

impl RawSettings {
    fn into_builder(self) -> ConnectionSettingsBuilder {
        ConnectionSettingsBuilder {
            backend: self.backend,
            host: self.host,
            port: self.port,
            schema: self.schema,
            username: self.username,
            password: self.password,
            extras: self.extras,
        }
    }
}

/// Fluent builder for [`ConnectionSettings`].
#[derive(Debug, Clone)]
pub struct ConnectionSettingsBuilder {
    backend: BackendKind,
    host: Option<String>,
    port: Option<u16>,
    schema: Option<String>,
    username: Option<String>,
    password: Option<String>,
    extras: BTreeMap<String, String>,
}

impl ConnectionSettingsBuilder {
    #[must_use]
    pub fn new(backend: BackendKind) -> Self {
        Self {
            backend,
            host: None,
            port: None,
            schema: None,
            username: None,
            password: None,
            extras: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Database name, or the database file path for `SQLite`.
    #[must_use]
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    #[must_use]
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    /// Validate and freeze the settings.
    ///
    /// # Errors
    /// Returns `ProcedureError::ConfigError` naming the first missing or invalid field.
    pub fn build(self) -> Result<ConnectionSettings, ProcedureError> {
        match self.backend {
            #[cfg(feature = "sqlite")]
            BackendKind::Sqlite => {
                required("schema", self.schema.as_deref())?;
                check_extras(&self.extras, SQLITE_EXTRAS)?;
                crate::sqlite::SqliteExtras::parse(&self.extras)?;
            }
            #[cfg(feature = "postgres")]
            BackendKind::Postgres => {
                required("host", self.host.as_deref())?;
                required("schema", self.schema.as_deref())?;
                required("username", self.username.as_deref())?;
                match self.port {
                    None | Some(0) => {
                        return Err(ProcedureError::ConfigError("port is required".to_string()));
                    }
                    Some(_) => {}
                }
                if self.password.is_none() {
                    return Err(ProcedureError::ConfigError(
                        "password is required".to_string(),
                    ));
                }
                check_extras(&self.extras, POSTGRES_EXTRAS)?;
                crate::postgres::PostgresExtras::parse(&self.extras)?;
            }
        }

        Ok(ConnectionSettings {
            backend: self.backend,
            host: self.host.unwrap_or_default(),
            port: self.port.unwrap_or_default(),
            schema: self.schema.unwrap_or_default(),
            username: self.username.unwrap_or_default(),
            password: self.password.unwrap_or_default(),
            extras: self.extras,
        })
    }
}

fn required(field: &str, value: Option<&str>) -> Result<(), ProcedureError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(ProcedureError::ConfigError(format!("{field} is required"))),
    }
}

fn check_extras(extras: &BTreeMap<String, String>, known: &[&str]) -> Result<(), ProcedureError> {
    match extras.keys().find(|key| !known.contains(&key.as_str())) {
        Some(key) => Err(ProcedureError::ConfigError(format!(
            "unknown extra option '{key}'"
        ))),
        None => Ok(()),
    }
}
