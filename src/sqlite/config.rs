use std::collections::BTreeMap;
use std::time::Duration;

use rusqlite::{Connection, OpenFlags};

use crate::error::ProcedureError;

/// Parsed `SQLite` extras: `mode` (`ro`, `rw`, `rwc`) and `busy_timeout_ms`.
#[derive(Debug, Clone, Copy)]
pub struct SqliteExtras {
    pub flags: OpenFlags,
    pub busy_timeout: Option<Duration>,
}

impl Default for SqliteExtras {
    fn default() -> Self {
        Self {
            flags: mode_flags("rwc").unwrap_or_default(),
            busy_timeout: None,
        }
    }
}

fn mode_flags(mode: &str) -> Option<OpenFlags> {
    let base = OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    match mode {
        "ro" => Some(base | OpenFlags::SQLITE_OPEN_READ_ONLY),
        "rw" => Some(base | OpenFlags::SQLITE_OPEN_READ_WRITE),
        "rwc" => Some(base | OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE),
        _ => None,
    }
}

impl SqliteExtras {
    /// # Errors
    /// Returns `ProcedureError::ConfigError` for an unknown mode or a non-numeric timeout.
    pub fn parse(extras: &BTreeMap<String, String>) -> Result<Self, ProcedureError> {
        let mut parsed = Self::default();
        if let Some(mode) = extras.get("mode") {
            parsed.flags = mode_flags(mode).ok_or_else(|| {
                ProcedureError::ConfigError(format!("mode must be ro, rw or rwc, got '{mode}'"))
            })?;
        }
        if let Some(ms) = extras.get("busy_timeout_ms") {
            let ms: u64 = ms.parse().map_err(|_| {
                ProcedureError::ConfigError(format!("busy_timeout_ms must be an integer, got '{ms}'"))
            })?;
            parsed.busy_timeout = Some(Duration::from_millis(ms));
        }
        Ok(parsed)
    }

    /// Open a connection to `path` with these options applied.
    ///
    /// # Errors
    /// Returns the `rusqlite` error if the file cannot be opened or configured.
    pub fn open(&self, path: &str) -> rusqlite::Result<Connection> {
        self.open_with(path, self.flags)
    }

    /// Like [`SqliteExtras::open`], but a missing file is an error instead of being created.
    ///
    /// # Errors
    /// Returns the `rusqlite` error if the file does not exist or cannot be opened.
    pub fn open_existing(&self, path: &str) -> rusqlite::Result<Connection> {
        let mut flags = self.flags;
        flags.remove(OpenFlags::SQLITE_OPEN_CREATE);
        self.open_with(path, flags)
    }

    fn open_with(&self, path: &str, flags: OpenFlags) -> rusqlite::Result<Connection> {
        let conn = Connection::open_with_flags(path, flags)?;
        if let Some(timeout) = self.busy_timeout {
            conn.busy_timeout(timeout)?;
        }
        Ok(conn)
    }
}
