#![allow(dead_code)]

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use sql_procedures::prelude::*;
use tempfile::TempDir;
use tracing_subscriber::fmt::MakeWriter;

/// A throwaway database directory; the directory is removed when this drops.
pub struct TestDb {
    _dir: TempDir,
    pub path: PathBuf,
}

impl TestDb {
    pub fn path_str(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    pub fn executor(&self) -> ProcedureExecutor {
        let settings = ConnectionSettings::sqlite(self.path_str()).expect("sqlite settings");
        ProcedureExecutor::new(settings).expect("executor")
    }
}

/// A path inside a fresh temp dir; no file is created.
pub fn empty_db(prefix: &str) -> TestDb {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(format!("{prefix}.db"));
    TestDb { _dir: dir, path }
}

/// A database with a `users` table holding two rows.
pub fn seeded_db(prefix: &str) -> TestDb {
    let db = empty_db(prefix);
    let conn = Connection::open(&db.path).expect("open seed connection");
    conn.execute_batch(
        "CREATE TABLE users (id INTEGER PRIMARY KEY, key TEXT NOT NULL, username TEXT NOT NULL);
         INSERT INTO users (key, username) VALUES ('f82ba7sMc1', 'ann');
         INSERT INTO users (key, username) VALUES ('a91kq02Lx7', 'bob');",
    )
    .expect("seed users");
    db
}

/// Collects formatted log output in memory.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        let buf = self.0.lock().expect("log buffer lock");
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Run `f` with a debug-level subscriber writing into this buffer.
    pub fn capture<T>(&self, f: impl FnOnce() -> T) -> T {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
