#![cfg(all(feature = "sqlite", feature = "trusted-raw"))]

mod common;

use common::seeded_db;
use sql_procedures::prelude::*;

#[test]
fn trusted_sql_runs_verbatim_and_reports_insert_id() -> Result<(), Box<dyn std::error::Error>> {
    let db = seeded_db("trusted_insert");
    let mut executor = db.executor();

    let sql = TrustedSql::new("INSERT INTO users (key, username) VALUES (:key, :username)")?;
    let args = Arguments::new().with("key", "zz9").with("username", "cat");
    let statement = executor.execute_trusted(&sql, &args)?;

    assert_eq!(statement.sql(), sql.as_str());
    assert_eq!(statement.rows_affected(), 1);
    assert_eq!(statement.last_insert_id(), 3);
    assert_eq!(executor.last_insert_id()?, 3);

    let request = ProcedureRequest::from_name("getUserByKey", Arguments::new().with("key", "zz9"))?;
    let found = executor.execute_request(&request)?;
    assert_eq!(
        found.rows()[0].get("username").and_then(RowValues::as_text),
        Some("cat")
    );
    Ok(())
}

#[test]
fn trusted_sql_still_needs_its_arguments() {
    let db = seeded_db("trusted_args");
    let mut executor = db.executor();

    let sql = TrustedSql::new("DELETE FROM users WHERE key = :key").unwrap();
    let err = executor.execute_trusted(&sql, &Arguments::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArguments);
}

#[test]
fn empty_trusted_sql_is_rejected() {
    assert_eq!(
        TrustedSql::new("  ").unwrap_err().kind(),
        ErrorKind::InvalidProcedure
    );
}
