#![cfg(feature = "test-utils-postgres")]

use sql_procedures::prelude::*;
use sql_procedures::test_utils::EmbeddedPostgres;

const SCHEMA: &str = "
    CREATE TABLE users (
        id BIGSERIAL PRIMARY KEY,
        key TEXT NOT NULL,
        username TEXT NOT NULL
    );
    INSERT INTO users (key, username) VALUES ('f82ba7sMc1', 'ann'), ('a91kq02Lx7', 'bob');";

#[test]
fn test06_postgres_procedures() -> Result<(), Box<dyn std::error::Error>> {
    let pg = EmbeddedPostgres::start("procedures_db")?;
    let outcome = pg.seed(SCHEMA).and_then(|()| run_procedures(&pg));
    pg.stop();
    outcome
}

fn run_procedures(pg: &EmbeddedPostgres) -> Result<(), Box<dyn std::error::Error>> {
    let mut executor = ProcedureExecutor::new(pg.settings().clone())?;
    assert!(executor.test_connection());

    let all = executor.execute_request(&ProcedureRequest::from_name(
        "getAllUsernames",
        Arguments::new(),
    )?)?;
    let mut names: Vec<&str> = all
        .rows()
        .iter()
        .filter_map(|row| row.get("username").and_then(RowValues::as_text))
        .collect();
    names.sort_unstable();
    assert_eq!(names, vec!["ann", "bob"]);
    assert_eq!(all.rows_affected(), 2);
    assert_eq!(executor.last_insert_id()?, 0);

    // `:key` reaches the server as `$1`.
    let by_key = executor.execute_request(&ProcedureRequest::from_name(
        "getUserByKey",
        Arguments::new().with("key", "a91kq02Lx7"),
    )?)?;
    assert_eq!(by_key.sql(), "SELECT * FROM users WHERE key = $1");
    assert_eq!(by_key.rows().len(), 1);
    let row = &by_key.rows()[0];
    assert_eq!(row.get("id"), Some(&RowValues::Int(2)));
    assert_eq!(row.get("username").and_then(RowValues::as_text), Some("bob"));

    // An integer cannot be bound to the text column.
    let mismatched = ProcedureRequest::from_name(
        "getUserByKey",
        Arguments::new().with("key", 1234_i64),
    )?;
    assert_eq!(
        executor.execute_request(&mismatched).unwrap_err(),
        ProcedureError::ExecutionError
    );

    // Staged calls go through the same path.
    executor.set_procedure("getUserByUsername");
    executor.set_arguments(Arguments::new().with("key", "f82ba7sMc1"));
    let staged = executor.execute()?;
    assert_eq!(
        staged.rows()[0].get("username").and_then(RowValues::as_text),
        Some("ann")
    );
    assert_eq!(executor.errors(), "");
    executor.clear();

    #[cfg(feature = "trusted-raw")]
    insert_reports_last_insert_id(&mut executor)?;

    Ok(())
}

#[cfg(feature = "trusted-raw")]
fn insert_reports_last_insert_id(
    executor: &mut ProcedureExecutor,
) -> Result<(), Box<dyn std::error::Error>> {
    let sql = TrustedSql::new("INSERT INTO users (key, username) VALUES (:key, :username)")?;
    let args = Arguments::new().with("key", "zz9").with("username", "cat");
    let statement = executor.execute_trusted(&sql, &args)?;

    assert_eq!(
        statement.sql(),
        "INSERT INTO users (key, username) VALUES ($1, $2)"
    );
    assert_eq!(statement.rows_affected(), 1);
    assert_eq!(executor.last_insert_id()?, 3);
    Ok(())
}
