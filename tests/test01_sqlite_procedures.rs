#![cfg(feature = "sqlite")]

mod common;

use common::{empty_db, seeded_db};
use sql_procedures::prelude::*;

#[test]
fn get_all_usernames_returns_every_row() -> Result<(), Box<dyn std::error::Error>> {
    let db = seeded_db("all_usernames");
    let mut executor = db.executor();

    let request = ProcedureRequest::new(Procedure::GetAllUsernames, Arguments::new())?;
    let statement = executor.execute_request(&request)?;

    assert_eq!(statement.sql(), "SELECT username FROM users");
    assert_eq!(statement.column_names(), ["username".to_string()]);
    let names: Vec<&str> = statement
        .rows()
        .iter()
        .filter_map(|row| row.get("username").and_then(RowValues::as_text))
        .collect();
    assert_eq!(names, vec!["ann", "bob"]);
    assert_eq!(statement.rows_affected(), 2);
    Ok(())
}

#[test]
fn get_user_by_key_binds_the_key() -> Result<(), Box<dyn std::error::Error>> {
    let db = seeded_db("by_key");
    let mut executor = db.executor();

    let request =
        ProcedureRequest::from_name("getUserByKey", Arguments::new().with("key", "a91kq02Lx7"))?;
    let statement = executor.execute_request(&request)?;

    assert_eq!(statement.sql(), "SELECT * FROM users WHERE key = :key");
    assert_eq!(statement.rows().len(), 1);
    let row = &statement.rows()[0];
    assert_eq!(row.get("username").and_then(RowValues::as_text), Some("bob"));
    assert_eq!(row.get("id"), Some(&RowValues::Int(2)));
    Ok(())
}

#[test]
fn username_alias_reaches_the_same_procedure() -> Result<(), Box<dyn std::error::Error>> {
    let db = seeded_db("alias");
    let mut executor = db.executor();

    let request = ProcedureRequest::from_name(
        "getUserByUsername",
        Arguments::new().with(":key", "f82ba7sMc1"),
    )?;
    assert_eq!(request.procedure(), Procedure::GetUserByKey);
    let statement = executor.execute_request(&request)?;
    assert_eq!(
        statement.rows()[0].get("username").and_then(RowValues::as_text),
        Some("ann")
    );
    Ok(())
}

#[test]
fn unmatched_key_returns_no_rows() -> Result<(), Box<dyn std::error::Error>> {
    let db = seeded_db("no_match");
    let mut executor = db.executor();

    let request = ProcedureRequest::from_name("getUserByKey", Arguments::new().with("key", "nope"))?;
    let statement = executor.execute_request(&request)?;
    assert!(statement.rows().is_empty());
    assert_eq!(statement.rows_affected(), 0);
    Ok(())
}

#[test]
fn unknown_procedure_never_opens_a_connection() {
    let db = empty_db("unknown");
    let mut executor = db.executor();

    executor.set_procedure("SELECT * FROM users");
    executor.set_arguments(Arguments::new());
    let err = executor.execute().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidProcedure);
    // Opening a connection in the default mode would have created the file.
    assert!(!db.path.exists());
}

#[test]
fn wrong_arity_never_opens_a_connection() {
    let db = empty_db("arity");
    let mut executor = db.executor();

    executor.set_procedure("getUserByKey");
    executor.set_arguments(Arguments::new().with("key", "a").with("extra", "b"));
    let err = executor.execute().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArguments);

    executor.clear();
    executor.set_procedure("getUserByKey");
    executor.set_arguments(Arguments::new());
    let err = executor.execute().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArguments);

    assert!(!db.path.exists());
}

#[test]
fn missing_table_is_a_generic_execution_error() {
    let db = empty_db("missing_table");
    let mut executor = db.executor();

    let request = ProcedureRequest::new(Procedure::GetAllUsernames, Arguments::new()).unwrap();
    let err = executor.execute_request(&request).unwrap_err();

    assert_eq!(err, ProcedureError::ExecutionError);
    assert_eq!(
        err.to_string(),
        "Database connection error - This has been logged and the admin has been notified"
    );
    assert_eq!(executor.last_insert_id().unwrap_err().kind(), ErrorKind::State);
}

#[test]
fn select_reports_zero_insert_id() -> Result<(), Box<dyn std::error::Error>> {
    let db = seeded_db("insert_id");
    let mut executor = db.executor();

    let request = ProcedureRequest::new(Procedure::GetAllUsernames, Arguments::new())?;
    let statement = executor.execute_request(&request)?;
    assert_eq!(statement.last_insert_id(), 0);
    assert_eq!(executor.last_insert_id()?, 0);
    Ok(())
}

#[test]
fn test_connection_reports_reachability() {
    let db = seeded_db("reachable");
    assert!(db.executor().test_connection());

    let missing = empty_db("read_only_missing");
    let settings = ConnectionSettings::builder(BackendKind::Sqlite)
        .schema(missing.path_str())
        .extra("mode", "ro")
        .build()
        .unwrap();
    let executor = ProcedureExecutor::new(settings).unwrap();
    assert!(!executor.test_connection());
    assert_eq!(
        executor.check_connection().unwrap_err(),
        ProcedureError::ConnectionError
    );
}

#[test]
fn test_connection_does_not_create_a_missing_database() {
    let missing = empty_db("ping_missing");
    let executor = missing.executor();

    assert!(!executor.test_connection());
    assert!(!missing.path.exists());
}

#[test]
fn executor_is_reusable_across_requests() -> Result<(), Box<dyn std::error::Error>> {
    let db = seeded_db("reuse");
    let mut executor = db.executor();

    for (key, expected) in [("f82ba7sMc1", "ann"), ("a91kq02Lx7", "bob")] {
        let request =
            ProcedureRequest::from_name("getUserByKey", Arguments::new().with("key", key))?;
        let statement = executor.execute_request(&request)?;
        assert_eq!(
            statement.rows()[0].get("username").and_then(RowValues::as_text),
            Some(expected)
        );
    }
    Ok(())
}
