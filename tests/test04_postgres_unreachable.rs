#![cfg(feature = "postgres")]

use sql_procedures::prelude::*;

// Nothing listens on port 1, so every connection attempt is refused.
fn unreachable_executor() -> ProcedureExecutor {
    let settings = ConnectionSettings::builder(BackendKind::Postgres)
        .host("127.0.0.1")
        .port(1)
        .schema("app")
        .username("svc")
        .password("pw")
        .extra("connect_timeout", "2")
        .build()
        .expect("postgres settings");
    ProcedureExecutor::new(settings).expect("executor")
}

#[test]
fn test_connection_is_false_when_server_is_down() {
    let executor = unreachable_executor();
    assert!(!executor.test_connection());
}

#[test]
fn execute_reports_a_connection_error() {
    let mut executor = unreachable_executor();
    let request =
        ProcedureRequest::from_name("getUserByKey", Arguments::new().with("key", "k")).unwrap();

    let err = executor.execute_request(&request).unwrap_err();
    assert_eq!(err, ProcedureError::ConnectionError);
    assert_eq!(executor.last_insert_id().unwrap_err().kind(), ErrorKind::State);
}

#[test]
fn invalid_requests_fail_before_connecting() {
    let mut executor = unreachable_executor();
    executor.set_procedure("getUserByKey");
    executor.set_arguments(Arguments::new());
    // An arity error, not a connection error, proves nothing was dialled.
    assert_eq!(
        executor.execute().unwrap_err().kind(),
        ErrorKind::InvalidArguments
    );
}

#[test]
fn settings_from_json_build_an_executor() {
    let settings = ConnectionSettings::from_json(
        r#"{"backend": "postgres", "host": "127.0.0.1", "port": 1,
            "schema": "app", "username": "svc", "password": ""}"#,
    )
    .expect("settings");
    assert_eq!(settings.backend(), BackendKind::Postgres);
    assert!(ProcedureExecutor::new(settings).is_ok());
}
