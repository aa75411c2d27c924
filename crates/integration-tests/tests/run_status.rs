//! Exit status reporting for the plain runner

use cmdrun_integration_tests::{service, MISSING_PROGRAM};

#[tokio::test]
async fn test_successful_command_returns_zero() {
    let (service, _) = service(false);
    assert_eq!(service.run_cmd("true", &[] as &[&str]).await, 0);
}

#[tokio::test]
async fn test_failing_command_returns_its_code() {
    let (service, _) = service(false);
    assert_eq!(service.run_cmd("false", &[] as &[&str]).await, 1);

    for code in [2, 42, 254] {
        let script = format!("exit {}", code);
        assert_eq!(service.run_cmd("sh", &["-c", script.as_str()]).await, code);
    }
}

#[tokio::test]
async fn test_missing_command_returns_255() {
    let (service, _) = service(false);
    assert_eq!(service.run_cmd(MISSING_PROGRAM, &["--help"]).await, 255);
}

#[tokio::test]
async fn test_missing_command_returns_255_in_debug_mode() {
    let (service, sink) = service(true);
    assert_eq!(service.run_cmd(MISSING_PROGRAM, &[] as &[&str]).await, 255);
    assert!(sink.is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_killed_command_reports_signal() {
    let (service, _) = service(false);
    assert_eq!(service.run_cmd("sh", &["-c", "kill -TERM $$"]).await, 128 + 15);
}

#[tokio::test]
async fn test_invocations_are_independent() {
    let (service, _) = service(false);
    let (ok, failed) = tokio::join!(
        service.run_cmd("sh", &["-c", "sleep 0.1; exit 0"]),
        service.run_cmd("sh", &["-c", "exit 9"]),
    );
    assert_eq!(ok, 0);
    assert_eq!(failed, 9);
}
