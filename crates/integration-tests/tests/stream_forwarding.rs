//! Line forwarding in debug mode

use cmdrun_core::domain::StreamKind;
use cmdrun_integration_tests::service;

#[tokio::test]
async fn test_every_line_reaches_the_sink() {
    let (service, sink) = service(true);
    let status = service
        .run_cmd(
            "sh",
            &["-c", "echo a; echo e1 >&2; echo b; echo e2 >&2; printf tail"],
        )
        .await;

    assert_eq!(status, 0);
    assert_eq!(sink.lines_for(StreamKind::Stdout), vec!["a", "b", "tail"]);
    assert_eq!(sink.lines_for(StreamKind::Stderr), vec!["e1", "e2"]);
}

#[tokio::test]
async fn test_lines_forwarded_before_failure_status() {
    let (service, sink) = service(true);
    let status = service
        .run_cmd("sh", &["-c", "echo fatal: broken >&2; exit 128"])
        .await;

    assert_eq!(status, 128);
    assert_eq!(sink.lines_for(StreamKind::Stderr), vec!["fatal: broken"]);
}

#[tokio::test]
async fn test_quiet_mode_forwards_nothing() {
    let (service, sink) = service(false);
    service
        .run_cmd("sh", &["-c", "echo out; echo err >&2"])
        .await;
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_blank_lines_are_forwarded() {
    let (service, sink) = service(true);
    service.run_cmd("printf", &["x\\n\\ny\\n"]).await;
    assert_eq!(sink.lines_for(StreamKind::Stdout), vec!["x", "", "y"]);
}
