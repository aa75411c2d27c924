// Runner service
// Speaks the integer status API on top of a CommandRunner port
use crate::domain::{CommandSpec, EXIT_SUCCESS};
use crate::port::CommandRunner;
use std::sync::Arc;
use tracing::{debug, error};

/// Runs commands and reports plain exit codes
///
/// Status codes:
/// - `0` success
/// - the child's own exit code when it is non-zero
/// - `1` when waiting on the child failed
/// - `255` when the child could not be started
pub struct CommandService {
    runner: Arc<dyn CommandRunner>,
}

impl CommandService {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Run `command` with `args` and return its status code
    ///
    /// # Example
    /// ```text
    /// let status = service.run_cmd("git", &["fetch", "--all"]).await;
    /// ```
    pub async fn run_cmd<S: AsRef<str>>(&self, command: &str, args: &[S]) -> i32 {
        let spec = build_spec(command, args);
        self.run(&spec).await
    }

    /// Run `command` with `args` and return the last stdout line with the status code
    pub async fn run_cmd_output<S: AsRef<str>>(&self, command: &str, args: &[S]) -> (String, i32) {
        let spec = build_spec(command, args);
        self.run_output(&spec).await
    }

    /// Run a prepared command and return its status code
    pub async fn run(&self, spec: &CommandSpec) -> i32 {
        match self.runner.run(spec).await {
            Ok(report) => {
                log_exit(spec, report.exit_code);
                report.exit_code
            }
            Err(e) => {
                error!(command = %spec, error = %e, "Command failed");
                e.exit_code()
            }
        }
    }

    /// Run a prepared command and return the last stdout line with the status code
    pub async fn run_output(&self, spec: &CommandSpec) -> (String, i32) {
        match self.runner.run_capture(spec).await {
            Ok(report) => {
                log_exit(spec, report.exit_code);
                (report.last_line, report.exit_code)
            }
            Err(e) => {
                error!(command = %spec, error = %e, "Command failed");
                (String::new(), e.exit_code())
            }
        }
    }
}

fn build_spec<S: AsRef<str>>(command: &str, args: &[S]) -> CommandSpec {
    CommandSpec::new(command).args(args.iter().map(|a| a.as_ref().to_string()))
}

fn log_exit(spec: &CommandSpec, exit_code: i32) {
    if exit_code == EXIT_SUCCESS {
        debug!(command = %spec, "Command done");
    } else {
        error!(command = %spec, exit_code, "Command exited with non-zero status");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::command_runner::mocks::{MockBehavior, MockCommandRunner};

    #[tokio::test]
    async fn test_success_returns_zero() {
        let runner = Arc::new(MockCommandRunner::new_success());
        let service = CommandService::new(runner.clone());

        assert_eq!(service.run_cmd("true", &[] as &[&str]).await, 0);
        assert_eq!(runner.calls(), vec![CommandSpec::new("true")]);
    }

    #[tokio::test]
    async fn test_exit_code_is_propagated() {
        let service = CommandService::new(Arc::new(MockCommandRunner::new_exit(42, "")));
        assert_eq!(service.run_cmd("sh", &["-c", "exit 42"]).await, 42);
    }

    #[tokio::test]
    async fn test_spawn_failure_returns_255() {
        let service =
            CommandService::new(Arc::new(MockCommandRunner::new_spawn_fail("not found")));
        assert_eq!(service.run_cmd("missing", &["x"]).await, 255);

        let (line, code) = service.run_cmd_output("missing", &["x"]).await;
        assert_eq!(line, "");
        assert_eq!(code, 255);
    }

    #[tokio::test]
    async fn test_wait_failure_returns_1() {
        let service = CommandService::new(Arc::new(MockCommandRunner::new_wait_fail("EINTR")));
        assert_eq!(service.run_cmd("sleep", &["1"]).await, 1);
        assert_eq!(service.run_cmd_output("sleep", &["1"]).await, (String::new(), 1));
    }

    #[tokio::test]
    async fn test_pipe_failure_returns_255_for_capture() {
        let service = CommandService::new(Arc::new(MockCommandRunner::new(MockBehavior::PipeFail)));
        assert_eq!(service.run_cmd_output("ls", &["-1"]).await, (String::new(), 255));
    }

    #[tokio::test]
    async fn test_capture_returns_last_line_with_code() {
        let service = CommandService::new(Arc::new(MockCommandRunner::new_exit(3, "partial")));
        let (line, code) = service.run_cmd_output("build", &["--all"]).await;
        assert_eq!(line, "partial");
        assert_eq!(code, 3);
    }

    #[tokio::test]
    async fn test_arguments_are_forwarded_in_order() {
        let runner = Arc::new(MockCommandRunner::new_success());
        let service = CommandService::new(runner.clone());

        let args = vec!["a".to_string(), "b c".to_string()];
        service.run_cmd("echo", &args).await;

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].arguments(), &["a".to_string(), "b c".to_string()]);
    }

    #[test]
    fn test_service_is_usable_from_sync_code() {
        let service = CommandService::new(Arc::new(MockCommandRunner::new_exit(7, "")));
        let code = tokio_test::block_on(service.run(&CommandSpec::new("x")));
        assert_eq!(code, 7);
    }
}
