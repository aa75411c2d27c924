// Command Runner Port
// Abstraction for running an external command to completion

use crate::domain::CommandSpec;
use crate::error::RunError;
use async_trait::async_trait;

/// Outcome of a run whose exit status could be observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// OS exit code (non-zero codes are still a successful wait)
    pub exit_code: i32,
}

/// Outcome of a capturing run whose exit status could be observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureReport {
    /// Last line the child wrote to stdout (empty if it wrote none)
    pub last_line: String,
    pub exit_code: i32,
}

/// Command Runner trait
///
/// Implementations:
/// - SubprocessRunner: spawns an OS process (infra-system)
/// - MockCommandRunner: scripted results for tests
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command, forwarding its output when debug is enabled
    ///
    /// # Errors
    /// - RunError::SpawnFailed if the process cannot be started
    /// - RunError::WaitFailed if waiting on the process fails
    async fn run(&self, spec: &CommandSpec) -> Result<RunReport, RunError>;

    /// Run a command and capture the last line of its stdout
    ///
    /// # Errors
    /// - RunError::PipeFailed if stdout cannot be piped
    /// - RunError::SpawnFailed if the process cannot be started
    /// - RunError::WaitFailed if waiting on the process fails
    async fn run_capture(&self, spec: &CommandSpec) -> Result<CaptureReport, RunError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock runner behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Exit with the given code, printing `last_line` last
        Exit { code: i32, last_line: String },
        /// Fail to start
        SpawnFail(String),
        /// Fail to attach stdout
        PipeFail,
        /// Start, then fail while waiting
        WaitFail(String),
    }

    /// Mock Command Runner for testing
    pub struct MockCommandRunner {
        behavior: Arc<Mutex<MockBehavior>>,
        calls: Arc<Mutex<Vec<CommandSpec>>>,
    }

    impl MockCommandRunner {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior: Arc::new(Mutex::new(behavior)),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
        pub fn new_exit(code: i32, last_line: impl Into<String>) -> Self {
            Self::new(MockBehavior::Exit {
                code,
                last_line: last_line.into(),
            })
        }
        pub fn new_success() -> Self {
            Self::new_exit(0, "")
        }
        pub fn new_spawn_fail(reason: impl Into<String>) -> Self {
            Self::new(MockBehavior::SpawnFail(reason.into()))
        }
        pub fn new_wait_fail(reason: impl Into<String>) -> Self {
            Self::new(MockBehavior::WaitFail(reason.into()))
        }
        pub fn calls(&self) -> Vec<CommandSpec> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, spec: &CommandSpec) -> MockBehavior {
            self.calls.lock().unwrap().push(spec.clone());
            self.behavior.lock().unwrap().clone()
        }
    }

    fn failure(spec: &CommandSpec, behavior: MockBehavior) -> RunError {
        let command = spec.program().to_string();
        match behavior {
            MockBehavior::SpawnFail(reason) => RunError::SpawnFailed { command, reason },
            MockBehavior::PipeFail => RunError::PipeFailed {
                command,
                stream: crate::domain::StreamKind::Stdout,
            },
            MockBehavior::WaitFail(reason) => RunError::WaitFailed { command, reason },
            MockBehavior::Exit { .. } => unreachable!("exit is not a failure"),
        }
    }

    #[async_trait]
    impl CommandRunner for MockCommandRunner {
        async fn run(&self, spec: &CommandSpec) -> Result<RunReport, RunError> {
            match self.record(spec) {
                MockBehavior::Exit { code, .. } => Ok(RunReport { exit_code: code }),
                // stdout is never piped for a plain run
                MockBehavior::PipeFail => Ok(RunReport { exit_code: 0 }),
                other => Err(failure(spec, other)),
            }
        }

        async fn run_capture(&self, spec: &CommandSpec) -> Result<CaptureReport, RunError> {
            match self.record(spec) {
                MockBehavior::Exit { code, last_line } => Ok(CaptureReport {
                    last_line,
                    exit_code: code,
                }),
                other => Err(failure(spec, other)),
            }
        }
    }
}
