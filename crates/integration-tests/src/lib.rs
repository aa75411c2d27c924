//! Shared fixtures for the end-to-end tests

use std::sync::Arc;

use cmdrun_core::port::line_sink::mocks::RecordingSink;
use cmdrun_core::{CommandService, RunnerConfig};
use cmdrun_infra_system::SubprocessRunner;

/// Program name guaranteed not to resolve on PATH
pub const MISSING_PROGRAM: &str = "cmdrun-definitely-not-installed";

/// Service backed by a real subprocess runner, recording forwarded lines
pub fn service(debug: bool) -> (CommandService, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let config = RunnerConfig::default().with_debug(debug).with_color(false);
    let runner = SubprocessRunner::new(config, sink.clone());
    (CommandService::new(Arc::new(runner)), sink)
}
