// Subprocess runner implementation
// reason: async-trait, tokio for async process management
use async_trait::async_trait;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncRead;
use tokio::process::{Child, Command};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use cmdrun_core::domain::{CommandSpec, StreamKind, EXIT_WAIT_FAILURE};
use cmdrun_core::error::RunError;
use cmdrun_core::port::{CaptureReport, CommandRunner, LineSink, RunReport};
use cmdrun_core::RunnerConfig;

use crate::console_sink::ConsoleSink;
use crate::line_streamer::{LineStreamer, StreamSummary};

/// How long a capturing run keeps reading after the child has exited
///
/// Background processes started by the child may inherit its pipes and keep
/// them open; output still buffered in the pipe is read within this window.
pub const POST_EXIT_DRAIN_GRACE: Duration = Duration::from_millis(250);

/// Subprocess runner
/// Spawns child processes and, in debug mode, forwards their output line by line
pub struct SubprocessRunner {
    config: RunnerConfig,
    sink: Arc<dyn LineSink>,
}

impl SubprocessRunner {
    /// Create a runner forwarding to `sink`
    ///
    /// # Arguments
    /// * `config` - Debug and colour settings
    /// * `sink` - Destination for forwarded lines (only used when debug is on)
    ///
    /// # Example
    /// ```ignore
    /// let runner = SubprocessRunner::new(
    ///     RunnerConfig::default().with_debug(true),
    ///     Arc::new(ConsoleSink::new(true)),
    /// );
    /// ```
    pub fn new(config: RunnerConfig, sink: Arc<dyn LineSink>) -> Self {
        Self { config, sink }
    }

    /// Create a runner printing forwarded lines to the terminal
    pub fn with_console(config: RunnerConfig) -> Self {
        let sink = Arc::new(ConsoleSink::new(config.color));
        Self::new(config, sink)
    }

    fn command(&self, spec: &CommandSpec, stdout: Stdio, stderr: Stdio) -> Command {
        let mut command = Command::new(spec.program());
        command
            .args(spec.arguments())
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr);
        command
    }

    /// Piped when forwarding, discarded otherwise
    fn forwarded_stdio(&self) -> Stdio {
        if self.config.debug {
            Stdio::piped()
        } else {
            Stdio::null()
        }
    }

    fn spawn(&self, spec: &CommandSpec, mut command: Command) -> Result<Child, RunError> {
        debug!(command = %spec, "RUNNING: {}", spec);
        command.spawn().map_err(|e| RunError::SpawnFailed {
            command: spec.program().to_string(),
            reason: e.to_string(),
        })
    }

    /// Spawn a forwarder for `reader`
    ///
    /// With `exited`, the forwarder stops [`POST_EXIT_DRAIN_GRACE`] after the
    /// child exits instead of waiting for end-of-file.
    fn forward<R>(
        &self,
        stream: StreamKind,
        reader: Option<R>,
        exited: Option<watch::Receiver<bool>>,
    ) -> Option<JoinHandle<StreamSummary>>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let reader = reader?;
        let mut streamer = LineStreamer::new(stream, self.sink.clone());
        if stream.is_error() {
            streamer = streamer.with_record();
        }
        Some(tokio::spawn(async move {
            match exited {
                Some(exited) => streamer.drain_until(reader, after_exit(exited)).await,
                None => streamer.drain(reader).await,
            }
        }))
    }

    /// Wait for the child to exit
    ///
    /// Forwarders are aborted if waiting fails.
    async fn wait_child(
        &self,
        spec: &CommandSpec,
        child: &mut Child,
        forwarders: &[JoinHandle<StreamSummary>],
    ) -> Result<ExitStatus, RunError> {
        child.wait().await.map_err(|e| {
            for handle in forwarders {
                handle.abort();
            }
            RunError::WaitFailed {
                command: spec.program().to_string(),
                reason: e.to_string(),
            }
        })
    }

    fn report_stderr(&self, spec: &CommandSpec, exit_code: i32, summaries: &[StreamSummary]) {
        if exit_code == 0 {
            return;
        }
        for record in summaries.iter().filter_map(|s| s.record.as_deref()) {
            if !record.is_empty() {
                debug!(command = %spec, exit_code, stderr = %record.trim_end(), "Recorded stderr");
            }
        }
    }
}

/// Resolves once `exited` flips to true, plus the drain grace period
async fn after_exit(mut exited: watch::Receiver<bool>) {
    // A dropped sender means the run is over as well
    let _ = exited.wait_for(|done| *done).await;
    tokio::time::sleep(POST_EXIT_DRAIN_GRACE).await;
}

async fn join_all(forwarders: Vec<JoinHandle<StreamSummary>>) -> Vec<StreamSummary> {
    let mut summaries = Vec::with_capacity(forwarders.len());
    for handle in forwarders {
        summaries.push(join_forwarder(handle).await);
    }
    summaries
}

async fn join_forwarder(handle: JoinHandle<StreamSummary>) -> StreamSummary {
    match handle.await {
        Ok(summary) => summary,
        Err(e) => {
            warn!(error = %e, "Output forwarder did not finish");
            StreamSummary::default()
        }
    }
}

/// Map an exit status to an integer code
///
/// A child killed by a signal has no exit code; it reports `128 + signal`.
fn status_code(spec: &CommandSpec, status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;

        if let Some(signal) = status.signal() {
            match nix::sys::signal::Signal::try_from(signal) {
                Ok(name) => warn!(command = %spec, signal = ?name, "Command killed by signal"),
                Err(_) => warn!(command = %spec, signal, "Command killed by unknown signal"),
            }
            return cmdrun_core::domain::signal_exit_code(signal);
        }
    }

    warn!(command = %spec, status = %status, "Unable to get process exit code");
    EXIT_WAIT_FAILURE
}

#[async_trait]
impl CommandRunner for SubprocessRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<RunReport, RunError> {
        let command = self.command(spec, self.forwarded_stdio(), self.forwarded_stdio());
        let mut child = self.spawn(spec, command)?;

        // Plain runs forward every line: drain to end-of-file
        let forwarders: Vec<_> = [
            self.forward(StreamKind::Stdout, child.stdout.take(), None),
            self.forward(StreamKind::Stderr, child.stderr.take(), None),
        ]
        .into_iter()
        .flatten()
        .collect();

        let status = self.wait_child(spec, &mut child, &forwarders).await?;
        let summaries = join_all(forwarders).await;
        let exit_code = status_code(spec, status);
        self.report_stderr(spec, exit_code, &summaries);

        Ok(RunReport { exit_code })
    }

    async fn run_capture(&self, spec: &CommandSpec) -> Result<CaptureReport, RunError> {
        let command = self.command(spec, Stdio::piped(), self.forwarded_stdio());
        let mut child = self.spawn(spec, command)?;

        let Some(stdout) = child.stdout.take() else {
            // Without stdout there is nothing to capture: do not leave the child running
            let _ = child.start_kill();
            let _ = child.wait().await;
            return Err(RunError::PipeFailed {
                command: spec.program().to_string(),
                stream: StreamKind::Stdout,
            });
        };

        let (exited_tx, exited_rx) = watch::channel(false);
        let capture_exited = exited_rx.clone();
        let capture = tokio::spawn(async move {
            let mut streamer = LineStreamer::silent(StreamKind::Stdout);
            streamer.drain_until(stdout, after_exit(capture_exited)).await
        });
        let mut forwarders = vec![capture];
        forwarders.extend(self.forward(StreamKind::Stderr, child.stderr.take(), Some(exited_rx)));

        let status = self.wait_child(spec, &mut child, &forwarders).await?;
        let _ = exited_tx.send(true);
        let summaries = join_all(forwarders).await;
        let exit_code = status_code(spec, status);
        self.report_stderr(spec, exit_code, &summaries[1..]);

        let last_line = summaries
            .into_iter()
            .next()
            .and_then(|s| s.last_line)
            .unwrap_or_default();

        Ok(CaptureReport {
            last_line,
            exit_code,
        })
    }
}
