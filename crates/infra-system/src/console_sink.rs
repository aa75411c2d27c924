// Console line sink
// reason: chrono for log timestamps, colored for stream labels
use chrono::{DateTime, Local};
use colored::Colorize;
use std::io::Write;
use std::sync::Mutex;

use cmdrun_core::domain::StreamKind;
use cmdrun_core::port::LineSink;

const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Writes forwarded lines as `YYYY/MM/DD HH:MM:SS <label> <line>`
///
/// The `stdout` label is green, the `stderr` label red. One locked write per
/// line, so the two forwarders never interleave inside a line.
pub struct ConsoleSink {
    color: bool,
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    /// Sink writing to the process's stdout
    pub fn new(color: bool) -> Self {
        Self::with_writer(color, Box::new(std::io::stdout()))
    }

    pub fn with_writer(color: bool, out: Box<dyn Write + Send>) -> Self {
        Self {
            color,
            out: Mutex::new(out),
        }
    }

    fn format_line(&self, at: DateTime<Local>, stream: StreamKind, line: &str) -> String {
        let label = if !self.color {
            stream.label().to_string()
        } else if stream.is_error() {
            stream.label().red().to_string()
        } else {
            stream.label().green().to_string()
        };
        format!("{} {} {}\n", at.format(TIMESTAMP_FORMAT), label, line)
    }
}

impl LineSink for ConsoleSink {
    fn emit(&self, stream: StreamKind, line: &str) {
        let formatted = self.format_line(Local::now(), stream, line);
        // A poisoned lock only means another forwarder panicked mid-write
        let mut out = match self.out.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        // Console output is best effort: a closed stdout must not kill the run
        let _ = out.write_all(formatted.as_bytes());
        let _ = out.flush();
    }
}
