// cmdrun Infrastructure - System Adapters
// Implements: CommandRunner, LineSink

pub mod console_sink;
pub mod line_streamer;
pub mod subprocess_runner;

pub use console_sink::ConsoleSink;
pub use line_streamer::{LineStreamer, StreamSummary};
pub use subprocess_runner::SubprocessRunner;
