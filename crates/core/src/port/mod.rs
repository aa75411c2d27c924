// Port Layer - Interfaces implemented by adapters

pub mod command_runner;
pub mod line_sink;

// Re-exports
pub use command_runner::{CaptureReport, CommandRunner, RunReport};
pub use line_sink::LineSink;
