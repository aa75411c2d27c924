// Line Sink Port
// Destination for lines forwarded from a child's output streams

use crate::domain::StreamKind;

/// Receives complete lines (without their terminator) from a line streamer
///
/// Called concurrently from the stdout and stderr forwarders.
pub trait LineSink: Send + Sync {
    fn emit(&self, stream: StreamKind, line: &str);
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// Sink that keeps every emitted line in memory
    #[derive(Default)]
    pub struct RecordingSink {
        lines: Mutex<Vec<(StreamKind, String)>>,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }
        pub fn lines(&self) -> Vec<(StreamKind, String)> {
            self.lines.lock().unwrap().clone()
        }
        /// Lines received for one stream, in arrival order
        pub fn lines_for(&self, stream: StreamKind) -> Vec<String> {
            self.lines
                .lock()
                .unwrap()
                .iter()
                .filter(|(s, _)| *s == stream)
                .map(|(_, l)| l.clone())
                .collect()
        }
        pub fn is_empty(&self) -> bool {
            self.lines.lock().unwrap().is_empty()
        }
    }

    impl LineSink for RecordingSink {
        fn emit(&self, stream: StreamKind, line: &str) {
            self.lines.lock().unwrap().push((stream, line.to_string()));
        }
    }
}
