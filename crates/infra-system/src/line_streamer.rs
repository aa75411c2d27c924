// Line streamer
// reason: tokio AsyncBufRead so forwarders drain pipes while the child runs
use std::future::Future;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{debug, warn};

use cmdrun_core::domain::StreamKind;
use cmdrun_core::port::LineSink;

/// What a drained stream produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamSummary {
    /// Number of lines read
    pub lines: usize,
    /// Last line read, without its terminator
    pub last_line: Option<String>,
    /// Everything recorded, if recording was enabled
    pub record: Option<String>,
}

/// Splits a byte stream into lines and forwards each one to a sink
///
/// Lines are split on `\n`; a trailing `\r` is stripped and invalid UTF-8 is
/// replaced. A final line without terminator is still forwarded.
pub struct LineStreamer {
    stream: StreamKind,
    sink: Option<Arc<dyn LineSink>>,
    record: Option<String>,
}

impl LineStreamer {
    /// Streamer forwarding every line to `sink`
    pub fn new(stream: StreamKind, sink: Arc<dyn LineSink>) -> Self {
        Self {
            stream,
            sink: Some(sink),
            record: None,
        }
    }

    /// Streamer that only counts lines and remembers the last one
    pub fn silent(stream: StreamKind) -> Self {
        Self {
            stream,
            sink: None,
            record: None,
        }
    }

    /// Also buffer every line so it can be inspected after draining
    pub fn with_record(mut self) -> Self {
        self.record = Some(String::new());
        self
    }

    /// Return the recording so far and reset it (empty if recording is off)
    pub fn take_record(&mut self) -> String {
        match self.record.as_mut() {
            Some(buf) => std::mem::take(buf),
            None => String::new(),
        }
    }

    /// Read `reader` to end-of-file
    ///
    /// A read error ends the stream early; it is logged and whatever was read
    /// before it is kept.
    pub async fn drain<R>(&mut self, reader: R) -> StreamSummary
    where
        R: AsyncRead + Unpin,
    {
        self.drain_until(reader, std::future::pending()).await
    }

    /// Read `reader` to end-of-file or until `stop` completes, whichever is first
    ///
    /// Bytes of an unterminated line read before `stop` are still forwarded.
    pub async fn drain_until<R, F>(&mut self, reader: R, stop: F) -> StreamSummary
    where
        R: AsyncRead + Unpin,
        F: Future<Output = ()>,
    {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        let mut summary = StreamSummary::default();
        tokio::pin!(stop);

        loop {
            buf.clear();
            let read = tokio::select! {
                read = reader.read_until(b'\n', &mut buf) => Some(read),
                _ = &mut stop => None,
            };
            let Some(read) = read else {
                debug!(stream = %self.stream, "Stream still open after exit, stopped reading");
                if !buf.is_empty() {
                    self.accept(&buf, &mut summary);
                }
                break;
            };
            match read {
                Ok(0) => break,
                Ok(_) => self.accept(&buf, &mut summary),
                Err(e) => {
                    warn!(stream = %self.stream, error = %e, "Stopped reading child output");
                    break;
                }
            }
        }

        summary.record = self.record.clone();
        summary
    }

    fn accept(&mut self, raw: &[u8], summary: &mut StreamSummary) {
        let line = decode_line(raw);
        self.forward(&line);
        summary.lines += 1;
        summary.last_line = Some(line);
    }

    fn forward(&mut self, line: &str) {
        if let Some(buf) = self.record.as_mut() {
            buf.push_str(line);
            buf.push('\n');
        }
        if let Some(sink) = &self.sink {
            sink.emit(self.stream, line);
        }
    }
}

fn decode_line(raw: &[u8]) -> String {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    String::from_utf8_lossy(raw).into_owned()
}
