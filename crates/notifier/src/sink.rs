//! Destinations for the notifier's status lines.

use std::io::Write;

/// Receives one human-readable status line at a time.
///
/// Writing is infallible from the notifier's point of view: a broken sink
/// must not turn into a build failure.
pub trait LogSink {
    fn write_line(&mut self, line: &str);
}

/// Collects lines in memory.
impl LogSink for Vec<String> {
    fn write_line(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

/// Forwards lines to any [`Write`] implementation, e.g. stdout or a build
/// console file.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    inner: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> LogSink for WriterSink<W> {
    fn write_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.inner, "{line}").and_then(|()| self.inner.flush()) {
            tracing::warn!(error = %e, "Failed to write notification log line");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn vec_sink_keeps_order() {
        let mut lines: Vec<String> = Vec::new();
        lines.write_line("first");
        lines.write_line("second");
        assert_eq!(lines, ["first", "second"]);
    }

    #[test]
    fn writer_sink_terminates_each_line() {
        let mut sink = WriterSink::new(Vec::new());
        sink.write_line("Data sent successfully!");
        sink.write_line("=====");
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(text, "Data sent successfully!\n=====\n");
    }

    #[test]
    fn writer_sink_swallows_write_errors() {
        let mut sink = WriterSink::new(BrokenWriter);
        sink.write_line("lost");
    }
}
