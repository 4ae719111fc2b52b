//! Console sinks
//!
//! A `ConsoleSink` is one of the two live output destinations of a
//! [`BuildLogger`](crate::logger::BuildLogger): informational messages go to
//! one sink, error messages (and append-failure notices) to the other. The
//! defaults are the process stdout/stderr streams; tests substitute a
//! [`MemorySink`] instead of stubbing global state.

use std::io::Write;
use std::sync::Mutex;

/// An output destination for log lines
///
/// Implementations receive one call per message, without a trailing newline;
/// the sink owns line termination.
///
/// # Object Safety
/// This trait is object-safe to allow `Arc<dyn ConsoleSink>` usage.
pub trait ConsoleSink: Send + Sync {
    /// Write a single message as one line
    fn write_line(&self, message: &str);
}

/// Sink backed by the process stdout stream
///
/// Stream write errors are ignored; the console is best-effort by contract.
pub struct StdoutSink;

impl ConsoleSink for StdoutSink {
    fn write_line(&self, message: &str) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{}", message);
        let _ = out.flush();
    }
}

/// Sink backed by the process stderr stream
pub struct StderrSink;

impl ConsoleSink for StderrSink {
    fn write_line(&self, message: &str) {
        let mut err = std::io::stderr().lock();
        let _ = writeln!(err, "{}", message);
        let _ = err.flush();
    }
}

/// Collecting sink that records every line in memory
///
/// Useful for asserting on console output in tests.
#[derive(Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Create an empty memory sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the recorded lines, in write order
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

impl ConsoleSink for MemorySink {
    fn write_line(&self, message: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(message.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemorySink::new();
        sink.write_line("one");
        sink.write_line("two");
        sink.write_line("three");
        assert_eq!(sink.lines(), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_memory_sink_starts_empty() {
        let sink = MemorySink::new();
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_sink_as_trait_object() {
        let concrete = Arc::new(MemorySink::new());
        let shared: Arc<dyn ConsoleSink> = Arc::clone(&concrete) as Arc<dyn ConsoleSink>;
        shared.write_line("via trait object");
        assert_eq!(concrete.lines(), vec!["via trait object"]);
    }

    #[test]
    fn test_memory_sink_shared_across_threads() {
        let sink = Arc::new(MemorySink::new());
        let mut handles = Vec::new();
        for i in 0..4 {
            let sink = Arc::clone(&sink);
            handles.push(std::thread::spawn(move || {
                sink.write_line(&format!("thread {}", i));
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(sink.lines().len(), 4);
    }
}
