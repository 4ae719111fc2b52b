//! The build logger core
//!
//! [`BuildLogger`] writes every message to a console sink immediately and
//! appends it to a log file in the background. The file side is handled by a
//! single writer task fed over a channel, so file content order always
//! matches call order while callers never block on disk I/O. Append failures
//! are surfaced on the error sink and never reach the caller.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::sink::{ConsoleSink, StderrSink, StdoutSink};

/// Failure to open or create the log file
#[derive(Debug, Error)]
#[error("failed to open log file {}: {}", .path.display(), .source)]
pub struct OpenError {
    /// Path that could not be opened
    pub path: PathBuf,
    /// Underlying I/O error
    #[source]
    pub source: std::io::Error,
}

/// One-shot readiness signal for a [`BuildLogger`]
///
/// Resolves once the initial open/create attempt on the log file has
/// completed. `wait` consumes the signal, so it can only be observed once.
pub struct Readiness {
    path: PathBuf,
    rx: oneshot::Receiver<Result<(), OpenError>>,
}

impl Readiness {
    /// Wait for the open/create attempt to resolve
    ///
    /// Returns `Ok(())` when the file is usable for appending, or the open
    /// error otherwise. The logger stays usable either way; after a failed
    /// open, appends are attempted per message and their failures reported
    /// on the error sink.
    pub async fn wait(self) -> Result<(), OpenError> {
        match self.rx.await {
            Ok(result) => result,
            // The writer task signals readiness before it starts draining,
            // so a closed channel means the task itself was torn down.
            Err(_) => Err(OpenError {
                path: self.path,
                source: std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "log writer terminated before signaling readiness",
                ),
            }),
        }
    }
}

/// Dual-sink logger: immediate console output plus durable file appends
///
/// Informational messages go to the info sink, error messages to the error
/// sink; both are also appended to the log file, one line per message, in
/// call order, with no severity tag. The two outputs are independent: a
/// failing file append never blocks or corrupts the console stream.
pub struct BuildLogger {
    /// Log file path, fixed for the lifetime of the logger
    path: PathBuf,
    info_sink: Arc<dyn ConsoleSink>,
    error_sink: Arc<dyn ConsoleSink>,
    /// Submission side of the append channel
    tx: mpsc::UnboundedSender<String>,
    /// Writer task, joined on shutdown
    writer: JoinHandle<()>,
}

impl BuildLogger {
    /// Create a logger writing to the process stdout/stderr streams
    ///
    /// The returned [`Readiness`] resolves after the file at `path` has been
    /// opened (created if absent) in append mode, or after the open failed.
    pub fn new(path: impl Into<PathBuf>) -> (Self, Readiness) {
        Self::with_sinks(path, Arc::new(StdoutSink), Arc::new(StderrSink))
    }

    /// Create a logger with explicit console sinks
    pub fn with_sinks(
        path: impl Into<PathBuf>,
        info_sink: Arc<dyn ConsoleSink>,
        error_sink: Arc<dyn ConsoleSink>,
    ) -> (Self, Readiness) {
        let path = path.into();
        let (tx, rx) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = oneshot::channel();

        let writer = tokio::spawn(run_writer(
            path.clone(),
            Arc::clone(&error_sink),
            ready_tx,
            rx,
        ));

        let logger = Self {
            path,
            info_sink,
            error_sink,
            tx,
            writer,
        };
        let readiness = Readiness {
            path: logger.path.clone(),
            rx: ready_rx,
        };
        (logger, readiness)
    }

    /// Log an informational message
    ///
    /// Writes `message` to the info sink before returning and queues an
    /// append of `message` plus a newline to the log file. The append
    /// outcome is not reported to the caller; a failure produces a notice on
    /// the error sink.
    pub fn log(&self, message: &str) {
        self.info_sink.write_line(message);
        self.submit(message);
    }

    /// Log an error message
    ///
    /// Same contract as [`log`](Self::log), with the console side going to
    /// the error sink. The file entry is identical to one from `log`.
    pub fn error(&self, message: &str) {
        self.error_sink.write_line(message);
        self.submit(message);
    }

    /// Get the log file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drain all queued appends and release the file handle
    ///
    /// Every append submitted before this call has completed (or had its
    /// failure reported) by the time the future resolves.
    pub async fn shutdown(self) {
        let Self { tx, writer, .. } = self;
        drop(tx);
        let _ = writer.await;
    }

    fn submit(&self, message: &str) {
        // The receiver lives until the writer task exits, which only happens
        // once this sender is dropped; the send cannot fail here.
        let _ = self.tx.send(message.to_string());
    }
}

/// Writer task: open the file, signal readiness, then append queued lines
async fn run_writer(
    path: PathBuf,
    error_sink: Arc<dyn ConsoleSink>,
    ready_tx: oneshot::Sender<Result<(), OpenError>>,
    mut rx: mpsc::UnboundedReceiver<String>,
) {
    let mut file = match open_append(&path).await {
        Ok(file) => {
            debug!("opened log file {}", path.display());
            let _ = ready_tx.send(Ok(()));
            Some(file)
        }
        Err(source) => {
            let _ = ready_tx.send(Err(OpenError {
                path: path.clone(),
                source,
            }));
            None
        }
    };

    while let Some(line) = rx.recv().await {
        let result = match file.as_mut() {
            Some(file) => append_line(file, &line).await,
            // The initial open failed; each entry makes its own append
            // attempt with a fresh open.
            None => match open_append(&path).await {
                Ok(mut file) => append_line(&mut file, &line).await,
                Err(e) => Err(e),
            },
        };

        if let Err(e) = result {
            error_sink.write_line(&format!(
                "Error: failed to append to log file {}: {}",
                path.display(),
                e
            ));
        }
    }

    debug!("log writer for {} finished", path.display());
}

async fn open_append(path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
}

async fn append_line(file: &mut File, line: &str) -> std::io::Result<()> {
    file.write_all(line.as_bytes()).await?;
    file.write_all(b"\n").await?;
    file.flush().await
}
