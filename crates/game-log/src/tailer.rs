//! Async tail loop feeding the dispatch queue.
//!
//! Reads new lines as they are appended, echoes each one to stdout, and hands
//! the ones that pass the line filter to a bounded channel. At end-of-stream
//! it sleeps for the poll interval and checks for truncation and rotation.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::TailError;
use crate::reader::{LogPosition, RawLine, TailReader};

/// Predicate deciding whether a line is forwarded to the queue.
pub type LineFilterFn = Box<dyn Fn(&str) -> bool + Send + Sync + 'static>;

/// Destination for echoed lines.
pub type EchoWriter = Box<dyn Write + Send + 'static>;

/// Default interval between end-of-stream polls.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Tailer settings.
#[derive(Debug, Clone)]
pub struct TailerConfig {
    /// Sleep between polls once the end of the file is reached.
    pub poll_interval: Duration,
    /// Reopen the path when it starts naming a different file.
    pub follow_rotation: bool,
    /// Print every line read to stdout. Turned off after the first write
    /// error, such as a closed pipe.
    pub echo: bool,
}

impl Default for TailerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            follow_rotation: true,
            echo: true,
        }
    }
}

/// Follows a single log file.
pub struct LogTailer {
    reader: TailReader,
    config: TailerConfig,
    filter: Option<LineFilterFn>,
    echo_out: EchoWriter,
}

impl LogTailer {
    /// Opens the log file positioned at its end.
    pub fn open(path: &Path, config: TailerConfig) -> Result<Self, TailError> {
        let reader = TailReader::open_at_end(path)?;
        Ok(Self {
            reader,
            config,
            filter: None,
            echo_out: Box::new(std::io::stdout()),
        })
    }

    /// Installs a filter; lines for which it returns `false` are echoed but
    /// not forwarded.
    pub fn with_filter(mut self, filter: LineFilterFn) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Echoes to `out` instead of stdout.
    pub fn with_echo_writer(mut self, out: EchoWriter) -> Self {
        self.echo_out = out;
        self
    }

    /// Returns the current cursor.
    pub fn position(&mut self) -> Result<LogPosition, TailError> {
        Ok(self.reader.position()?)
    }

    /// Runs until cancelled, until the receiver is dropped, or until an I/O
    /// error makes further reading impossible.
    ///
    /// Sending blocks while the queue is full, so a slow consumer pauses
    /// reading instead of piling up pending sends.
    pub async fn run(
        mut self,
        lines: mpsc::Sender<RawLine>,
        cancel: CancellationToken,
    ) -> Result<(), TailError> {
        let file = self.reader.path().display().to_string();
        tracing::info!(%file, "started tailing log file");

        loop {
            if cancel.is_cancelled() {
                break;
            }

            let line = match self.reader.read_line() {
                Ok(Some(line)) => line,
                Ok(None) => {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(self.config.poll_interval) => {}
                    }
                    self.recover().inspect_err(|e| {
                        tracing::error!(%file, error = %e, "lost track of log file");
                    })?;
                    continue;
                }
                Err(e) => {
                    tracing::error!(%file, error = %e, "error reading log file");
                    return Err(e.into());
                }
            };

            if self.config.echo {
                self.echo(&line);
            }

            if let Some(filter) = &self.filter
                && !filter(line.as_str())
            {
                tracing::trace!(%line, "line filtered out");
                continue;
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                sent = lines.send(line) => {
                    if sent.is_err() {
                        tracing::debug!("line queue closed");
                        break;
                    }
                }
            }
        }

        tracing::info!(%file, "stopped tailing log file");
        Ok(())
    }

    /// Writes one line to the echo sink. A failed write disables echo for the
    /// rest of the run; tailing goes on.
    fn echo(&mut self, line: &RawLine) {
        let written = writeln!(self.echo_out, "{line}").and_then(|()| self.echo_out.flush());
        if let Err(e) = written {
            tracing::warn!(error = %e, "can't echo log lines, echo disabled");
            self.config.echo = false;
        }
    }

    /// Truncation first, then rotation.
    fn recover(&mut self) -> std::io::Result<()> {
        if self.reader.check_truncation()? {
            return Ok(());
        }
        if self.config.follow_rotation {
            self.reader.check_rotation()?;
        }
        Ok(())
    }
}
