//! Synchronous log cursor: line reads, truncation and rotation checks.

use std::fmt;
use std::fs::{File, Metadata};
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::error::TailError;

/// Byte offset into the log file.
///
/// Only moves forward, except when a truncation or a rotation reopen resets
/// it to [`LogPosition::START`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LogPosition(u64);

impl LogPosition {
    pub const START: Self = Self(0);

    pub fn offset(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LogPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One complete log record, without its line terminator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawLine(String);

impl RawLine {
    /// Creates a line, stripping a trailing `\n` or `\r\n` if present.
    pub fn new(text: impl Into<String>) -> Self {
        let mut text = text.into();
        if text.ends_with('\n') {
            text.pop();
            if text.ends_with('\r') {
                text.pop();
            }
        }
        Self(text)
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(String::from_utf8_lossy(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for RawLine {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RawLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reads complete lines from the end of a growing file.
///
/// Bytes after the last `\n` are held back until the writer finishes the line,
/// so a line is never split across two reads.
pub struct TailReader {
    path: PathBuf,
    reader: BufReader<File>,
    pending: Vec<u8>,
}

impl TailReader {
    /// Opens `path` and positions the cursor at end-of-file.
    ///
    /// Existing content is never returned, only what is appended afterwards.
    pub fn open_at_end(path: &Path) -> Result<Self, TailError> {
        let file = File::open(path).map_err(|source| TailError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut reader = BufReader::new(file);
        reader.seek(SeekFrom::End(0))?;

        Ok(Self {
            path: path.to_path_buf(),
            reader,
            pending: Vec::new(),
        })
    }

    /// Returns the followed path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the current cursor (bytes consumed so far).
    pub fn position(&mut self) -> io::Result<LogPosition> {
        self.reader.stream_position().map(LogPosition)
    }

    /// Reads the next complete line.
    ///
    /// Returns `Ok(None)` at end-of-stream, including when only a partial line
    /// is available. Invalid UTF-8 is replaced rather than rejected.
    pub fn read_line(&mut self) -> io::Result<Option<RawLine>> {
        let n = self.reader.read_until(b'\n', &mut self.pending)?;
        if n == 0 || self.pending.last() != Some(&b'\n') {
            return Ok(None);
        }

        let bytes = std::mem::take(&mut self.pending);
        Ok(Some(RawLine::from_bytes(&bytes)))
    }

    /// Rewinds to the start if the cursor is past the file's current size.
    ///
    /// Returns `true` when a truncation was detected.
    pub fn check_truncation(&mut self) -> io::Result<bool> {
        let position = self.position()?;
        let size = self.reader.get_ref().metadata()?.len();

        if position.offset() <= size {
            return Ok(false);
        }

        self.reader.seek(SeekFrom::Start(0))?;
        self.pending.clear();
        tracing::info!(
            file = %self.path.display(),
            position = %position,
            size,
            "log file truncated, reading from start"
        );
        Ok(true)
    }

    /// Reopens the file by path if the path now names a different file.
    ///
    /// A missing path means the rotation is still in progress; the current
    /// descriptor is kept. The switch also waits until the old file has been
    /// read to its end, so lines written just before rotation are not lost.
    /// Returns `true` when the file was reopened.
    pub fn check_rotation(&mut self) -> io::Result<bool> {
        let on_disk = match std::fs::metadata(&self.path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e),
        };
        let current = self.reader.get_ref().metadata()?;

        match (file_identity(&on_disk), file_identity(&current)) {
            (Some(path_id), Some(open_id)) if path_id != open_id => {}
            _ => return Ok(false),
        }

        let position = self.position()?;
        if position.offset() < current.len() {
            tracing::debug!(
                file = %self.path.display(),
                position = %position,
                size = current.len(),
                "log file rotated, draining old file first"
            );
            return Ok(false);
        }

        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e),
        };

        self.reader = BufReader::new(file);
        self.pending.clear();
        tracing::info!(file = %self.path.display(), "log file rotated, reopened");
        Ok(true)
    }
}

/// Device and inode of a file, where the platform exposes them.
#[cfg(unix)]
fn file_identity(meta: &Metadata) -> Option<(u64, u64)> {
    use std::os::unix::fs::MetadataExt;
    Some((meta.dev(), meta.ino()))
}

#[cfg(not(unix))]
fn file_identity(_meta: &Metadata) -> Option<(u64, u64)> {
    None
}
