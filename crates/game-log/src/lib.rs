//! Game server log tailer.
//!
//! Follows a growing log file from its current end, hands every complete line
//! to a bounded queue, and recovers when the file is truncated in place or
//! replaced by log rotation.

mod error;
mod reader;
mod tailer;

pub use error::TailError;
pub use reader::{LogPosition, RawLine, TailReader};
pub use tailer::{EchoWriter, LineFilterFn, LogTailer, TailerConfig};
