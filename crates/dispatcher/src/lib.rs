//! Notification dispatcher.
//!
//! Drains the raw line queue in arrival order. Each line is classified,
//! turned into a [`NotificationMessage`](craftwatch_protocol::NotificationMessage)
//! and delivered through a [`Notifier`] before the next line is taken, so
//! notifications go out in the order the events were logged.
//!
//! # Components
//!
//! - **Dispatcher**: the consumer loop
//! - **Format**: event to notification text and severity
//! - **Sessions**: player join timestamps
//! - **Notifier**: delivery seam, implemented for the webhook client

pub mod dispatcher;
pub mod error;
pub mod format;
pub mod notifier;
pub mod sessions;

pub use dispatcher::{DispatchStats, Dispatcher};
pub use error::DispatchError;
pub use format::notification_for;
pub use notifier::Notifier;
pub use sessions::PlayerSessions;
