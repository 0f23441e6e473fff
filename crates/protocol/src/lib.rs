//! Wire types shared by the craftwatch dispatcher and webhook client.
//!
//! [`NotificationMessage`] is the transport-neutral form produced from a
//! classified log event. [`WebhookPayload`] is its serialized shape on the
//! wire (Discord-compatible embed body).

pub mod notification;
pub mod webhook;

pub use notification::{COLOR_BLUE, COLOR_GREEN, COLOR_YELLOW, NotificationMessage, Severity};
pub use webhook::{Embed, WebhookPayload};
