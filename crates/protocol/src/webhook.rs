//! Discord-compatible webhook body built from a notification.

use serde::{Deserialize, Serialize};

use crate::notification::NotificationMessage;

/// A single embed inside a webhook message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
}

/// Top-level webhook request body.
///
/// `content` is always sent, even when empty; the notification text lives in
/// the single embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub content: String,
    pub embeds: Vec<Embed>,
}

impl From<&NotificationMessage> for Embed {
    fn from(msg: &NotificationMessage) -> Self {
        Self {
            title: msg.title.clone(),
            description: msg.description.clone(),
            color: msg.severity.color(),
        }
    }
}

impl From<&NotificationMessage> for WebhookPayload {
    fn from(msg: &NotificationMessage) -> Self {
        Self {
            content: String::new(),
            embeds: vec![Embed::from(msg)],
        }
    }
}
