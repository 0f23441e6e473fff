//! Notification severity, embed colours, and the transport-neutral message.

use serde::{Deserialize, Serialize};

/// Embed color for informational (server lifecycle) notifications.
pub const COLOR_BLUE: u32 = 43519;

/// Embed color for player presence notifications.
pub const COLOR_YELLOW: u32 = 16311836;

/// Embed color for achievement notifications.
pub const COLOR_GREEN: u32 = 12118406;

/// Visual weight of a notification, mapped to a fixed palette color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blue.
    Info,
    /// Yellow.
    Highlight,
    /// Green.
    Success,
}

impl Severity {
    /// Returns the palette color as a decimal RGB integer.
    pub fn color(self) -> u32 {
        match self {
            Self::Info => COLOR_BLUE,
            Self::Highlight => COLOR_YELLOW,
            Self::Success => COLOR_GREEN,
        }
    }
}

/// A notification ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub severity: Severity,
}

impl NotificationMessage {
    /// Creates a notification with an empty description.
    pub fn new(title: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            severity,
        }
    }

    /// Sets the description text.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
