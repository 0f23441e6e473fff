//! Event to notification mapping.

use craftwatch_classifier::Event;
use craftwatch_protocol::{NotificationMessage, Severity};

/// Builds the notification for an event, or `None` for
/// [`Event::Unclassified`].
pub fn notification_for(event: &Event) -> Option<NotificationMessage> {
    let msg = match event {
        Event::ServerStarting => {
            NotificationMessage::new("Server starting... Please wait", Severity::Info)
        }
        Event::ServerStarted => {
            NotificationMessage::new("Server started! Ready to join!", Severity::Info)
        }
        Event::ServerStopping => NotificationMessage::new("Server stopping...", Severity::Info),
        Event::PlayerJoined { name } => {
            NotificationMessage::new(format!("{name} joined the game"), Severity::Highlight)
        }
        Event::PlayerLeft { name } => {
            NotificationMessage::new(format!("{name} left the game"), Severity::Highlight)
        }
        Event::AdvancementEarned { name, advancement } => NotificationMessage::new(
            format!("{name} has made the advancement"),
            Severity::Success,
        )
        .with_description(advancement.as_str()),
        Event::Unclassified => return None,
    };
    Some(msg)
}
