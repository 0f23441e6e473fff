//! Single-consumer dispatch loop.

use std::sync::Arc;

use chrono::Utc;
use craftwatch_classifier::{Classifier, Event};
use craftwatch_game_log::RawLine;
use craftwatch_protocol::NotificationMessage;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::format::notification_for;
use crate::notifier::Notifier;
use crate::sessions::PlayerSessions;

/// Counters reported when the dispatcher stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Lines taken from the queue.
    pub lines: u64,
    /// Notifications that reached the endpoint, whatever the final status.
    pub notified: u64,
    /// Notifications dropped after a transport error.
    pub failed: u64,
}

/// Turns queued log lines into delivered notifications, one at a time.
pub struct Dispatcher<N: Notifier> {
    classifier: Arc<Classifier>,
    notifier: N,
    sessions: PlayerSessions,
    stats: DispatchStats,
}

impl<N: Notifier> Dispatcher<N> {
    pub fn new(classifier: Arc<Classifier>, notifier: N) -> Self {
        Self {
            classifier,
            notifier,
            sessions: PlayerSessions::new(),
            stats: DispatchStats::default(),
        }
    }

    pub fn sessions(&self) -> &PlayerSessions {
        &self.sessions
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    /// Classifies `line`, updates player state, and returns the notification
    /// to deliver, if any.
    pub fn prepare(&mut self, line: &RawLine) -> Option<NotificationMessage> {
        let event = self.classifier.classify(line.as_str());

        match &event {
            Event::Unclassified => return None,
            Event::PlayerJoined { name } => self.sessions.record_join(name, Utc::now()),
            Event::PlayerLeft { name } => {
                if let Some(length) = self.sessions.session_length(name, Utc::now()) {
                    debug!(
                        player = %name,
                        minutes = length.num_minutes(),
                        "player session ended"
                    );
                }
            }
            _ => {}
        }

        debug!(kind = event.kind(), "classified log line");
        notification_for(&event)
    }

    /// Handles one line, awaiting delivery before returning.
    ///
    /// Delivery errors are logged and counted; the notification is dropped.
    pub async fn dispatch(&mut self, line: RawLine) {
        self.stats.lines += 1;

        let Some(message) = self.prepare(&line) else {
            return;
        };

        match self.notifier.notify(&message).await {
            Ok(()) => self.stats.notified += 1,
            Err(e) => {
                self.stats.failed += 1;
                warn!(title = %message.title, error = %e, "notification dropped");
            }
        }
    }

    /// Drains `lines` until the queue closes or `cancel` fires.
    ///
    /// On cancellation the in-flight delivery is abandoned and queued lines
    /// are dropped.
    pub async fn run(
        mut self,
        mut lines: mpsc::Receiver<RawLine>,
        cancel: CancellationToken,
    ) -> DispatchStats {
        info!("dispatcher started");

        loop {
            let line = tokio::select! {
                _ = cancel.cancelled() => break,
                next = lines.recv() => match next {
                    Some(line) => line,
                    None => break,
                },
            };

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = self.dispatch(line) => {}
            }
        }

        info!(
            lines = self.stats.lines,
            notified = self.stats.notified,
            failed = self.stats.failed,
            "dispatcher stopped"
        );
        self.stats
    }
}
