//! Compiled rule set.

use regex::{Captures, Regex};

use crate::error::ClassifierError;
use crate::event::Event;
use crate::rules::RulePatterns;

/// Maps raw log lines to [`Event`]s.
///
/// Patterns are compiled once in [`Classifier::new`]; the classifier is
/// immutable afterwards and can be shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Classifier {
    chat: Regex,
    server_starting: Regex,
    server_started: Regex,
    server_stopping: Regex,
    player_joined: Regex,
    player_left: Regex,
    advancement: Regex,
}

impl Classifier {
    /// Compiles every pattern in `patterns`.
    pub fn new(patterns: &RulePatterns) -> Result<Self, ClassifierError> {
        Ok(Self {
            chat: compile("chat", &patterns.chat)?,
            server_starting: compile("server_starting", &patterns.server_starting)?,
            server_started: compile("server_started", &patterns.server_started)?,
            server_stopping: compile("server_stopping", &patterns.server_stopping)?,
            player_joined: compile("player_joined", &patterns.player_joined)?,
            player_left: compile("player_left", &patterns.player_left)?,
            advancement: compile("advancement", &patterns.advancement)?,
        })
    }

    /// Returns `true` for player chat lines.
    pub fn is_chat(&self, line: &str) -> bool {
        self.chat.is_match(line)
    }

    /// Classifies a line. First matching rule wins.
    pub fn classify(&self, line: &str) -> Event {
        if self.is_chat(line) {
            return Event::Unclassified;
        }
        if self.server_starting.is_match(line) {
            return Event::ServerStarting;
        }
        if self.server_started.is_match(line) {
            return Event::ServerStarted;
        }
        if self.server_stopping.is_match(line) {
            return Event::ServerStopping;
        }
        if let Some(caps) = self.player_joined.captures(line) {
            return Event::PlayerJoined {
                name: group(&caps, 1),
            };
        }
        if let Some(caps) = self.player_left.captures(line) {
            return Event::PlayerLeft {
                name: group(&caps, 1),
            };
        }
        if let Some(caps) = self.advancement.captures(line) {
            return Event::AdvancementEarned {
                name: group(&caps, 1),
                advancement: group(&caps, 2),
            };
        }
        Event::Unclassified
    }
}

fn compile(rule: &'static str, pattern: &str) -> Result<Regex, ClassifierError> {
    Regex::new(pattern).map_err(|source| ClassifierError::InvalidPattern { rule, source })
}

/// Capture group text, empty when the group is missing or did not participate.
fn group(caps: &Captures<'_>, index: usize) -> String {
    caps.get(index)
        .map_or("", |m| m.as_str())
        .to_string()
}
