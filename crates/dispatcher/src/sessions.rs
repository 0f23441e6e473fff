//! Per-player join timestamps.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// Join time of every player seen joining since startup.
///
/// Entries are overwritten on rejoin and never removed. Owned by the single
/// dispatcher, so no locking.
#[derive(Debug, Default)]
pub struct PlayerSessions {
    joined: HashMap<String, DateTime<Utc>>,
}

impl PlayerSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records (or replaces) the join time for `name`.
    pub fn record_join(&mut self, name: &str, at: DateTime<Utc>) {
        self.joined.insert(name.to_string(), at);
    }

    /// Returns the last recorded join time for `name`.
    pub fn joined_at(&self, name: &str) -> Option<DateTime<Utc>> {
        self.joined.get(name).copied()
    }

    /// Time since `name` last joined, if known.
    pub fn session_length(&self, name: &str, now: DateTime<Utc>) -> Option<chrono::Duration> {
        self.joined_at(name).map(|joined| now - joined)
    }

    pub fn len(&self) -> usize {
        self.joined.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joined.is_empty()
    }
}
