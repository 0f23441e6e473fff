//! Rule pattern set.

use serde::{Deserialize, Serialize};

/// Regular expressions for each line shape, in evaluation order.
///
/// Every pattern is anchored at line start and tolerates the bracketed
/// timestamp/thread prefix the server writes. Capture groups:
/// `player_joined` and `player_left` capture the player name, `advancement`
/// captures the player name then the advancement label.
///
/// Deserializing a partial table keeps the defaults for missing keys, so a
/// config file only needs to list the rules it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulePatterns {
    pub chat: String,
    pub server_starting: String,
    pub server_started: String,
    pub server_stopping: String,
    pub player_joined: String,
    pub player_left: String,
    pub advancement: String,
}

impl Default for RulePatterns {
    fn default() -> Self {
        Self {
            chat: r"^\[.*\]: <(.*)> (.*)".into(),
            server_starting: r"^\[.*\]: Starting minecraft server".into(),
            server_started: r#"^\[.*\]: Done \(.*\)! For help, type "help""#.into(),
            server_stopping: r"^\[.*\]: Stopping server".into(),
            player_joined: r"^\[.*\]: (.*) joined the game".into(),
            player_left: r"^\[.*\]: (.*) left the game".into(),
            advancement: r"^\[.*\]: (.*) has made the advancement \[(.*)\]".into(),
        }
    }
}
