/// A notable occurrence recognized in a log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ServerStarting,
    ServerStarted,
    ServerStopping,
    PlayerJoined { name: String },
    PlayerLeft { name: String },
    AdvancementEarned { name: String, advancement: String },
    /// Chat, or no rule matched. Never notified.
    Unclassified,
}

impl Event {
    pub fn is_unclassified(&self) -> bool {
        matches!(self, Self::Unclassified)
    }

    /// Short stable name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ServerStarting => "server_starting",
            Self::ServerStarted => "server_started",
            Self::ServerStopping => "server_stopping",
            Self::PlayerJoined { .. } => "player_joined",
            Self::PlayerLeft { .. } => "player_left",
            Self::AdvancementEarned { .. } => "advancement_earned",
            Self::Unclassified => "unclassified",
        }
    }
}
