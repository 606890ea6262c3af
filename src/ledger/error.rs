use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerErrorKind {
    InvalidPhase,
    ActorNotAlive,
    VoterNotAlive,
    UnknownPlayer,
    MatchFinished,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerError {
    pub kind: LedgerErrorKind,
    pub message: String,
}

impl LedgerError {
    pub fn new(kind: LedgerErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for LedgerError {}

pub fn unknown_player(player_id: &str) -> LedgerError {
    LedgerError::new(
        LedgerErrorKind::UnknownPlayer,
        format!("player {player_id} is not part of this match"),
    )
}
