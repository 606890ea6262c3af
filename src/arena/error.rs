use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    ledger::{LedgerError, LedgerErrorKind},
    roster::{RosterError, RosterErrorKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchErrorKind {
    InvalidConfiguration,
    InvalidPlayerCount,
    NoDistributionForCount,
    NotStarted,
    AlreadyStarted,
    MatchFinished,
    InvalidPhase,
    ActorNotAlive,
    VoterNotAlive,
    UnknownPlayer,
    ActionNotPermitted,
    RuntimeClosed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchError {
    pub kind: MatchErrorKind,
    pub message: String,
}

impl MatchError {
    pub fn new(kind: MatchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Rejections of a single action; the match carries on.
    pub fn is_action_rejection(&self) -> bool {
        matches!(
            self.kind,
            MatchErrorKind::InvalidPhase
                | MatchErrorKind::ActorNotAlive
                | MatchErrorKind::VoterNotAlive
                | MatchErrorKind::UnknownPlayer
                | MatchErrorKind::ActionNotPermitted
        )
    }
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for MatchError {}

impl From<LedgerError> for MatchError {
    fn from(err: LedgerError) -> Self {
        let kind = match err.kind {
            LedgerErrorKind::InvalidPhase => MatchErrorKind::InvalidPhase,
            LedgerErrorKind::ActorNotAlive => MatchErrorKind::ActorNotAlive,
            LedgerErrorKind::VoterNotAlive => MatchErrorKind::VoterNotAlive,
            LedgerErrorKind::UnknownPlayer => MatchErrorKind::UnknownPlayer,
            LedgerErrorKind::MatchFinished => MatchErrorKind::MatchFinished,
        };
        MatchError::new(kind, err.message)
    }
}

impl From<RosterError> for MatchError {
    fn from(err: RosterError) -> Self {
        let kind = match err.kind {
            RosterErrorKind::NoDistributionForCount => MatchErrorKind::NoDistributionForCount,
            RosterErrorKind::InvalidDistribution => MatchErrorKind::InvalidConfiguration,
        };
        MatchError::new(kind, err.message)
    }
}

pub fn invalid_configuration(message: impl Into<String>) -> MatchError {
    MatchError::new(MatchErrorKind::InvalidConfiguration, message)
}

pub fn runtime_closed() -> MatchError {
    MatchError::new(MatchErrorKind::RuntimeClosed, "match runtime has stopped")
}
