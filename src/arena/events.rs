use serde::{Deserialize, Serialize};

use crate::types::{ChatLine, Faction, MatchState, Phase, PlayerId, VoteTally};

/// Notifications published by a running match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchEvent {
    PhaseChanged {
        phase: Phase,
        turn: u32,
    },
    NightResolved {
        turn: u32,
        casualties: Vec<PlayerId>,
    },
    VotesResolved {
        turn: u32,
        tally: Vec<VoteTally>,
        eliminated: Option<PlayerId>,
    },
    ChatMessage {
        line: ChatLine,
    },
    MatchEnded {
        winner: Option<Faction>,
        state: Box<MatchState>,
    },
}
