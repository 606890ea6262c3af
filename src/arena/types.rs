use serde::{Deserialize, Serialize};

use crate::types::{
    Faction, InvestigationVerdict, MatchId, MatchState, NightActionKind, PlayerId, RoleName,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub player_id: PlayerId,
    pub name: String,
    pub is_bot: bool,
    pub role: Option<RoleName>,
    pub faction: Option<Faction>,
    pub survived: bool,
    pub won: bool,
}

/// Terminal record of a match, handed to persistence and rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub match_id: MatchId,
    pub winner: Option<Faction>,
    pub participants: Vec<Participant>,
    pub final_state: MatchState,
}

impl MatchOutcome {
    pub fn from_state(state: &MatchState) -> Self {
        let participants = state
            .players
            .iter()
            .map(|player| {
                let faction = player.faction();
                Participant {
                    player_id: player.id.clone(),
                    name: player.name.clone(),
                    is_bot: player.is_bot,
                    role: player.role_name(),
                    faction,
                    survived: player.is_alive(),
                    won: faction.is_some() && faction == state.winner,
                }
            })
            .collect();

        Self {
            match_id: state.id.clone(),
            winner: state.winner,
            participants,
            final_state: state.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightActionReceipt {
    pub actor_id: PlayerId,
    pub target_id: PlayerId,
    pub kind: NightActionKind,
    pub turn: u32,
    /// Present for investigations only; visible to the investigator alone.
    pub verdict: Option<InvestigationVerdict>,
}
