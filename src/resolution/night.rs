use std::collections::HashSet;

use crate::types::{NightActionKind, NightActionRecord, Player};

/// Casualties of one night, in order of the first attack naming each target.
///
/// Protection fully dominates any number of attacks on the same target. Targets
/// that are not alive (or unknown) never become casualties.
pub fn resolve_night(actions: &[NightActionRecord], turn: u32, players: &[Player]) -> Vec<String> {
    let protected: HashSet<&str> = actions
        .iter()
        .filter(|action| action.turn == turn && action.kind == NightActionKind::Protect)
        .map(|action| action.target_id.as_str())
        .collect();

    let mut casualties: Vec<String> = Vec::new();
    for action in actions
        .iter()
        .filter(|action| action.turn == turn && action.kind == NightActionKind::Attack)
    {
        let target = action.target_id.as_str();
        if protected.contains(target) || casualties.iter().any(|id| id == target) {
            continue;
        }
        let alive = players
            .iter()
            .any(|player| player.id == target && player.is_alive());
        if alive {
            casualties.push(target.to_string());
        }
    }
    casualties
}
