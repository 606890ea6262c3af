use serde::{Deserialize, Serialize};

use crate::types::{VoteRecord, VoteTally};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteResolution {
    /// Targets by descending vote count; equal counts keep first-vote order.
    pub tally: Vec<VoteTally>,
    pub eliminated: Option<String>,
}

/// Tallies one turn's votes. A tie at the maximum eliminates nobody.
pub fn resolve_votes(votes: &[VoteRecord], turn: u32) -> VoteResolution {
    let mut tally: Vec<VoteTally> = Vec::new();
    for vote in votes.iter().filter(|vote| vote.turn == turn) {
        match tally.iter_mut().find(|entry| entry.target_id == vote.target_id) {
            Some(entry) => entry.votes += 1,
            None => tally.push(VoteTally {
                target_id: vote.target_id.clone(),
                votes: 1,
            }),
        }
    }
    tally.sort_by(|left, right| right.votes.cmp(&left.votes));

    let eliminated = match tally.as_slice() {
        [] => None,
        [only] => Some(only.target_id.clone()),
        [first, second, ..] if first.votes > second.votes => Some(first.target_id.clone()),
        _ => None,
    };

    VoteResolution { tally, eliminated }
}
