//! Pure resolution over a turn's recorded actions.
//!
//! Nothing here reads the ledger directly; callers pass the records for the turn.

pub mod night;
pub mod victory;
pub mod votes;

pub use night::resolve_night;
pub use victory::evaluate_winner;
pub use votes::{VoteResolution, resolve_votes};

use crate::types::{Player, PlayerStatus};

/// Flips the named players to dead. Returns how many were alive before.
pub fn mark_dead(players: &mut [Player], ids: &[String]) -> usize {
    let mut flipped = 0;
    for player in players
        .iter_mut()
        .filter(|player| player.is_alive() && ids.contains(&player.id))
    {
        player.status = PlayerStatus::Dead;
        flipped += 1;
    }
    flipped
}
