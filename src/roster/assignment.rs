use rand::{Rng, seq::SliceRandom};

use crate::{
    roster::{
        catalog::role_for,
        distribution::DistributionTable,
        error::{RosterError, invalid_distribution},
    },
    types::{Player, RoleName},
};

/// Deals roles from the table row for `players.len()`, shuffled uniformly.
///
/// Players are left untouched when the table has no row for the count.
pub fn assign_roles<R: Rng + ?Sized>(
    players: &mut [Player],
    table: &DistributionTable,
    rng: &mut R,
) -> Result<(), RosterError> {
    let mut pool = table.get(players.len())?.expand();
    pool.shuffle(rng);
    assign_deal(players, table, pool)
}

/// Assigns an explicit role order positionally.
///
/// The deal must be a permutation of the table row for the player count.
pub fn assign_deal(
    players: &mut [Player],
    table: &DistributionTable,
    deal: Vec<RoleName>,
) -> Result<(), RosterError> {
    let distribution = table.get(players.len())?;

    let mut expected = distribution.expand();
    let mut offered = deal.clone();
    expected.sort();
    offered.sort();
    if expected != offered {
        return Err(invalid_distribution(format!(
            "deal of {} roles does not match the distribution for {} players",
            deal.len(),
            players.len()
        )));
    }

    for (player, role) in players.iter_mut().zip(deal) {
        player.role = Some(role_for(role));
    }
    Ok(())
}
