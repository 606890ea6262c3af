use crate::{
    roster::catalog::is_wildcard,
    types::{Faction, FactionCounts, RoleName},
};

/// Winning faction for the given alive head-counts, checked in a fixed order:
///
/// 1. no ai and no third alive: human
/// 2. at least one ai alive and humans do not outnumber ai: ai
/// 3. the sole survivor holds the wildcard role: third
/// 4. otherwise the match continues
///
/// `sole_survivor` is the role of the last alive player when exactly one remains.
pub fn evaluate_winner(counts: FactionCounts, sole_survivor: Option<RoleName>) -> Option<Faction> {
    if counts.ai == 0 && counts.third == 0 {
        return Some(Faction::Human);
    }
    if counts.ai > 0 && counts.human <= counts.ai {
        return Some(Faction::Ai);
    }
    if counts.total() == 1 && sole_survivor.is_some_and(is_wildcard) {
        return Some(Faction::Third);
    }
    None
}
