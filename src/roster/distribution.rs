use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    roster::error::{RosterError, invalid_distribution, no_distribution_for_count},
    types::RoleName,
};

pub const MIN_SUPPORTED_PLAYERS: usize = 4;
pub const MAX_SUPPORTED_PLAYERS: usize = 10;

/// Role quantities for one player count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleDistribution(BTreeMap<RoleName, u8>);

impl RoleDistribution {
    pub fn new(entries: impl IntoIterator<Item = (RoleName, u8)>) -> Self {
        Self(
            entries
                .into_iter()
                .filter(|(_, quantity)| *quantity > 0)
                .collect(),
        )
    }

    pub fn quantity(&self, role: RoleName) -> u8 {
        self.0.get(&role).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.values().map(|quantity| usize::from(*quantity)).sum()
    }

    /// Flat role multiset in catalog order.
    pub fn expand(&self) -> Vec<RoleName> {
        self.0
            .iter()
            .flat_map(|(role, quantity)| std::iter::repeat_n(*role, usize::from(*quantity)))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RoleName, u8)> + '_ {
        self.0.iter().map(|(role, quantity)| (*role, *quantity))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionTable {
    rows: BTreeMap<usize, RoleDistribution>,
}

impl DistributionTable {
    pub fn standard() -> Self {
        use RoleName::{Ai, Citizen, CyberGuard, Engineer, Trickster};

        let rows = [
            (4, [(Ai, 1), (Engineer, 1), (CyberGuard, 0), (Citizen, 2), (Trickster, 0)]),
            (5, [(Ai, 1), (Engineer, 1), (CyberGuard, 1), (Citizen, 2), (Trickster, 0)]),
            (6, [(Ai, 1), (Engineer, 1), (CyberGuard, 1), (Citizen, 3), (Trickster, 0)]),
            (7, [(Ai, 2), (Engineer, 1), (CyberGuard, 1), (Citizen, 3), (Trickster, 0)]),
            (8, [(Ai, 2), (Engineer, 1), (CyberGuard, 1), (Citizen, 3), (Trickster, 1)]),
            (9, [(Ai, 2), (Engineer, 1), (CyberGuard, 1), (Citizen, 4), (Trickster, 1)]),
            (10, [(Ai, 3), (Engineer, 1), (CyberGuard, 1), (Citizen, 4), (Trickster, 1)]),
        ];

        Self {
            rows: rows
                .into_iter()
                .map(|(count, entries)| (count, RoleDistribution::new(entries)))
                .collect(),
        }
    }

    pub fn from_rows(rows: BTreeMap<usize, RoleDistribution>) -> Result<Self, RosterError> {
        let table = Self { rows };
        table.validate()?;
        Ok(table)
    }

    /// Replaces individual rows of the table. The result is validated as a whole.
    pub fn with_overrides(
        mut self,
        overrides: impl IntoIterator<Item = (usize, RoleDistribution)>,
    ) -> Result<Self, RosterError> {
        for (count, distribution) in overrides {
            self.rows.insert(count, distribution);
        }
        self.validate()?;
        Ok(self)
    }

    pub fn get(&self, count: usize) -> Result<&RoleDistribution, RosterError> {
        self.rows
            .get(&count)
            .ok_or_else(|| no_distribution_for_count(count))
    }

    pub fn counts(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.keys().copied()
    }

    pub fn validate(&self) -> Result<(), RosterError> {
        for (count, distribution) in &self.rows {
            if distribution.total() != *count {
                return Err(invalid_distribution(format!(
                    "distribution for {count} players deals {} roles",
                    distribution.total()
                )));
            }
        }
        Ok(())
    }

    pub fn ensure_covers(&self, min_players: usize, max_players: usize) -> Result<(), RosterError> {
        for count in min_players..=max_players {
            self.get(count)?;
        }
        Ok(())
    }
}

impl Default for DistributionTable {
    fn default() -> Self {
        Self::standard()
    }
}
