use std::time::Duration;

use crate::{
    arena::error::{MatchError, invalid_configuration},
    config::MatchRulesConfig,
    roster::{
        DistributionTable, RoleDistribution,
        distribution::{MAX_SUPPORTED_PLAYERS, MIN_SUPPORTED_PLAYERS},
    },
    types::Phase,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDurations {
    pub night: Duration,
    pub day_report: Duration,
    pub day_discussion: Duration,
    pub day_vote: Duration,
}

impl PhaseDurations {
    /// `execution` has no timer of its own.
    pub fn for_phase(&self, phase: Phase) -> Option<Duration> {
        match phase {
            Phase::Night => Some(self.night),
            Phase::DayReport => Some(self.day_report),
            Phase::DayDiscussion => Some(self.day_discussion),
            Phase::DayVote => Some(self.day_vote),
            Phase::Execution => None,
        }
    }
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            night: Duration::from_secs(180),
            day_report: Duration::from_secs(60),
            day_discussion: Duration::from_secs(300),
            day_vote: Duration::from_secs(90),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRules {
    pub min_players: usize,
    pub max_players: usize,
    pub durations: PhaseDurations,
    pub distribution: DistributionTable,
}

impl MatchRules {
    pub fn new(
        min_players: usize,
        max_players: usize,
        durations: PhaseDurations,
        distribution: DistributionTable,
    ) -> Result<Self, MatchError> {
        if min_players < MIN_SUPPORTED_PLAYERS || max_players > MAX_SUPPORTED_PLAYERS {
            return Err(invalid_configuration(format!(
                "player range {min_players}..={max_players} is outside {MIN_SUPPORTED_PLAYERS}..={MAX_SUPPORTED_PLAYERS}"
            )));
        }
        if min_players > max_players {
            return Err(invalid_configuration(format!(
                "min_players {min_players} exceeds max_players {max_players}"
            )));
        }
        for phase in Phase::CYCLE {
            if durations.for_phase(phase).is_some_and(|duration| duration.is_zero()) {
                return Err(invalid_configuration(format!(
                    "duration for phase {phase} must be positive"
                )));
            }
        }
        distribution.validate()?;
        distribution
            .ensure_covers(min_players, max_players)
            .map_err(|err| invalid_configuration(err.message))?;

        Ok(Self {
            min_players,
            max_players,
            durations,
            distribution,
        })
    }

    pub fn from_config(config: &MatchRulesConfig) -> Result<Self, MatchError> {
        let durations = PhaseDurations {
            night: Duration::from_secs(config.phases.night_secs),
            day_report: Duration::from_secs(config.phases.day_report_secs),
            day_discussion: Duration::from_secs(config.phases.day_discussion_secs),
            day_vote: Duration::from_secs(config.phases.day_vote_secs),
        };
        let overrides = config
            .role_distribution
            .iter()
            .map(|(count, roles)| (*count, RoleDistribution::new(roles.iter().map(|(r, q)| (*r, *q)))));
        let distribution = DistributionTable::standard().with_overrides(overrides)?;

        Self::new(config.min_players, config.max_players, durations, distribution)
    }
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            min_players: MIN_SUPPORTED_PLAYERS,
            max_players: MAX_SUPPORTED_PLAYERS,
            durations: PhaseDurations::default(),
            distribution: DistributionTable::standard(),
        }
    }
}
