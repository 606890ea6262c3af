use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterErrorKind {
    NoDistributionForCount,
    InvalidDistribution,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterError {
    pub kind: RosterErrorKind,
    pub message: String,
}

impl RosterError {
    pub fn new(kind: RosterErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for RosterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RosterError {}

pub fn no_distribution_for_count(count: usize) -> RosterError {
    RosterError::new(
        RosterErrorKind::NoDistributionForCount,
        format!("no role distribution for {count} players"),
    )
}

pub fn invalid_distribution(message: impl Into<String>) -> RosterError {
    RosterError::new(RosterErrorKind::InvalidDistribution, message)
}
