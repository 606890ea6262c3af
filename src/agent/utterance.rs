use rand::{Rng, seq::SliceRandom};

use crate::{agent::error::GenerationError, types::Phase};

pub const DEFAULT_NOISE_PROBABILITY: f64 = 0.1;

/// Result of asking a bot for a discussion line.
#[derive(Debug, Clone, PartialEq)]
pub enum UtteranceOutcome {
    Generated { text: String, noised: bool },
    Fallback { text: String, cause: GenerationError },
    /// The backend answered with nothing worth saying.
    Silent,
}

impl UtteranceOutcome {
    pub fn text(&self) -> Option<&str> {
        match self {
            UtteranceOutcome::Generated { text, .. } | UtteranceOutcome::Fallback { text, .. } => {
                Some(text)
            }
            UtteranceOutcome::Silent => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, UtteranceOutcome::Fallback { .. })
    }
}

pub fn fallback_lines(phase: Phase) -> &'static [&'static str] {
    match phase {
        Phase::DayDiscussion => &[
            "I'd like to hear what everyone thinks.",
            "Nobody stands out to me yet, but...",
            "Let's watch a little longer.",
        ],
        Phase::DayVote => &[
            "This is a hard call.",
            "I still haven't made up my mind.",
            "I'll take everyone's votes into account.",
        ],
        _ => &["..."],
    }
}

pub fn pick_fallback<R: Rng + ?Sized>(phase: Phase, rng: &mut R) -> String {
    fallback_lines(phase)
        .choose(rng)
        .copied()
        .unwrap_or("...")
        .to_string()
}

/// Occasionally roughens a generated line so it reads less polished.
/// Returns the line and whether it was changed.
pub fn apply_human_noise<R: Rng + ?Sized>(
    text: String,
    probability: f64,
    rng: &mut R,
) -> (String, bool) {
    if probability <= 0.0 || !rng.gen_bool(probability.min(1.0)) {
        return (text, false);
    }

    let noised = match rng.gen_range(0..3) {
        0 => text.replacen("I ", "i ", 1),
        1 => format!("{text}..."),
        _ => format!("{text}!!"),
    };
    (noised, true)
}
