pub mod engine;
pub mod error;
pub mod events;
pub mod noop;
pub mod ports;
pub mod rules;
pub mod runtime;
pub mod types;

pub use engine::{BOT_NAMES, MatchEngine};
pub use error::{MatchError, MatchErrorKind};
pub use events::MatchEvent;
pub use noop::{NoopPersistence, NoopRating};
pub use ports::{PersistencePort, RatingPort};
pub use rules::{MatchRules, PhaseDurations};
pub use runtime::{
    LaunchedMatch, MatchCollaborators, MatchCommand, MatchHandle, MatchRuntime, RuntimeSettings,
};
pub use types::{MatchOutcome, NightActionReceipt, Participant};
