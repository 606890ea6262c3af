pub mod adapters;
pub mod engine;
pub mod error;
pub mod memory;
pub mod noop;
pub mod personality;
pub mod ports;
pub mod prompts;
pub mod roster;
pub mod signals;
pub mod transcript;
pub mod utterance;

pub use engine::{AgentDecisionEngine, AgentLimits, NightChoice};
pub use error::{GenerationError, GenerationErrorKind};
pub use memory::{AgentMemory, AgentMemoryEntry};
pub use noop::UnavailableGenerator;
pub use personality::{Aggressiveness, Personality, SuspicionLevel};
pub use ports::{GenerationPort, GenerationRequest};
pub use roster::{BotRoster, BotSeat, SharedAgent};
pub use transcript::Transcript;
pub use utterance::UtteranceOutcome;
