pub mod machine;
pub mod timer;

pub use machine::{PhaseChange, PhaseHook, PhaseStateMachine};
pub use timer::PhaseTimer;
