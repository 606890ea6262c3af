use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseChange {
    pub previous: Option<Phase>,
    pub phase: Phase,
    pub turn: u32,
    /// Bumped on every transition. Deadlines armed for an older epoch are stale.
    pub epoch: u64,
}

pub type PhaseHook = Box<dyn FnMut(&PhaseChange) + Send>;

/// Cyclic phase/turn controller.
///
/// `night -> day_report -> day_discussion -> day_vote -> execution -> night`, with
/// the turn counter incremented on every re-entry into night.
///
/// The machine holds no timer. Whoever drives it owns a `PhaseTimer` and arms it
/// with the epoch of each change; a deadline carrying an older epoch must be dropped.
pub struct PhaseStateMachine {
    phase: Phase,
    turn: u32,
    epoch: u64,
    finished: bool,
    hooks: BTreeMap<Phase, PhaseHook>,
}

impl PhaseStateMachine {
    pub fn new() -> Self {
        Self {
            phase: Phase::Night,
            turn: 1,
            epoch: 0,
            finished: false,
            hooks: BTreeMap::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Registers the entry hook for `phase`, replacing any previous one.
    pub fn on_enter(&mut self, phase: Phase, hook: PhaseHook) {
        self.hooks.insert(phase, hook);
    }

    /// Enters the first night and fires its hook.
    pub fn begin(&mut self) -> PhaseChange {
        self.phase = Phase::Night;
        self.turn = 1;
        self.epoch += 1;
        let change = PhaseChange {
            previous: None,
            phase: self.phase,
            turn: self.turn,
            epoch: self.epoch,
        };
        self.fire(&change);
        change
    }

    /// Moves to the next phase. Returns `None` once the match is finished.
    pub fn advance_phase(&mut self) -> Option<PhaseChange> {
        if self.finished {
            return None;
        }

        let previous = self.phase;
        self.phase = previous.next();
        if self.phase == Phase::Night {
            self.turn += 1;
        }
        self.epoch += 1;

        let change = PhaseChange {
            previous: Some(previous),
            phase: self.phase,
            turn: self.turn,
            epoch: self.epoch,
        };
        self.fire(&change);
        Some(change)
    }

    /// Terminal. Also invalidates the current epoch.
    pub fn mark_finished(&mut self) {
        self.finished = true;
        self.epoch += 1;
    }

    fn fire(&mut self, change: &PhaseChange) {
        if let Some(hook) = self.hooks.get_mut(&change.phase) {
            hook(change);
        }
    }
}

impl Default for PhaseStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
