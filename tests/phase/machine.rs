use std::sync::{Arc, Mutex};

use jin::{
    phase::{PhaseChange, PhaseStateMachine},
    types::Phase,
};

#[test]
fn given_started_machine_when_advancing_full_cycle_then_turn_increments_on_night() {
    let mut machine = PhaseStateMachine::new();
    let first = machine.begin();
    assert_eq!(first.phase, Phase::Night);
    assert_eq!(first.turn, 1);
    assert_eq!(first.previous, None);

    let mut seen = Vec::new();
    for _ in 0..5 {
        let change = machine.advance_phase().expect("machine is running");
        seen.push((change.phase, change.turn));
    }

    assert_eq!(
        seen,
        vec![
            (Phase::DayReport, 1),
            (Phase::DayDiscussion, 1),
            (Phase::DayVote, 1),
            (Phase::Execution, 1),
            (Phase::Night, 2),
        ]
    );
}

#[test]
fn given_every_transition_when_advancing_then_epoch_strictly_increases() {
    let mut machine = PhaseStateMachine::new();
    let mut last = machine.begin().epoch;

    for _ in 0..12 {
        let epoch = machine.advance_phase().expect("running").epoch;
        assert!(epoch > last);
        last = epoch;
    }
}

#[test]
fn given_entry_hooks_when_advancing_then_hook_fires_with_phase_and_turn() {
    let seen: Arc<Mutex<Vec<(Phase, u32)>>> = Arc::new(Mutex::new(Vec::new()));
    let mut machine = PhaseStateMachine::new();
    for phase in [Phase::Night, Phase::DayVote] {
        let seen = Arc::clone(&seen);
        machine.on_enter(
            phase,
            Box::new(move |change: &PhaseChange| {
                seen.lock()
                    .expect("hook lock")
                    .push((change.phase, change.turn));
            }),
        );
    }

    machine.begin();
    for _ in 0..5 {
        machine.advance_phase();
    }

    assert_eq!(
        *seen.lock().expect("hook lock"),
        vec![(Phase::Night, 1), (Phase::DayVote, 1), (Phase::Night, 2)]
    );
}

#[test]
fn given_finished_machine_when_advancing_then_nothing_changes() {
    let mut machine = PhaseStateMachine::new();
    machine.begin();
    machine.advance_phase();
    let epoch = machine.epoch();

    machine.mark_finished();

    assert!(machine.is_finished());
    assert!(machine.epoch() > epoch);
    assert!(machine.advance_phase().is_none());
    assert_eq!(machine.phase(), Phase::DayReport);
    assert_eq!(machine.turn(), 1);
}
