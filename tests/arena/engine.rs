use std::time::Duration;

use rand::{SeedableRng, rngs::StdRng};

use jin::{
    arena::{BOT_NAMES, MatchEngine, MatchErrorKind, MatchRules, PhaseDurations},
    roster::DistributionTable,
    types::{Faction, FactionCounts, InvestigationVerdict, NightActionKind, Phase, RoleName},
};

use crate::support::{human_engine, rules_with};

const LONG: Duration = Duration::from_secs(600);

fn eight_player_deal() -> Vec<RoleName> {
    use RoleName::{Ai, Citizen, CyberGuard, Engineer, Trickster};
    vec![
        Ai, Citizen, Ai, Engineer, Citizen, CyberGuard, Citizen, Trickster,
    ]
}

fn advance_to(engine: &mut MatchEngine, phase: Phase) {
    while engine.phase() != phase {
        engine.advance_phase().expect("match is running");
    }
}

#[test]
fn given_eight_player_match_when_protected_night_and_split_vote_then_match_continues() {
    let mut engine = human_engine(8, LONG);
    let first = engine
        .start_with_deal(eight_player_deal())
        .expect("deal matches the 8 player row");
    assert_eq!(first.phase, Phase::Night);
    assert_eq!(first.turn, 1);

    engine
        .record_night_action("p1", "p5", NightActionKind::Attack)
        .expect("ai attacks");
    engine
        .record_night_action("p6", "p5", NightActionKind::Protect)
        .expect("guard protects");

    advance_to(&mut engine, Phase::DayReport);
    assert!(engine.resolve_night().is_empty());

    advance_to(&mut engine, Phase::DayVote);
    for voter in ["p1", "p3", "p4", "p5", "p6"] {
        engine.record_vote(voter, "p2").expect("vote for p2");
    }
    for voter in ["p2", "p7", "p8"] {
        engine.record_vote(voter, "p7").expect("vote for p7");
    }

    advance_to(&mut engine, Phase::Execution);
    let resolved = engine.resolve_votes();
    assert_eq!(resolved.eliminated.as_deref(), Some("p2"));
    assert_eq!(resolved.tally[0].votes, 5);
    assert_eq!(resolved.tally[1].votes, 3);

    assert_eq!(
        engine.state().faction_counts(),
        FactionCounts {
            human: 4,
            ai: 2,
            third: 1
        }
    );
    assert_eq!(engine.evaluate_winner(), None);
}

#[test]
fn given_too_few_players_when_starting_then_invalid_player_count_and_lobby_is_untouched() {
    let mut engine = human_engine(3, LONG);

    let err = engine
        .start(&mut StdRng::seed_from_u64(1))
        .expect_err("3 players cannot start");

    assert_eq!(err.kind, MatchErrorKind::InvalidPlayerCount);
    assert!(!engine.is_started());
    assert!(engine.state().players.iter().all(|player| player.role.is_none()));
    engine.add_player("p4", "P4", false).expect("lobby still open");
}

#[test]
fn given_started_match_when_joining_then_already_started() {
    let mut engine = human_engine(4, LONG);
    engine
        .start(&mut StdRng::seed_from_u64(1))
        .expect("4 players start");

    let err = engine
        .add_player("late", "Late", false)
        .expect_err("roster is locked");
    assert_eq!(err.kind, MatchErrorKind::AlreadyStarted);
}

#[test]
fn given_lobby_when_recording_action_then_not_started() {
    let mut engine = human_engine(4, LONG);

    let err = engine
        .record_night_action("p1", "p2", NightActionKind::Attack)
        .expect_err("no actions before start");
    assert_eq!(err.kind, MatchErrorKind::NotStarted);
}

#[test]
fn given_citizen_when_attacking_then_action_not_permitted() {
    use RoleName::{Ai, Citizen, Engineer};
    let mut engine = human_engine(4, LONG);
    engine
        .start_with_deal(vec![Ai, Engineer, Citizen, Citizen])
        .expect("valid deal");

    let err = engine
        .record_night_action("p3", "p1", NightActionKind::Attack)
        .expect_err("citizens have no night action");
    assert_eq!(err.kind, MatchErrorKind::ActionNotPermitted);

    let err = engine
        .record_night_action("p2", "p1", NightActionKind::Attack)
        .expect_err("engineers investigate");
    assert_eq!(err.kind, MatchErrorKind::ActionNotPermitted);
    assert!(engine.state().night_actions.is_empty());

    assert_eq!(
        engine.investigation_verdict("p1").expect("known player"),
        InvestigationVerdict::Ai
    );
    assert_eq!(
        engine.investigation_verdict("p4").expect("known player"),
        InvestigationVerdict::NotAi
    );
}

#[test]
fn given_night_phase_when_voting_then_invalid_phase_from_ledger() {
    let mut engine = human_engine(4, LONG);
    engine
        .start(&mut StdRng::seed_from_u64(3))
        .expect("4 players start");

    let err = engine.record_vote("p1", "p2").expect_err("no votes at night");
    assert_eq!(err.kind, MatchErrorKind::InvalidPhase);
    assert!(err.is_action_rejection());
}

#[test]
fn given_day_phase_when_night_action_is_not_entitled_then_invalid_phase_wins() {
    use RoleName::{Ai, Citizen, Engineer};
    let mut engine = human_engine(4, LONG);
    engine
        .start_with_deal(vec![Ai, Engineer, Citizen, Citizen])
        .expect("valid deal");
    advance_to(&mut engine, Phase::DayDiscussion);

    let err = engine
        .record_night_action("p3", "p1", NightActionKind::Attack)
        .expect_err("no night actions by day");
    assert_eq!(err.kind, MatchErrorKind::InvalidPhase);

    let err = engine
        .record_night_action("p2", "p1", NightActionKind::Attack)
        .expect_err("no night actions by day");
    assert_eq!(err.kind, MatchErrorKind::InvalidPhase);
}

#[test]
fn given_votes_for_a_dead_player_when_resolving_then_nobody_is_eliminated() {
    use RoleName::{Ai, Citizen, Engineer};
    let mut engine = human_engine(4, LONG);
    engine
        .start_with_deal(vec![Ai, Engineer, Citizen, Citizen])
        .expect("valid deal");
    engine
        .record_night_action("p1", "p3", NightActionKind::Attack)
        .expect("ai attacks");
    advance_to(&mut engine, Phase::DayReport);
    assert_eq!(engine.resolve_night(), vec!["p3".to_string()]);

    advance_to(&mut engine, Phase::DayVote);
    for voter in ["p1", "p2", "p4"] {
        engine.record_vote(voter, "p3").expect("target exists");
    }
    advance_to(&mut engine, Phase::Execution);
    let resolved = engine.resolve_votes();

    assert_eq!(resolved.tally[0].target_id, "p3");
    assert_eq!(resolved.tally[0].votes, 3);
    assert_eq!(resolved.eliminated, None);
    assert_eq!(engine.state().alive_players().count(), 3);
}

#[test]
fn given_finished_match_when_acting_or_advancing_then_nothing_moves() {
    use RoleName::{Ai, Citizen, Engineer};
    let mut engine = human_engine(4, LONG);
    engine
        .start_with_deal(vec![Ai, Engineer, Citizen, Citizen])
        .expect("valid deal");

    let outcome = engine.finish(Some(Faction::Human));

    assert!(engine.is_finished());
    assert_eq!(outcome.winner, Some(Faction::Human));
    assert!(outcome.participants[1].won);
    assert!(!outcome.participants[0].won);
    assert!(engine.advance_phase().is_none());
    let err = engine
        .record_night_action("p1", "p2", NightActionKind::Attack)
        .expect_err("finished match rejects actions");
    assert_eq!(err.kind, MatchErrorKind::MatchFinished);
}

#[test]
fn given_empty_lobby_when_adding_bots_then_seats_fill_with_distinct_names_up_to_max() {
    let mut engine = MatchEngine::new("m-bots", rules_with(LONG));

    let added = engine.add_bot_players(12).expect("lobby open");

    assert_eq!(added.len(), 10);
    let names: std::collections::BTreeSet<&str> = engine
        .state()
        .players
        .iter()
        .map(|player| player.name.as_str())
        .collect();
    assert_eq!(names.len(), 10);
    assert!(names.iter().all(|name| BOT_NAMES.contains(name)));
    assert!(engine.state().players.iter().all(|player| player.is_bot));
}

#[test]
fn given_out_of_range_rules_when_building_then_invalid_configuration() {
    let err = MatchRules::new(
        3,
        10,
        PhaseDurations::default(),
        DistributionTable::standard(),
    )
    .expect_err("3 is below the supported range");
    assert_eq!(err.kind, MatchErrorKind::InvalidConfiguration);

    let err = MatchRules::new(
        6,
        5,
        PhaseDurations::default(),
        DistributionTable::standard(),
    )
    .expect_err("min above max");
    assert_eq!(err.kind, MatchErrorKind::InvalidConfiguration);

    let err = MatchRules::new(
        4,
        10,
        PhaseDurations {
            day_vote: Duration::ZERO,
            ..PhaseDurations::default()
        },
        DistributionTable::standard(),
    )
    .expect_err("zero vote duration");
    assert_eq!(err.kind, MatchErrorKind::InvalidConfiguration);
}
