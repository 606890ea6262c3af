use std::sync::Arc;

use jin::{
    agent::{AgentMemory, UnavailableGenerator},
    types::{InvestigationVerdict, NightActionKind, Phase, PlayerStatus, RoleName},
};

use crate::support::{SELF_NAME, agent, line, table};

#[test]
fn given_repeated_hostile_updates_when_updating_memory_then_trust_stops_at_minus_one() {
    let mut memory = AgentMemory::new();
    let mut previous = memory.trust("p2");

    for index in 0..20 {
        memory.update("p2", "casts suspicion", &format!("accusation {index}"));
        let trust = memory.trust("p2");
        assert!(trust <= previous);
        assert!(trust >= -1.0);
        previous = trust;
    }

    assert_eq!(memory.trust("p2"), -1.0);
    let entry = memory.entry("p2").expect("entry created lazily");
    assert_eq!(entry.suspicious_actions.len(), 20);
    assert!(entry.has_note("accusation 19"));
}

#[test]
fn given_repeated_cooperative_updates_when_updating_memory_then_trust_stops_at_one() {
    let mut memory = AgentMemory::new();

    for _ in 0..30 {
        memory.update("p3", "cooperative", "agreed with me");
        assert!(memory.trust("p3") <= 1.0);
    }

    assert_eq!(memory.trust("p3"), 1.0);
    assert_eq!(memory.trust("unseen"), 0.0);
}

#[test]
fn given_no_observations_when_attacker_chooses_then_first_opponent_is_attacked() {
    let bot = agent(RoleName::Ai, Arc::new(UnavailableGenerator));

    let choice = bot
        .choose_night_target(&table(Phase::Night))
        .expect("attacker always has a target");

    assert_eq!(choice.kind, NightActionKind::Attack);
    assert_eq!(choice.target_id, "p2");
}

#[test]
fn given_claimed_engineer_and_sharp_accuser_when_attacker_chooses_then_engineer_scores_higher() {
    let mut bot = agent(RoleName::Ai, Arc::new(UnavailableGenerator));
    bot.learn_from_chat(&line("p2", "BOB-2", &format!("{SELF_NAME} is suspicious.")));
    bot.learn_from_chat(&line("p4", "DATA-9", "I am the engineer, trust the checks."));

    let choice = bot
        .choose_night_target(&table(Phase::Night))
        .expect("attack target");

    assert_eq!(choice.target_id, "p4");
}

#[test]
fn given_only_sharp_accuser_when_attacker_chooses_then_accuser_is_attacked() {
    let mut bot = agent(RoleName::Ai, Arc::new(UnavailableGenerator));
    bot.learn_from_chat(&line("p3", "CHAR-7", &format!("I suspect {SELF_NAME}.")));

    let choice = bot
        .choose_night_target(&table(Phase::Night))
        .expect("attack target");

    assert_eq!(choice.target_id, "p3");
}

#[test]
fn given_hostile_speaker_when_investigator_chooses_then_least_trusted_is_investigated() {
    let mut bot = agent(RoleName::Engineer, Arc::new(UnavailableGenerator));
    bot.learn_from_chat(&line("p3", "CHAR-7", "BOB-2 seems really shady to me"));

    let choice = bot
        .choose_night_target(&table(Phase::Night))
        .expect("investigation target");

    assert_eq!(choice.kind, NightActionKind::Investigate);
    assert_eq!(choice.target_id, "p3");
}

#[test]
fn given_cooperative_speaker_when_guardian_chooses_then_most_trusted_is_protected() {
    let mut bot = agent(RoleName::CyberGuard, Arc::new(UnavailableGenerator));
    bot.learn_from_chat(&line("p4", "DATA-9", "Good point, I agree with that."));

    let choice = bot
        .choose_night_target(&table(Phase::Night))
        .expect("protection target");

    assert_eq!(choice.kind, NightActionKind::Protect);
    assert_eq!(choice.target_id, "p4");
}

#[test]
fn given_claimed_engineer_when_guardian_chooses_then_engineer_is_preferred_over_trust() {
    let mut bot = agent(RoleName::CyberGuard, Arc::new(UnavailableGenerator));
    bot.learn_from_chat(&line("p4", "DATA-9", "Good point, I agree with that."));
    bot.learn_from_chat(&line("p3", "CHAR-7", "I'm the engineer."));

    let choice = bot
        .choose_night_target(&table(Phase::Night))
        .expect("protection target");

    assert_eq!(choice.target_id, "p3");
}

#[test]
fn given_role_without_night_action_when_choosing_then_none() {
    for role in [RoleName::Citizen, RoleName::Trickster, RoleName::FakeAi] {
        let bot = agent(role, Arc::new(UnavailableGenerator));
        assert!(bot.choose_night_target(&table(Phase::Night)).is_none());
    }
}

#[test]
fn given_mixed_trust_when_choosing_vote_then_lowest_trust_alive_opponent_is_picked() {
    let mut bot = agent(RoleName::Citizen, Arc::new(UnavailableGenerator));
    bot.update_memory("p2", "cooperative", "helped");
    bot.update_memory("p4", "casts suspicion", "dodged a question");
    bot.update_memory("p4", "casts suspicion", "voted oddly");

    let mut state = table(Phase::DayVote);
    assert_eq!(bot.choose_vote_target(&state).as_deref(), Some("p4"));

    state.players[3].status = PlayerStatus::Dead;
    assert_eq!(bot.choose_vote_target(&state).as_deref(), Some("p3"));
}

#[test]
fn given_no_alive_opponents_when_choosing_vote_then_none() {
    let bot = agent(RoleName::Citizen, Arc::new(UnavailableGenerator));
    let mut state = table(Phase::DayVote);
    for player in state.players.iter_mut().skip(1) {
        player.status = PlayerStatus::Dead;
    }

    assert!(bot.choose_vote_target(&state).is_none());
}

#[test]
fn given_ai_verdict_when_recording_investigation_then_target_is_suspected() {
    let mut bot = agent(RoleName::Engineer, Arc::new(UnavailableGenerator));

    bot.record_investigation("p2", InvestigationVerdict::Ai);
    bot.record_investigation("p3", InvestigationVerdict::NotAi);

    assert_eq!(bot.memory().guessed_role("p2"), Some(RoleName::Ai));
    assert!(bot.memory().trust("p2") < 0.0);
    assert!(bot.memory().trust("p3") > 0.0);
    assert_eq!(bot.choose_vote_target(&table(Phase::DayVote)).as_deref(), Some("p2"));
}

#[test]
fn given_own_chat_line_when_learning_then_memory_is_untouched() {
    let mut bot = agent(RoleName::Citizen, Arc::new(UnavailableGenerator));

    bot.learn_from_chat(&line("bot-1", SELF_NAME, "BOB-2 is suspicious"));

    assert!(bot.memory().is_empty());
    assert!(bot.transcript().is_empty());
}
