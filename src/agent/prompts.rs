use crate::types::{Faction, Phase, RoleName};

use super::personality::Personality;

pub struct DiscussionPromptInput<'a> {
    pub speaker_name: &'a str,
    pub role: RoleName,
    pub faction: Faction,
    pub personality: &'a Personality,
    pub phase: Phase,
    pub turn: u32,
    pub alive_count: usize,
    pub threat_level: u8,
    pub transcript_excerpt: &'a [String],
    pub max_output_tokens: u32,
}

pub fn build_discussion_prompt(input: &DiscussionPromptInput<'_>) -> String {
    let recent_chat = if input.transcript_excerpt.is_empty() {
        "(nobody has spoken yet)".to_string()
    } else {
        input.transcript_excerpt.join("\n")
    };

    format!(
        "You are playing the social deduction game Project JIN.\n\
         \n\
         ## Who you are\n\
         - Name: {name}\n\
         - Role: {role}\n\
         - Faction: {faction}\n\
         - Personality: {traits}\n\
         - Speaking style: {style}\n\
         \n\
         ## Situation\n\
         - Turn: {turn}\n\
         - Phase: {phase}\n\
         - Players alive: {alive}\n\
         - Threat against you: {threat}/5\n\
         \n\
         ## Recent conversation\n\
         {recent_chat}\n\
         \n\
         ## Instructions\n\
         {instructions}\n\
         \n\
         {guidance}\n\
         Reply with a single chat message of at most {tokens} tokens.",
        name = input.speaker_name,
        role = input.role,
        faction = input.faction,
        traits = input.personality.traits.join(", "),
        style = input.personality.speaking_style,
        turn = input.turn,
        phase = input.phase,
        alive = input.alive_count,
        threat = input.threat_level,
        instructions = role_instructions(input.role, input.faction),
        guidance = threat_guidance(input.threat_level),
        tokens = input.max_output_tokens,
    )
}

fn role_instructions(role: RoleName, faction: Faction) -> &'static str {
    if faction == Faction::Ai {
        return "You are on the AI side. Pass as human and do not get exposed. Your goal is to \
                find and remove the engineer and the cyber guard. Sometimes you must abandon an \
                ally. Do not sound too logical; show some emotion.";
    }
    match role {
        RoleName::Engineer => {
            "You are the engineer. Reveal your investigation results at the right moment and \
             expose the AI side. Someone may falsely claim to be the engineer, so stay careful."
        }
        RoleName::CyberGuard => {
            "You are the cyber guard. Protect key players from AI attacks, prioritising the \
             engineer and players you trust."
        }
        RoleName::Trickster => {
            "You are the trickster. Survive to the very end by keeping both sides busy with \
             each other."
        }
        _ => {
            "You are a citizen. Take part in the discussion and find the suspicious players, \
             using what the role holders share to remove the AI side."
        }
    }
}

fn threat_guidance(threat_level: u8) -> &'static str {
    match threat_level {
        0..=1 => "Nobody is after you: discuss normally.",
        2..=3 => "Some suspicion is on you: defend yourself lightly or change the subject.",
        _ => "You are under heavy suspicion: push back firmly and shift the blame onto others.",
    }
}
