use std::sync::OnceLock;

use regex::Regex;

use crate::types::RoleName;

pub const MAX_THREAT_LEVEL: u8 = 5;

fn suspicion_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(suspicious|suspect\w*|sus|doubt\w*|accus\w*|lying|liar|fishy|shady)\b")
            .expect("suspicion pattern must compile")
    })
}

fn agreement_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(agree\w*|cooperat\w*|trust (you|them|him|her)|good point|let'?s work together)\b")
            .expect("agreement pattern must compile")
    })
}

fn role_claim_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\bi(?:'m| am) (?:the |an? )?(engineer|cyber ?guard|guard|citizen)\b")
            .expect("role claim pattern must compile")
    })
}

pub fn mentions_suspicion(text: &str) -> bool {
    suspicion_pattern().is_match(text)
}

pub fn mentions_agreement(text: &str) -> bool {
    agreement_pattern().is_match(text)
}

pub fn mentions_name(text: &str, name: &str) -> bool {
    !name.is_empty() && text.to_lowercase().contains(&name.to_lowercase())
}

/// Role a speaker openly claims, e.g. "I am the engineer".
pub fn claimed_role(text: &str) -> Option<RoleName> {
    let captures = role_claim_pattern().captures(text)?;
    let claimed = captures.get(1)?.as_str().to_lowercase();
    match claimed.as_str() {
        "engineer" => Some(RoleName::Engineer),
        "citizen" => Some(RoleName::Citizen),
        _ => Some(RoleName::CyberGuard),
    }
}

/// Counts transcript lines naming `own_name` next to suspicion language, capped at 5.
pub fn threat_level<'a>(lines: impl IntoIterator<Item = &'a String>, own_name: &str) -> u8 {
    let hits = lines
        .into_iter()
        .filter(|line| mentions_name(line, own_name) && mentions_suspicion(line))
        .count();
    hits.min(usize::from(MAX_THREAT_LEVEL)) as u8
}

/// What a bot takes away from hearing one chat line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChatSignals {
    pub hostile: bool,
    pub cooperative: bool,
    pub targets_observer: bool,
    pub role_claim: Option<RoleName>,
}

impl ChatSignals {
    pub fn read(text: &str, observer_name: &str) -> Self {
        let hostile = mentions_suspicion(text);
        Self {
            hostile,
            cooperative: !hostile && mentions_agreement(text),
            targets_observer: hostile && mentions_name(text, observer_name),
            role_claim: claimed_role(text),
        }
    }
}
