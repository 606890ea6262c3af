use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use crate::types::{Faction, RoleName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuspicionLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggressiveness {
    Passive,
    Moderate,
    Aggressive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personality {
    pub name: String,
    pub traits: Vec<String>,
    pub speaking_style: String,
    pub suspicion: SuspicionLevel,
    pub aggressiveness: Aggressiveness,
}

impl Personality {
    fn preset(
        name: &str,
        traits: &[&str],
        speaking_style: &str,
        suspicion: SuspicionLevel,
        aggressiveness: Aggressiveness,
    ) -> Self {
        Self {
            name: name.to_string(),
            traits: traits.iter().map(|item| item.to_string()).collect(),
            speaking_style: speaking_style.to_string(),
            suspicion,
            aggressiveness,
        }
    }

    /// Loud accusers are easy to read; ai bots avoid this combination.
    pub fn is_overbearing(&self) -> bool {
        self.aggressiveness == Aggressiveness::Aggressive && self.suspicion == SuspicionLevel::High
    }
}

pub fn presets() -> Vec<Personality> {
    use Aggressiveness::{Aggressive, Moderate, Passive};
    use SuspicionLevel::{High, Low, Medium};

    vec![
        Personality::preset(
            "analytical",
            &["logical", "careful", "loves analysis"],
            "Argues from evidence and odds. Likes phrases such as \"statistically speaking\".",
            Medium,
            Moderate,
        ),
        Personality::preset(
            "emotional",
            &["emotional", "intuitive", "expressive"],
            "Speaks with feeling, leans on gut calls and uses plenty of \"!\" and \"...\".",
            High,
            Aggressive,
        ),
        Personality::preset(
            "casual",
            &["relaxed", "friendly", "optimistic"],
            "Chatty and informal, drops slang and easygoing agreement.",
            Low,
            Passive,
        ),
        Personality::preset(
            "serious",
            &["earnest", "responsible", "fair-minded"],
            "Polite and formal, keeps returning to the rules and to fairness.",
            Medium,
            Moderate,
        ),
        Personality::preset(
            "mysterious",
            &["enigmatic", "reserved", "observant"],
            "Short remarks that cut to the point, such as \"interesting\" or \"...I see\".",
            High,
            Passive,
        ),
        Personality::preset(
            "charming",
            &["sociable", "cheerful", "cooperative"],
            "Upbeat and encouraging, keeps the table working together.",
            Low,
            Passive,
        ),
        Personality::preset(
            "skeptic",
            &["doubtful", "critical", "careful"],
            "Keeps asking \"really?\", \"why?\" and \"what's your evidence?\".",
            High,
            Aggressive,
        ),
        Personality::preset(
            "intuitive",
            &["intuitive", "creative", "flexible"],
            "Talks in impressions such as \"something feels off\" and offers odd angles.",
            Medium,
            Moderate,
        ),
    ]
}

/// Picks a personality suited to the role a bot was dealt.
pub fn personality_for_role<R: Rng + ?Sized>(
    role: RoleName,
    faction: Faction,
    rng: &mut R,
) -> Personality {
    let presets = presets();

    if faction == Faction::Ai {
        let blending: Vec<&Personality> = presets
            .iter()
            .filter(|personality| !personality.is_overbearing())
            .collect();
        if let Some(choice) = blending.choose(rng) {
            return (*choice).clone();
        }
    }

    let preferred = match role {
        RoleName::Engineer => Some("analytical"),
        RoleName::CyberGuard => Some("serious"),
        _ => None,
    };
    if let Some(found) =
        preferred.and_then(|name| presets.iter().find(|personality| personality.name == name))
    {
        return found.clone();
    }

    let index = rng.gen_range(0..presets.len());
    presets[index].clone()
}
