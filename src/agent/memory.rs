use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{PlayerId, RoleName};

pub const HOSTILE_TRUST_DELTA: f64 = -0.2;
pub const COOPERATIVE_TRUST_DELTA: f64 = 0.1;

pub const SUSPICION_LABEL: &str = "casts suspicion";
pub const COOPERATION_LABEL: &str = "cooperative";
pub const SHARP_INSIGHT_LABEL: &str = "sharp insight";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelTone {
    Hostile,
    Cooperative,
    Neutral,
}

/// Reads the tone of an action label. Hostile wording wins over cooperative wording.
pub fn label_tone(label: &str) -> LabelTone {
    let label = label.to_lowercase();
    if ["suspicion", "suspect", "hostile", "aggressive"]
        .iter()
        .any(|marker| label.contains(marker))
    {
        LabelTone::Hostile
    } else if ["agree", "cooperat"].iter().any(|marker| label.contains(marker)) {
        LabelTone::Cooperative
    } else {
        LabelTone::Neutral
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMemoryEntry {
    pub opponent_id: PlayerId,
    /// -1.0 is fully distrusted, 1.0 fully trusted.
    pub trust: f64,
    pub suspicious_actions: Vec<String>,
    pub notes: Vec<String>,
    pub guessed_role: Option<RoleName>,
}

impl AgentMemoryEntry {
    fn new(opponent_id: &str) -> Self {
        Self {
            opponent_id: opponent_id.to_string(),
            trust: 0.0,
            suspicious_actions: Vec::new(),
            notes: Vec::new(),
            guessed_role: None,
        }
    }

    pub fn has_note(&self, needle: &str) -> bool {
        self.notes.iter().any(|note| note.contains(needle))
    }
}

/// One bot's view of every opponent it has observed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentMemory {
    entries: HashMap<PlayerId, AgentMemoryEntry>,
}

impl AgentMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&self, opponent_id: &str) -> Option<&AgentMemoryEntry> {
        self.entries.get(opponent_id)
    }

    /// Trust for an opponent. Unobserved opponents are neutral.
    pub fn trust(&self, opponent_id: &str) -> f64 {
        self.entries
            .get(opponent_id)
            .map(|entry| entry.trust)
            .unwrap_or(0.0)
    }

    pub fn guessed_role(&self, opponent_id: &str) -> Option<RoleName> {
        self.entries
            .get(opponent_id)
            .and_then(|entry| entry.guessed_role)
    }

    pub fn update(&mut self, opponent_id: &str, label: &str, context: &str) {
        let entry = self.entry_mut(opponent_id);
        entry.suspicious_actions.push(label.to_string());
        entry.notes.push(format!("{label}: {context}"));

        let delta = match label_tone(label) {
            LabelTone::Hostile => HOSTILE_TRUST_DELTA,
            LabelTone::Cooperative => COOPERATIVE_TRUST_DELTA,
            LabelTone::Neutral => 0.0,
        };
        entry.trust = (entry.trust + delta).clamp(-1.0, 1.0);
    }

    pub fn guess_role(&mut self, opponent_id: &str, role: RoleName) {
        self.entry_mut(opponent_id).guessed_role = Some(role);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_mut(&mut self, opponent_id: &str) -> &mut AgentMemoryEntry {
        self.entries
            .entry(opponent_id.to_string())
            .or_insert_with(|| AgentMemoryEntry::new(opponent_id))
    }
}
