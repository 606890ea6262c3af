use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub type PlayerId = String;
pub type MatchId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Human,
    Ai,
    Third,
}

impl Faction {
    pub fn as_str(self) -> &'static str {
        match self {
            Faction::Human => "human",
            Faction::Ai => "ai",
            Faction::Third => "third",
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleName {
    Ai,
    Engineer,
    CyberGuard,
    Citizen,
    FakeAi,
    Trickster,
}

impl RoleName {
    pub const ALL: [RoleName; 6] = [
        RoleName::Ai,
        RoleName::Engineer,
        RoleName::CyberGuard,
        RoleName::Citizen,
        RoleName::FakeAi,
        RoleName::Trickster,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RoleName::Ai => "ai",
            RoleName::Engineer => "engineer",
            RoleName::CyberGuard => "cyber_guard",
            RoleName::Citizen => "citizen",
            RoleName::FakeAi => "fake_ai",
            RoleName::Trickster => "trickster",
        }
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: RoleName,
    pub faction: Faction,
    pub display_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    Alive,
    Dead,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub status: PlayerStatus,
    pub is_bot: bool,
    pub role: Option<Role>,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>, is_bot: bool) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: PlayerStatus::Alive,
            is_bot,
            role: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.status == PlayerStatus::Alive
    }

    pub fn role_name(&self) -> Option<RoleName> {
        self.role.as_ref().map(|role| role.name)
    }

    pub fn faction(&self) -> Option<Faction> {
        self.role.as_ref().map(|role| role.faction)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Night,
    DayReport,
    DayDiscussion,
    DayVote,
    Execution,
}

impl Phase {
    pub const CYCLE: [Phase; 5] = [
        Phase::Night,
        Phase::DayReport,
        Phase::DayDiscussion,
        Phase::DayVote,
        Phase::Execution,
    ];

    pub fn next(self) -> Phase {
        match self {
            Phase::Night => Phase::DayReport,
            Phase::DayReport => Phase::DayDiscussion,
            Phase::DayDiscussion => Phase::DayVote,
            Phase::DayVote => Phase::Execution,
            Phase::Execution => Phase::Night,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Night => "night",
            Phase::DayReport => "day_report",
            Phase::DayDiscussion => "day_discussion",
            Phase::DayVote => "day_vote",
            Phase::Execution => "execution",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NightActionKind {
    Investigate,
    Protect,
    Attack,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightActionRecord {
    pub actor_id: PlayerId,
    pub target_id: PlayerId,
    pub kind: NightActionKind,
    pub turn: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub voter_id: PlayerId,
    pub target_id: PlayerId,
    pub turn: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub target_id: PlayerId,
    pub votes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestigationVerdict {
    Ai,
    NotAi,
}

impl InvestigationVerdict {
    pub fn label(self) -> &'static str {
        match self {
            InvestigationVerdict::Ai => "AI",
            InvestigationVerdict::NotAi => "Not AI",
        }
    }
}

/// Alive head-counts per faction. Players without a role are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionCounts {
    pub human: usize,
    pub ai: usize,
    pub third: usize,
}

impl FactionCounts {
    pub fn total(&self) -> usize {
        self.human + self.ai + self.third
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatLine {
    pub speaker_id: PlayerId,
    pub speaker_name: String,
    pub text: String,
    pub phase: Phase,
    pub turn: u32,
}

impl ChatLine {
    pub fn transcript_entry(&self) -> String {
        format!("{}: {}", self.speaker_name, self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub id: MatchId,
    pub phase: Phase,
    pub turn: u32,
    pub players: Vec<Player>,
    pub night_actions: Vec<NightActionRecord>,
    pub votes: Vec<VoteRecord>,
    pub finished: bool,
    pub winner: Option<Faction>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl MatchState {
    pub fn new(id: impl Into<MatchId>) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: id.into(),
            phase: Phase::Night,
            turn: 1,
            players: Vec::new(),
            night_actions: Vec::new(),
            votes: Vec::new(),
            finished: false,
            winner: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|player| player.id == player_id)
    }

    pub fn alive_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|player| player.is_alive())
    }

    pub fn alive_count(&self) -> usize {
        self.alive_players().count()
    }

    pub fn faction_counts(&self) -> FactionCounts {
        let mut counts = FactionCounts::default();
        for faction in self.alive_players().filter_map(Player::faction) {
            match faction {
                Faction::Human => counts.human += 1,
                Faction::Ai => counts.ai += 1,
                Faction::Third => counts.third += 1,
            }
        }
        counts
    }

    pub fn night_actions_for_turn(&self, turn: u32) -> Vec<NightActionRecord> {
        self.night_actions
            .iter()
            .filter(|record| record.turn == turn)
            .cloned()
            .collect()
    }

    pub fn votes_for_turn(&self, turn: u32) -> Vec<VoteRecord> {
        self.votes
            .iter()
            .filter(|record| record.turn == turn)
            .cloned()
            .collect()
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = OffsetDateTime::now_utc();
    }
}

/// What observers of a running match see: the state plus the recent chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub state: MatchState,
    pub recent_chat: Vec<String>,
}
