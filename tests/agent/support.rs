use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;

use jin::{
    agent::{
        AgentDecisionEngine, AgentLimits, GenerationError, GenerationPort, GenerationRequest,
        personality::presets,
    },
    roster::role_for,
    types::{ChatLine, MatchState, Phase, Player, RoleName},
};

pub const SELF_ID: &str = "bot-1";
pub const SELF_NAME: &str = "ALI-CE";

/// Replies with a fixed text after an optional delay and keeps every request.
#[derive(Default)]
pub struct ScriptedGenerator {
    pub reply: String,
    pub delay: Option<Duration>,
    pub requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            ..Self::default()
        })
    }

    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            reply: "too late".to_string(),
            delay: Some(delay),
            ..Self::default()
        })
    }
}

#[async_trait]
impl GenerationPort for ScriptedGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        self.requests
            .lock()
            .expect("request log lock")
            .push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.reply.clone())
    }
}

pub fn quiet_limits() -> AgentLimits {
    AgentLimits {
        noise_probability: 0.0,
        ..AgentLimits::default()
    }
}

pub fn agent(role: RoleName, generator: Arc<dyn GenerationPort>) -> AgentDecisionEngine {
    AgentDecisionEngine::new(
        SELF_ID,
        SELF_NAME,
        role_for(role),
        presets()[0].clone(),
        generator,
        quiet_limits(),
        42,
    )
}

pub fn table(phase: Phase) -> MatchState {
    let mut state = MatchState::new("m-agent");
    state.phase = phase;
    state.players = vec![
        Player::new(SELF_ID, SELF_NAME, true),
        Player::new("p2", "BOB-2", false),
        Player::new("p3", "CHAR-7", false),
        Player::new("p4", "DATA-9", false),
    ];
    state
}

pub fn line(speaker_id: &str, speaker_name: &str, text: &str) -> ChatLine {
    ChatLine {
        speaker_id: speaker_id.to_string(),
        speaker_name: speaker_name.to_string(),
        text: text.to_string(),
        phase: Phase::DayDiscussion,
        turn: 1,
    }
}
