use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use rand::{SeedableRng, rngs::StdRng};
use tokio::sync::watch;

use jin::{
    agent::{AgentLimits, BotRoster, GenerationError, GenerationPort, GenerationRequest},
    roster::role_for,
    types::{MatchSnapshot, MatchState, Phase, Player, RoleName},
};

pub struct EchoGenerator {
    pub delay: Duration,
}

#[async_trait]
impl GenerationPort for EchoGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        tokio::time::sleep(self.delay).await;
        Ok(format!("{} has nothing to hide.", request.speaker_name))
    }
}

/// Echoes everyone except `muted`, who always answers with blank text.
pub struct MutedEchoGenerator {
    pub muted: &'static str,
}

#[async_trait]
impl GenerationPort for MutedEchoGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        if request.speaker_name == self.muted {
            return Ok("   ".to_string());
        }
        Ok(format!("{} has nothing to hide.", request.speaker_name))
    }
}

pub fn discussion_state() -> MatchState {
    let mut state = MatchState::new("m-discussion");
    state.phase = Phase::DayDiscussion;
    let roles = [
        RoleName::Ai,
        RoleName::Engineer,
        RoleName::Citizen,
        RoleName::Citizen,
    ];
    state.players = ["b1", "b2", "b3", "b4"]
        .into_iter()
        .zip(roles)
        .map(|(id, role)| {
            let mut player = Player::new(id, id.to_uppercase(), true);
            player.role = Some(role_for(role));
            player
        })
        .collect();
    state
}

pub fn roster(state: &MatchState, delay: Duration) -> BotRoster {
    roster_with(state, Arc::new(EchoGenerator { delay }))
}

pub fn roster_with(state: &MatchState, generator: Arc<dyn GenerationPort>) -> BotRoster {
    let limits = AgentLimits {
        noise_probability: 0.0,
        generation_timeout: Duration::from_secs(120),
        ..AgentLimits::default()
    };
    BotRoster::from_state(
        state,
        generator,
        &limits,
        &mut StdRng::seed_from_u64(5),
    )
}

pub fn snapshots(state: &MatchState) -> (watch::Sender<MatchSnapshot>, watch::Receiver<MatchSnapshot>) {
    watch::channel(MatchSnapshot {
        state: state.clone(),
        recent_chat: Vec::new(),
    })
}
