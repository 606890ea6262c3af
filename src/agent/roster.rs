use std::sync::Arc;

use rand::Rng;
use tokio::sync::Mutex;

use crate::{
    agent::{
        engine::{AgentDecisionEngine, AgentLimits},
        personality::personality_for_role,
        ports::GenerationPort,
    },
    types::{MatchState, PlayerId},
};

pub type SharedAgent = Arc<Mutex<AgentDecisionEngine>>;

#[derive(Clone)]
pub struct BotSeat {
    pub player_id: PlayerId,
    pub agent: SharedAgent,
}

/// Decision engines for the bot seats of one match, in seat order.
#[derive(Clone, Default)]
pub struct BotRoster {
    seats: Vec<BotSeat>,
}

impl BotRoster {
    /// One engine per bot that has been dealt a role.
    pub fn from_state<R: Rng + ?Sized>(
        state: &MatchState,
        generator: Arc<dyn GenerationPort>,
        limits: &AgentLimits,
        rng: &mut R,
    ) -> Self {
        let seats = state
            .players
            .iter()
            .filter(|player| player.is_bot)
            .filter_map(|player| {
                let role = player.role.clone()?;
                let personality = personality_for_role(role.name, role.faction, rng);
                tracing::debug!(
                    target: "agent",
                    player_id = %player.id,
                    role = %role.name,
                    personality = %personality.name,
                    "bot_seated"
                );
                let engine = AgentDecisionEngine::new(
                    player.id.clone(),
                    player.name.clone(),
                    role,
                    personality,
                    Arc::clone(&generator),
                    limits.clone(),
                    rng.r#gen(),
                );
                Some(BotSeat {
                    player_id: player.id.clone(),
                    agent: Arc::new(Mutex::new(engine)),
                })
            })
            .collect();

        Self { seats }
    }

    pub fn seats(&self) -> &[BotSeat] {
        &self.seats
    }

    pub fn get(&self, player_id: &str) -> Option<&BotSeat> {
        self.seats.iter().find(|seat| seat.player_id == player_id)
    }

    /// Seats whose player is still alive, in seat order.
    pub fn alive_seats<'a>(&'a self, state: &'a MatchState) -> impl Iterator<Item = &'a BotSeat> + 'a {
        self.seats.iter().filter(move |seat| {
            state
                .player(&seat.player_id)
                .is_some_and(|player| player.is_alive())
        })
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }
}
