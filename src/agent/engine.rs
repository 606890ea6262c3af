use std::{sync::Arc, time::Duration};

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    agent::{
        error::{GenerationError, GenerationErrorKind},
        memory::{AgentMemory, COOPERATION_LABEL, SHARP_INSIGHT_LABEL, SUSPICION_LABEL},
        personality::Personality,
        ports::{GenerationPort, GenerationRequest},
        prompts::{DiscussionPromptInput, build_discussion_prompt},
        signals::{ChatSignals, threat_level},
        transcript::{DEFAULT_TRANSCRIPT_CAPACITY, DEFAULT_TRANSCRIPT_RETAIN, Transcript},
        utterance::{DEFAULT_NOISE_PROBABILITY, UtteranceOutcome, apply_human_noise, pick_fallback},
    },
    roster::catalog::night_action_for,
    types::{
        ChatLine, InvestigationVerdict, MatchState, NightActionKind, Player, PlayerId, Role,
        RoleName,
    },
};

const PROMPT_EXCERPT_LINES: usize = 10;
const OWN_LINE_PREFIX: &str = "me";

#[derive(Debug, Clone)]
pub struct AgentLimits {
    pub generation_timeout: Duration,
    pub max_output_tokens: u32,
    pub noise_probability: f64,
    pub transcript_capacity: usize,
    pub transcript_retain: usize,
}

impl Default for AgentLimits {
    fn default() -> Self {
        Self {
            generation_timeout: Duration::from_secs(8),
            max_output_tokens: 150,
            noise_probability: DEFAULT_NOISE_PROBABILITY,
            transcript_capacity: DEFAULT_TRANSCRIPT_CAPACITY,
            transcript_retain: DEFAULT_TRANSCRIPT_RETAIN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NightChoice {
    pub target_id: PlayerId,
    pub kind: NightActionKind,
}

/// Decision maker for one bot seat in one match.
pub struct AgentDecisionEngine {
    player_id: PlayerId,
    player_name: String,
    role: Role,
    personality: Personality,
    memory: AgentMemory,
    transcript: Transcript,
    generator: Arc<dyn GenerationPort>,
    limits: AgentLimits,
    rng: StdRng,
}

impl AgentDecisionEngine {
    pub fn new(
        player_id: impl Into<PlayerId>,
        player_name: impl Into<String>,
        role: Role,
        personality: Personality,
        generator: Arc<dyn GenerationPort>,
        limits: AgentLimits,
        seed: u64,
    ) -> Self {
        Self {
            player_id: player_id.into(),
            player_name: player_name.into(),
            role,
            personality,
            memory: AgentMemory::new(),
            transcript: Transcript::new(limits.transcript_capacity, limits.transcript_retain),
            generator,
            limits,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn personality(&self) -> &Personality {
        &self.personality
    }

    pub fn memory(&self) -> &AgentMemory {
        &self.memory
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn current_threat_level(&self) -> u8 {
        threat_level(self.transcript.lines(), &self.player_name)
    }

    /// Produces a discussion line. Backend failures and timeouts become a canned line.
    #[tracing::instrument(
        name = "bot_utterance",
        target = "agent",
        skip(self, state, recent_messages),
        fields(player_id = %self.player_id, turn = state.turn)
    )]
    pub async fn choose_discussion_utterance(
        &mut self,
        state: &MatchState,
        recent_messages: &[String],
    ) -> UtteranceOutcome {
        let threat = self.current_threat_level();
        let excerpt = if recent_messages.is_empty() {
            self.transcript.recent(PROMPT_EXCERPT_LINES)
        } else {
            let skip = recent_messages.len().saturating_sub(PROMPT_EXCERPT_LINES);
            recent_messages[skip..].to_vec()
        };

        let prompt = build_discussion_prompt(&DiscussionPromptInput {
            speaker_name: &self.player_name,
            role: self.role.name,
            faction: self.role.faction,
            personality: &self.personality,
            phase: state.phase,
            turn: state.turn,
            alive_count: state.alive_count(),
            threat_level: threat,
            transcript_excerpt: &excerpt,
            max_output_tokens: self.limits.max_output_tokens,
        });
        let request = GenerationRequest {
            speaker_name: self.player_name.clone(),
            role: self.role.name,
            faction: self.role.faction,
            personality: self.personality.clone(),
            transcript_excerpt: excerpt,
            threat_level: threat,
            phase: state.phase,
            turn: state.turn,
            alive_count: state.alive_count(),
            max_output_tokens: self.limits.max_output_tokens,
            prompt,
        };

        let generated =
            match tokio::time::timeout(self.limits.generation_timeout, self.generator.generate(request))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(GenerationError::new(
                    GenerationErrorKind::Timeout,
                    format!(
                        "generation exceeded {}ms",
                        self.limits.generation_timeout.as_millis()
                    ),
                )),
            };

        let outcome = match generated {
            Ok(text) => {
                let text = text.trim().to_string();
                if text.is_empty() {
                    UtteranceOutcome::Silent
                } else {
                    let (text, noised) =
                        apply_human_noise(text, self.limits.noise_probability, &mut self.rng);
                    UtteranceOutcome::Generated { text, noised }
                }
            }
            Err(cause) => {
                tracing::warn!(
                    target: "agent",
                    player_id = %self.player_id,
                    kind = ?cause.kind,
                    error = %cause,
                    "bot_generation_fell_back"
                );
                UtteranceOutcome::Fallback {
                    text: pick_fallback(state.phase, &mut self.rng),
                    cause,
                }
            }
        };

        if let Some(text) = outcome.text() {
            self.transcript.push(format!("{OWN_LINE_PREFIX}: {text}"));
        }
        outcome
    }

    /// Night target for the bot's role, or `None` for roles without a night action.
    pub fn choose_night_target(&self, state: &MatchState) -> Option<NightChoice> {
        if !self.is_alive_in(state) {
            return None;
        }
        let kind = night_action_for(self.role.name)?;
        let opponents: Vec<&Player> = self.opponents(state).collect();

        let target = match kind {
            NightActionKind::Attack => first_max_by(&opponents, |player| {
                let mut score = 0;
                if self.memory.guessed_role(&player.id) == Some(RoleName::Engineer) {
                    score += 5;
                }
                if self
                    .memory
                    .entry(&player.id)
                    .is_some_and(|entry| entry.has_note(SHARP_INSIGHT_LABEL))
                {
                    score += 3;
                }
                f64::from(score)
            }),
            NightActionKind::Investigate => {
                first_max_by(&opponents, |player| -self.memory.trust(&player.id))
            }
            NightActionKind::Protect => opponents
                .iter()
                .find(|player| self.memory.guessed_role(&player.id) == Some(RoleName::Engineer))
                .copied()
                .or_else(|| first_max_by(&opponents, |player| self.memory.trust(&player.id))),
        }?;

        Some(NightChoice {
            target_id: target.id.clone(),
            kind,
        })
    }

    /// The alive opponent trusted least; earlier seats win ties.
    pub fn choose_vote_target(&self, state: &MatchState) -> Option<PlayerId> {
        if !self.is_alive_in(state) {
            return None;
        }
        let opponents: Vec<&Player> = self.opponents(state).collect();
        first_max_by(&opponents, |player| -self.memory.trust(&player.id))
            .map(|player| player.id.clone())
    }

    pub fn observe_utterance(&mut self, speaker_name: &str, text: &str) {
        self.transcript.push(format!("{speaker_name}: {text}"));
    }

    pub fn update_memory(&mut self, opponent_id: &str, label: &str, context: &str) {
        self.memory.update(opponent_id, label, context);
    }

    /// Hears another player's chat line: records it and adjusts memory of the speaker.
    pub fn learn_from_chat(&mut self, line: &ChatLine) {
        if line.speaker_id == self.player_id {
            return;
        }
        self.observe_utterance(&line.speaker_name, &line.text);

        let signals = ChatSignals::read(&line.text, &self.player_name);
        if signals.hostile {
            self.update_memory(&line.speaker_id, SUSPICION_LABEL, &line.text);
        } else if signals.cooperative {
            self.update_memory(&line.speaker_id, COOPERATION_LABEL, &line.text);
        }
        if signals.targets_observer {
            self.update_memory(&line.speaker_id, SHARP_INSIGHT_LABEL, &line.text);
        }
        if let Some(role) = signals.role_claim {
            self.memory.guess_role(&line.speaker_id, role);
        }
    }

    pub fn record_investigation(&mut self, target_id: &str, verdict: InvestigationVerdict) {
        let label = match verdict {
            InvestigationVerdict::Ai => {
                self.memory.guess_role(target_id, RoleName::Ai);
                "suspect: investigated"
            }
            InvestigationVerdict::NotAi => "cooperative: investigated",
        };
        self.update_memory(target_id, label, verdict.label());
    }

    fn is_alive_in(&self, state: &MatchState) -> bool {
        state
            .player(&self.player_id)
            .is_some_and(|player| player.is_alive())
    }

    fn opponents<'a>(&'a self, state: &'a MatchState) -> impl Iterator<Item = &'a Player> + 'a {
        state
            .alive_players()
            .filter(move |player| player.id != self.player_id)
    }
}

/// Highest score wins; the first candidate keeps the lead on ties.
fn first_max_by<'a, F>(candidates: &[&'a Player], mut score: F) -> Option<&'a Player>
where
    F: FnMut(&Player) -> f64,
{
    let mut best: Option<(&'a Player, f64)> = None;
    for candidate in candidates {
        let candidate_score = score(candidate);
        match best {
            Some((_, best_score)) if candidate_score <= best_score => {}
            _ => best = Some((candidate, candidate_score)),
        }
    }
    best.map(|(player, _)| player)
}
