use std::{collections::HashMap, future::Future, sync::Arc};

use futures_util::future::join_all;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
};

use crate::{
    agent::{AgentLimits, BotRoster, BotSeat, GenerationPort, UnavailableGenerator},
    arena::{
        engine::MatchEngine,
        error::{MatchError, MatchErrorKind, runtime_closed},
        events::MatchEvent,
        noop::{NoopPersistence, NoopRating},
        ports::{PersistencePort, RatingPort},
        types::{MatchOutcome, NightActionReceipt},
    },
    discussion::{DiscussionContext, DiscussionScheduler, DiscussionWindow, ScheduledUtterance},
    phase::{PhaseChange, PhaseTimer},
    types::{
        ChatLine, Faction, MatchId, MatchSnapshot, NightActionKind, Phase, PlayerId, RoleName,
    },
};

const DEFAULT_COMMAND_CAPACITY: usize = 64;
const DEFAULT_RECENT_CHAT: usize = 10;

#[derive(Clone)]
pub struct MatchCollaborators {
    pub generator: Arc<dyn GenerationPort>,
    pub persistence: Arc<dyn PersistencePort>,
    pub rating: Arc<dyn RatingPort>,
}

impl Default for MatchCollaborators {
    fn default() -> Self {
        Self {
            generator: Arc::new(UnavailableGenerator),
            persistence: Arc::new(NoopPersistence),
            rating: Arc::new(NoopRating),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeSettings {
    pub discussion_window: DiscussionWindow,
    pub agent_limits: AgentLimits,
    pub recent_chat: usize,
    pub command_capacity: usize,
    /// Fixes role dealing and every bot's randomness when set.
    pub seed: Option<u64>,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            discussion_window: DiscussionWindow::default(),
            agent_limits: AgentLimits::default(),
            recent_chat: DEFAULT_RECENT_CHAT,
            command_capacity: DEFAULT_COMMAND_CAPACITY,
            seed: None,
        }
    }
}

pub enum MatchCommand {
    SubmitNightAction {
        actor_id: PlayerId,
        target_id: PlayerId,
        kind: NightActionKind,
        reply: oneshot::Sender<Result<NightActionReceipt, MatchError>>,
    },
    SubmitVote {
        voter_id: PlayerId,
        target_id: PlayerId,
        reply: oneshot::Sender<Result<(), MatchError>>,
    },
    PostMessage {
        player_id: PlayerId,
        text: String,
        reply: oneshot::Sender<Result<ChatLine, MatchError>>,
    },
    /// Closes the current phase early, as if its deadline had passed.
    AdvancePhase,
    Shutdown,
}

/// Caller side of a running match.
#[derive(Clone)]
pub struct MatchHandle {
    match_id: MatchId,
    commands: mpsc::Sender<MatchCommand>,
    snapshots: watch::Receiver<MatchSnapshot>,
}

impl MatchHandle {
    pub fn match_id(&self) -> &str {
        &self.match_id
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<MatchSnapshot> {
        self.snapshots.clone()
    }

    pub async fn submit_night_action(
        &self,
        actor_id: &str,
        target_id: &str,
        kind: NightActionKind,
    ) -> Result<NightActionReceipt, MatchError> {
        let (reply, response) = oneshot::channel();
        self.send(MatchCommand::SubmitNightAction {
            actor_id: actor_id.to_string(),
            target_id: target_id.to_string(),
            kind,
            reply,
        })
        .await?;
        response.await.map_err(|_| runtime_closed())?
    }

    pub async fn submit_vote(&self, voter_id: &str, target_id: &str) -> Result<(), MatchError> {
        let (reply, response) = oneshot::channel();
        self.send(MatchCommand::SubmitVote {
            voter_id: voter_id.to_string(),
            target_id: target_id.to_string(),
            reply,
        })
        .await?;
        response.await.map_err(|_| runtime_closed())?
    }

    pub async fn post_message(&self, player_id: &str, text: &str) -> Result<ChatLine, MatchError> {
        let (reply, response) = oneshot::channel();
        self.send(MatchCommand::PostMessage {
            player_id: player_id.to_string(),
            text: text.to_string(),
            reply,
        })
        .await?;
        response.await.map_err(|_| runtime_closed())?
    }

    pub async fn advance_phase(&self) -> Result<(), MatchError> {
        self.send(MatchCommand::AdvancePhase).await
    }

    pub async fn shutdown(&self) -> Result<(), MatchError> {
        self.send(MatchCommand::Shutdown).await
    }

    async fn send(&self, command: MatchCommand) -> Result<(), MatchError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| runtime_closed())
    }
}

pub struct LaunchedMatch {
    pub handle: MatchHandle,
    pub events: mpsc::UnboundedReceiver<MatchEvent>,
    pub task: JoinHandle<MatchOutcome>,
}

struct MatchInbox {
    commands: mpsc::Receiver<MatchCommand>,
    deadlines: mpsc::UnboundedReceiver<u64>,
    utterances: mpsc::UnboundedReceiver<ScheduledUtterance>,
}

/// One match as an independent task: phase deadlines, bot decisions and chat.
pub struct MatchRuntime {
    engine: MatchEngine,
    bots: BotRoster,
    chat_feeds: HashMap<PlayerId, mpsc::UnboundedSender<ChatLine>>,
    timer: PhaseTimer,
    scheduler: DiscussionScheduler,
    collaborators: MatchCollaborators,
    settings: RuntimeSettings,
    rng: StdRng,
    chat: Vec<ChatLine>,
    events: mpsc::UnboundedSender<MatchEvent>,
    snapshots: watch::Sender<MatchSnapshot>,
    deadline_tx: mpsc::UnboundedSender<u64>,
    utterance_tx: mpsc::UnboundedSender<ScheduledUtterance>,
}

impl MatchRuntime {
    /// Deals shuffled roles and spawns the match task.
    ///
    /// Configuration errors are returned before anything is spawned.
    pub fn launch(
        engine: MatchEngine,
        collaborators: MatchCollaborators,
        settings: RuntimeSettings,
    ) -> Result<LaunchedMatch, MatchError> {
        Self::launch_inner(engine, collaborators, settings, |engine, rng| engine.start(rng))
    }

    /// Like [`MatchRuntime::launch`] with an explicit role per seat.
    pub fn launch_with_deal(
        engine: MatchEngine,
        deal: Vec<RoleName>,
        collaborators: MatchCollaborators,
        settings: RuntimeSettings,
    ) -> Result<LaunchedMatch, MatchError> {
        Self::launch_inner(engine, collaborators, settings, move |engine, _| {
            engine.start_with_deal(deal)
        })
    }

    fn launch_inner<F>(
        mut engine: MatchEngine,
        collaborators: MatchCollaborators,
        settings: RuntimeSettings,
        start: F,
    ) -> Result<LaunchedMatch, MatchError>
    where
        F: FnOnce(&mut MatchEngine, &mut StdRng) -> Result<PhaseChange, MatchError>,
    {
        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        for phase in Phase::CYCLE {
            let events = events_tx.clone();
            engine.on_phase_enter(
                phase,
                Box::new(move |change: &PhaseChange| {
                    let _ = events.send(MatchEvent::PhaseChanged {
                        phase: change.phase,
                        turn: change.turn,
                    });
                }),
            );
        }

        let first = start(&mut engine, &mut rng)?;

        let bots = BotRoster::from_state(
            engine.state(),
            Arc::clone(&collaborators.generator),
            &settings.agent_limits,
            &mut rng,
        );
        let chat_feeds = spawn_chat_feeds(&bots);

        let (command_tx, command_rx) = mpsc::channel(settings.command_capacity.max(1));
        let (deadline_tx, deadline_rx) = mpsc::unbounded_channel();
        let (utterance_tx, utterance_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(MatchSnapshot {
            state: engine.state().clone(),
            recent_chat: Vec::new(),
        });

        let match_id = engine.state().id.clone();
        tracing::info!(
            target: "arena",
            match_id = %match_id,
            players = engine.state().players.len(),
            bots = bots.len(),
            "match_started"
        );

        let runtime = MatchRuntime {
            engine,
            bots,
            chat_feeds,
            timer: PhaseTimer::new(),
            scheduler: DiscussionScheduler::new(settings.discussion_window),
            collaborators,
            settings,
            rng,
            chat: Vec::new(),
            events: events_tx,
            snapshots: snapshot_tx,
            deadline_tx,
            utterance_tx,
        };
        let inbox = MatchInbox {
            commands: command_rx,
            deadlines: deadline_rx,
            utterances: utterance_rx,
        };
        let task = tokio::spawn(runtime.run(first, inbox));

        Ok(LaunchedMatch {
            handle: MatchHandle {
                match_id,
                commands: command_tx,
                snapshots: snapshot_rx,
            },
            events: events_rx,
            task,
        })
    }

    async fn run(mut self, first: PhaseChange, mut inbox: MatchInbox) -> MatchOutcome {
        if self.enter_phase(first).await {
            self.advance().await;
        }

        while !self.engine.is_finished() {
            tokio::select! {
                Some(epoch) = inbox.deadlines.recv() => self.on_deadline(epoch).await,
                Some(utterance) = inbox.utterances.recv() => self.on_scheduled_utterance(utterance).await,
                command = inbox.commands.recv() => match command {
                    Some(MatchCommand::Shutdown) | None => {
                        tracing::info!(
                            target: "arena",
                            match_id = %self.engine.state().id,
                            "match_shutdown_requested"
                        );
                        break;
                    }
                    Some(command) => self.handle_command(command).await,
                },
            }
        }

        self.timer.cancel();
        self.scheduler.stop();
        MatchOutcome::from_state(self.engine.state())
    }

    async fn on_deadline(&mut self, epoch: u64) {
        if epoch != self.engine.epoch() {
            tracing::debug!(
                target: "arena",
                match_id = %self.engine.state().id,
                epoch = epoch,
                current_epoch = self.engine.epoch(),
                "stale_phase_deadline_ignored"
            );
            return;
        }
        self.close_phase().await;
    }

    async fn close_phase(&mut self) {
        match self.engine.phase() {
            Phase::Night => self.collect_bot_night_actions().await,
            Phase::DayVote => self.collect_bot_votes().await,
            _ => {}
        }
        self.advance().await;
    }

    async fn advance(&mut self) {
        loop {
            self.timer.cancel();
            self.scheduler.stop();
            let Some(change) = self.engine.advance_phase() else {
                return;
            };
            if !self.enter_phase(change).await {
                return;
            }
        }
    }

    /// Runs entry work for a phase. Returns true when the phase passes straight through.
    async fn enter_phase(&mut self, change: PhaseChange) -> bool {
        tracing::info!(
            target: "arena",
            match_id = %self.engine.state().id,
            phase = %change.phase,
            turn = change.turn,
            epoch = change.epoch,
            "phase_entered"
        );
        self.publish_snapshot();

        match change.phase {
            Phase::Night | Phase::DayVote => {
                self.arm_deadline(change);
                false
            }
            Phase::DayReport => {
                let casualties = self.engine.resolve_night();
                tracing::info!(
                    target: "arena",
                    match_id = %self.engine.state().id,
                    turn = change.turn,
                    casualties = ?casualties,
                    "night_resolved"
                );
                self.emit(MatchEvent::NightResolved {
                    turn: change.turn,
                    casualties,
                });
                self.publish_snapshot();
                if !self.finish_if_decided().await {
                    self.arm_deadline(change);
                }
                false
            }
            Phase::DayDiscussion => {
                self.arm_deadline(change);
                self.scheduler.start(DiscussionContext {
                    epoch: change.epoch,
                    bots: self.bots.clone(),
                    snapshots: self.snapshots.subscribe(),
                    outbox: self.utterance_tx.clone(),
                    seed: self.rng.r#gen(),
                });
                false
            }
            Phase::Execution => {
                let resolved = self.engine.resolve_votes();
                tracing::info!(
                    target: "arena",
                    match_id = %self.engine.state().id,
                    turn = change.turn,
                    eliminated = ?resolved.eliminated,
                    "votes_resolved"
                );
                self.emit(MatchEvent::VotesResolved {
                    turn: change.turn,
                    tally: resolved.tally,
                    eliminated: resolved.eliminated,
                });
                self.publish_snapshot();
                !self.finish_if_decided().await
            }
        }
    }

    fn arm_deadline(&mut self, change: PhaseChange) {
        let Some(duration) = self.engine.rules().durations.for_phase(change.phase) else {
            return;
        };
        let deadlines = self.deadline_tx.clone();
        self.timer.arm(change.epoch, duration, move |epoch| {
            let _ = deadlines.send(epoch);
        });
    }

    async fn finish_if_decided(&mut self) -> bool {
        let Some(winner) = self.engine.evaluate_winner() else {
            return false;
        };
        self.finish(Some(winner)).await;
        true
    }

    async fn finish(&mut self, winner: Option<Faction>) {
        self.timer.cancel();
        self.scheduler.stop();
        let outcome = self.engine.finish(winner);
        self.publish_snapshot();

        tracing::info!(
            target: "arena",
            match_id = %outcome.match_id,
            winner = ?outcome.winner,
            turn = outcome.final_state.turn,
            "match_ended"
        );
        self.emit(MatchEvent::MatchEnded {
            winner: outcome.winner,
            state: Box::new(outcome.final_state.clone()),
        });

        let persistence = Arc::clone(&self.collaborators.persistence);
        let rating = Arc::clone(&self.collaborators.rating);
        let stored = outcome.clone();
        self.spawn_report("finished_match", async move {
            persistence.record_finished_match(&stored).await
        });
        self.spawn_report("rating", async move { rating.apply_outcome(&outcome).await });
    }

    async fn collect_bot_night_actions(&mut self) {
        let state = self.engine.state().clone();
        let seats: Vec<BotSeat> = self.bots.alive_seats(&state).cloned().collect();
        let decisions = join_all(seats.iter().map(|seat| {
            let state = &state;
            async move {
                let agent = seat.agent.lock().await;
                (seat, agent.choose_night_target(state))
            }
        }))
        .await;

        for (seat, choice) in decisions {
            let Some(choice) = choice else {
                continue;
            };
            match self.apply_night_action(&seat.player_id, &choice.target_id, choice.kind) {
                Ok(receipt) => {
                    if let Some(verdict) = receipt.verdict {
                        seat.agent
                            .lock()
                            .await
                            .record_investigation(&receipt.target_id, verdict);
                    }
                }
                Err(err) => tracing::warn!(
                    target: "arena",
                    match_id = %state.id,
                    player_id = %seat.player_id,
                    error = %err,
                    "bot_night_action_rejected"
                ),
            }
        }
    }

    async fn collect_bot_votes(&mut self) {
        let state = self.engine.state().clone();
        let seats: Vec<BotSeat> = self.bots.alive_seats(&state).cloned().collect();
        let decisions = join_all(seats.iter().map(|seat| {
            let state = &state;
            async move {
                let agent = seat.agent.lock().await;
                (seat, agent.choose_vote_target(state))
            }
        }))
        .await;

        for (seat, target) in decisions {
            let Some(target_id) = target else {
                continue;
            };
            if let Err(err) = self.apply_vote(&seat.player_id, &target_id) {
                tracing::warn!(
                    target: "arena",
                    match_id = %state.id,
                    player_id = %seat.player_id,
                    error = %err,
                    "bot_vote_rejected"
                );
            }
        }
    }

    fn apply_night_action(
        &mut self,
        actor_id: &str,
        target_id: &str,
        kind: NightActionKind,
    ) -> Result<NightActionReceipt, MatchError> {
        self.engine.record_night_action(actor_id, target_id, kind)?;
        let verdict = match kind {
            NightActionKind::Investigate => Some(self.engine.investigation_verdict(target_id)?),
            _ => None,
        };

        if let Some(record) = self.engine.state().night_actions.last().cloned() {
            let persistence = Arc::clone(&self.collaborators.persistence);
            let match_id = self.engine.state().id.clone();
            self.spawn_report("night_action", async move {
                persistence.record_night_action(&match_id, &record).await
            });
        }

        Ok(NightActionReceipt {
            actor_id: actor_id.to_string(),
            target_id: target_id.to_string(),
            kind,
            turn: self.engine.turn(),
            verdict,
        })
    }

    fn apply_vote(&mut self, voter_id: &str, target_id: &str) -> Result<(), MatchError> {
        self.engine.record_vote(voter_id, target_id)?;

        let turn = self.engine.turn();
        let record = self
            .engine
            .state()
            .votes
            .iter()
            .find(|vote| vote.voter_id == voter_id && vote.turn == turn)
            .cloned();
        if let Some(record) = record {
            let persistence = Arc::clone(&self.collaborators.persistence);
            let match_id = self.engine.state().id.clone();
            self.spawn_report("vote", async move {
                persistence.record_vote(&match_id, &record).await
            });
        }
        Ok(())
    }

    async fn handle_command(&mut self, command: MatchCommand) {
        match command {
            MatchCommand::SubmitNightAction {
                actor_id,
                target_id,
                kind,
                reply,
            } => {
                let result = self.apply_night_action(&actor_id, &target_id, kind);
                self.log_rejection(&actor_id, &result);
                let _ = reply.send(result);
            }
            MatchCommand::SubmitVote {
                voter_id,
                target_id,
                reply,
            } => {
                let result = self.apply_vote(&voter_id, &target_id);
                self.log_rejection(&voter_id, &result);
                let _ = reply.send(result);
            }
            MatchCommand::PostMessage {
                player_id,
                text,
                reply,
            } => {
                let result = self.post_message(&player_id, text);
                let _ = reply.send(result);
            }
            MatchCommand::AdvancePhase => self.close_phase().await,
            MatchCommand::Shutdown => {}
        }
    }

    fn post_message(&mut self, player_id: &str, text: String) -> Result<ChatLine, MatchError> {
        if self.engine.is_finished() {
            return Err(MatchError::new(
                MatchErrorKind::MatchFinished,
                "match is finished",
            ));
        }
        let speaker = self.engine.state().player(player_id).ok_or_else(|| {
            MatchError::new(
                MatchErrorKind::UnknownPlayer,
                format!("player {player_id} is not part of this match"),
            )
        })?;

        let line = ChatLine {
            speaker_id: speaker.id.clone(),
            speaker_name: speaker.name.clone(),
            text,
            phase: self.engine.phase(),
            turn: self.engine.turn(),
        };
        self.publish_chat(line.clone());
        Ok(line)
    }

    async fn on_scheduled_utterance(&mut self, utterance: ScheduledUtterance) {
        let in_discussion = !self.engine.is_finished()
            && self.engine.phase() == Phase::DayDiscussion
            && self.scheduler.running_epoch() == Some(utterance.epoch);
        if !in_discussion {
            tracing::debug!(
                target: "discussion",
                match_id = %self.engine.state().id,
                player_id = %utterance.speaker_id,
                epoch = utterance.epoch,
                "late_utterance_dropped"
            );
            return;
        }

        let Some(text) = utterance.outcome.text() else {
            return;
        };
        let Some(speaker) = self.engine.state().player(&utterance.speaker_id) else {
            return;
        };
        if !speaker.is_alive() {
            return;
        }

        tracing::debug!(
            target: "discussion",
            match_id = %self.engine.state().id,
            player_id = %speaker.id,
            fallback = utterance.outcome.is_fallback(),
            "bot_spoke"
        );
        let line = ChatLine {
            speaker_id: speaker.id.clone(),
            speaker_name: speaker.name.clone(),
            text: text.to_string(),
            phase: self.engine.phase(),
            turn: self.engine.turn(),
        };
        self.publish_chat(line);
    }

    fn publish_chat(&mut self, line: ChatLine) {
        for (player_id, feed) in &self.chat_feeds {
            if *player_id != line.speaker_id {
                let _ = feed.send(line.clone());
            }
        }

        let persistence = Arc::clone(&self.collaborators.persistence);
        let match_id = self.engine.state().id.clone();
        let stored = line.clone();
        self.spawn_report("chat_line", async move {
            persistence.record_chat_line(&match_id, &stored).await
        });

        self.chat.push(line.clone());
        self.emit(MatchEvent::ChatMessage { line });
        self.publish_snapshot();
    }

    fn publish_snapshot(&self) {
        let skip = self.chat.len().saturating_sub(self.settings.recent_chat);
        let recent_chat = self.chat[skip..]
            .iter()
            .map(ChatLine::transcript_entry)
            .collect();
        self.snapshots.send_replace(MatchSnapshot {
            state: self.engine.state().clone(),
            recent_chat,
        });
    }

    fn emit(&self, event: MatchEvent) {
        let _ = self.events.send(event);
    }

    fn log_rejection<T>(&self, player_id: &str, result: &Result<T, MatchError>) {
        if let Err(err) = result {
            tracing::debug!(
                target: "arena",
                match_id = %self.engine.state().id,
                player_id = %player_id,
                kind = ?err.kind,
                error = %err,
                "action_rejected"
            );
        }
    }

    /// Runs a collaborator call off the match task. Failures are logged only.
    fn spawn_report<F>(&self, record: &'static str, job: F)
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let match_id = self.engine.state().id.clone();
        tokio::spawn(async move {
            if let Err(err) = job.await {
                tracing::warn!(
                    target: "arena.collaborators",
                    match_id = %match_id,
                    record = record,
                    error = %format!("{err:#}"),
                    "collaborator_call_failed"
                );
            }
        });
    }
}

/// One listener per bot so chat reaches every bot in order without blocking the match task.
fn spawn_chat_feeds(bots: &BotRoster) -> HashMap<PlayerId, mpsc::UnboundedSender<ChatLine>> {
    bots.seats()
        .iter()
        .map(|seat| {
            let (feed_tx, mut feed_rx) = mpsc::unbounded_channel::<ChatLine>();
            let agent = Arc::clone(&seat.agent);
            tokio::spawn(async move {
                while let Some(line) = feed_rx.recv().await {
                    agent.lock().await.learn_from_chat(&line);
                }
            });
            (seat.player_id.clone(), feed_tx)
        })
        .collect()
}
