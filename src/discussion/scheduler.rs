use std::{collections::HashMap, sync::Arc, time::Duration};

use rand::{Rng, SeedableRng, rngs::StdRng};
use tokio::{
    sync::{Mutex, mpsc, watch},
    task::JoinHandle,
    time::Instant,
};
use tokio_util::sync::CancellationToken;

use crate::{
    agent::{BotRoster, BotSeat, UtteranceOutcome},
    types::{MatchSnapshot, MatchState, Phase, PlayerId},
};

/// A bot line produced during the discussion phase identified by `epoch`.
#[derive(Debug, Clone)]
pub struct ScheduledUtterance {
    pub epoch: u64,
    pub speaker_id: PlayerId,
    pub outcome: UtteranceOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscussionWindow {
    pub min_interval: Duration,
    pub max_interval: Duration,
}

impl DiscussionWindow {
    pub fn new(min_interval: Duration, max_interval: Duration) -> Self {
        Self {
            min_interval: min_interval.min(max_interval),
            max_interval: max_interval.max(min_interval),
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.min_interval == self.max_interval {
            return self.min_interval;
        }
        rng.gen_range(self.min_interval..=self.max_interval)
    }
}

impl Default for DiscussionWindow {
    fn default() -> Self {
        Self::new(Duration::from_secs(30), Duration::from_secs(90))
    }
}

pub struct DiscussionContext {
    pub epoch: u64,
    pub bots: BotRoster,
    pub snapshots: watch::Receiver<MatchSnapshot>,
    pub outbox: mpsc::UnboundedSender<ScheduledUtterance>,
    pub seed: u64,
}

struct RunningDiscussion {
    epoch: u64,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Paces bot speech while a match sits in `day_discussion`.
pub struct DiscussionScheduler {
    window: DiscussionWindow,
    last_spoke: Arc<Mutex<HashMap<PlayerId, Instant>>>,
    running: Option<RunningDiscussion>,
}

impl DiscussionScheduler {
    pub fn new(window: DiscussionWindow) -> Self {
        Self {
            window,
            last_spoke: Arc::new(Mutex::new(HashMap::new())),
            running: None,
        }
    }

    pub fn start(&mut self, context: DiscussionContext) {
        self.stop();

        let epoch = context.epoch;
        let token = CancellationToken::new();
        let handle = tokio::spawn(run_discussion(
            context,
            self.window,
            Arc::clone(&self.last_spoke),
            token.clone(),
        ));
        tracing::debug!(target: "discussion", epoch = epoch, "discussion_scheduler_started");
        self.running = Some(RunningDiscussion {
            epoch,
            token,
            handle,
        });
    }

    /// Cancels the running interval, including any generation in flight.
    pub fn stop(&mut self) -> bool {
        let Some(running) = self.running.take() else {
            return false;
        };
        running.token.cancel();
        running.handle.abort();
        tracing::debug!(
            target: "discussion",
            epoch = running.epoch,
            "discussion_scheduler_stopped"
        );
        true
    }

    pub fn running_epoch(&self) -> Option<u64> {
        self.running.as_ref().map(|running| running.epoch)
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }
}

impl Default for DiscussionScheduler {
    fn default() -> Self {
        Self::new(DiscussionWindow::default())
    }
}

impl Drop for DiscussionScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_discussion(
    context: DiscussionContext,
    window: DiscussionWindow,
    last_spoke: Arc<Mutex<HashMap<PlayerId, Instant>>>,
    token: CancellationToken,
) {
    let mut rng = StdRng::seed_from_u64(context.seed);

    loop {
        let wait = window.sample(&mut rng);
        tokio::select! {
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(wait) => {}
        }

        let snapshot = context.snapshots.borrow().clone();
        if snapshot.state.finished || snapshot.state.phase != Phase::DayDiscussion {
            break;
        }

        let speaker = {
            let stamps = last_spoke.lock().await;
            pick_speaker(&context.bots, &snapshot.state, &stamps).cloned()
        };
        let Some(speaker) = speaker else {
            continue;
        };

        let outcome = tokio::select! {
            _ = token.cancelled() => break,
            outcome = async {
                let mut agent = speaker.agent.lock().await;
                agent
                    .choose_discussion_utterance(&snapshot.state, &snapshot.recent_chat)
                    .await
            } => outcome,
        };
        if token.is_cancelled() {
            break;
        }
        // A silent turn still counts as a turn.
        last_spoke
            .lock()
            .await
            .insert(speaker.player_id.clone(), Instant::now());
        if outcome.text().is_none() {
            continue;
        }

        let sent = context.outbox.send(ScheduledUtterance {
            epoch: context.epoch,
            speaker_id: speaker.player_id.clone(),
            outcome,
        });
        if sent.is_err() {
            break;
        }
    }
}

/// The alive bot that spoke least recently. Bots that never spoke go first, in seat order.
pub fn pick_speaker<'a>(
    bots: &'a BotRoster,
    state: &'a MatchState,
    last_spoke: &HashMap<PlayerId, Instant>,
) -> Option<&'a BotSeat> {
    let mut best: Option<(&BotSeat, Option<Instant>)> = None;
    for seat in bots.alive_seats(state) {
        let stamp = last_spoke.get(&seat.player_id).copied();
        let better = match best {
            None => true,
            Some((_, None)) => false,
            Some((_, Some(best_stamp))) => stamp.is_none_or(|stamp| stamp < best_stamp),
        };
        if better {
            best = Some((seat, stamp));
        }
    }
    best.map(|(seat, _)| seat)
}
