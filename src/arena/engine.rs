use rand::Rng;
use uuid::Uuid;

use crate::{
    arena::{
        error::{MatchError, MatchErrorKind},
        rules::MatchRules,
        types::MatchOutcome,
    },
    ledger::ActionLedger,
    phase::{PhaseChange, PhaseHook, PhaseStateMachine},
    resolution::{self, VoteResolution},
    roster::{self, catalog::night_action_for},
    types::{
        Faction, InvestigationVerdict, MatchId, MatchState, NightActionKind, Phase, Player,
        PlayerId, RoleName,
    },
};

pub const BOT_NAMES: [&str; 10] = [
    "ALI-CE", "BOB-2", "CHAR-7", "DATA-9", "EVE-X", "FELIX", "GAMMA", "HALO-1", "IRIS-5", "JINX-9",
];

/// Synchronous core of one match: roster, phase machine, ledger and resolution.
///
/// All mutation of `MatchState` goes through here. Timers and bots live in
/// [`crate::arena::MatchRuntime`].
pub struct MatchEngine {
    state: MatchState,
    machine: PhaseStateMachine,
    rules: MatchRules,
    started: bool,
}

impl MatchEngine {
    pub fn new(id: impl Into<MatchId>, rules: MatchRules) -> Self {
        Self {
            state: MatchState::new(id),
            machine: PhaseStateMachine::new(),
            rules,
            started: false,
        }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    pub fn turn(&self) -> u32 {
        self.machine.turn()
    }

    pub fn epoch(&self) -> u64 {
        self.machine.epoch()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_finished(&self) -> bool {
        self.state.finished
    }

    pub fn on_phase_enter(&mut self, phase: Phase, hook: PhaseHook) {
        self.machine.on_enter(phase, hook);
    }

    pub fn add_player(
        &mut self,
        id: impl Into<PlayerId>,
        name: impl Into<String>,
        is_bot: bool,
    ) -> Result<PlayerId, MatchError> {
        self.ensure_lobby()?;
        if self.state.players.len() >= self.rules.max_players {
            return Err(MatchError::new(
                MatchErrorKind::InvalidPlayerCount,
                format!("match is full at {} players", self.rules.max_players),
            ));
        }

        let player = Player::new(id, name, is_bot);
        if self.state.player(&player.id).is_some() {
            return Err(MatchError::new(
                MatchErrorKind::InvalidConfiguration,
                format!("player {} already joined", player.id),
            ));
        }
        let id = player.id.clone();
        self.state.players.push(player);
        self.state.touch();
        Ok(id)
    }

    /// Fills up to `count` seats with bots. Returns the ids of the bots added.
    pub fn add_bot_players(&mut self, count: usize) -> Result<Vec<PlayerId>, MatchError> {
        self.ensure_lobby()?;
        let free = self.rules.max_players.saturating_sub(self.state.players.len());
        let mut added = Vec::new();

        for index in 0..count.min(free) {
            let name = self.unused_bot_name(index);
            let id = format!("bot-{}", Uuid::new_v4());
            added.push(self.add_player(id, name, true)?);
        }
        Ok(added)
    }

    pub fn remove_player(&mut self, player_id: &str) -> Result<(), MatchError> {
        self.ensure_lobby()?;
        let before = self.state.players.len();
        self.state.players.retain(|player| player.id != player_id);
        if self.state.players.len() == before {
            return Err(MatchError::new(
                MatchErrorKind::UnknownPlayer,
                format!("player {player_id} is not part of this match"),
            ));
        }
        self.state.touch();
        Ok(())
    }

    /// Deals shuffled roles and enters the first night.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<PhaseChange, MatchError> {
        self.ensure_startable()?;
        roster::assign_roles(&mut self.state.players, &self.rules.distribution, rng)?;
        Ok(self.begin())
    }

    /// Starts with an explicit role order, one role per seat.
    pub fn start_with_deal(&mut self, deal: Vec<RoleName>) -> Result<PhaseChange, MatchError> {
        self.ensure_startable()?;
        roster::assign_deal(&mut self.state.players, &self.rules.distribution, deal)?;
        Ok(self.begin())
    }

    pub fn record_night_action(
        &mut self,
        actor_id: &str,
        target_id: &str,
        kind: NightActionKind,
    ) -> Result<(), MatchError> {
        self.ensure_running()?;
        ActionLedger::new(&mut self.state).check_night_action(actor_id, target_id)?;
        let entitled = self
            .state
            .player(actor_id)
            .and_then(|actor| actor.role_name())
            .and_then(night_action_for);
        if entitled != Some(kind) {
            return Err(MatchError::new(
                MatchErrorKind::ActionNotPermitted,
                format!("player {actor_id} cannot perform {kind:?} at night"),
            ));
        }
        ActionLedger::new(&mut self.state).record_night_action(actor_id, target_id, kind)?;
        Ok(())
    }

    pub fn record_vote(&mut self, voter_id: &str, target_id: &str) -> Result<(), MatchError> {
        self.ensure_running()?;
        ActionLedger::new(&mut self.state).record_vote(voter_id, target_id)?;
        Ok(())
    }

    /// What an investigation of `target_id` reveals.
    pub fn investigation_verdict(&self, target_id: &str) -> Result<InvestigationVerdict, MatchError> {
        let target = self.state.player(target_id).ok_or_else(|| {
            MatchError::new(
                MatchErrorKind::UnknownPlayer,
                format!("player {target_id} is not part of this match"),
            )
        })?;
        Ok(match target.role_name() {
            Some(RoleName::Ai) => InvestigationVerdict::Ai,
            _ => InvestigationVerdict::NotAi,
        })
    }

    /// Steps the phase machine. Pending deadlines are not cancelled here; the
    /// runtime compares their epoch against `epoch()` before acting.
    pub fn advance_phase(&mut self) -> Option<PhaseChange> {
        if !self.started {
            return None;
        }
        let change = self.machine.advance_phase()?;
        self.sync_phase();
        Some(change)
    }

    /// Resolves the current turn's night actions and marks casualties dead.
    pub fn resolve_night(&mut self) -> Vec<PlayerId> {
        let turn = self.state.turn;
        let casualties =
            resolution::resolve_night(&self.state.night_actions, turn, &self.state.players);
        resolution::mark_dead(&mut self.state.players, &casualties);
        self.state.touch();
        casualties
    }

    /// Tallies the current turn's votes and marks a unique leader dead.
    pub fn resolve_votes(&mut self) -> VoteResolution {
        let mut resolved = resolution::resolve_votes(&self.state.votes, self.state.turn);
        if let Some(eliminated) = resolved.eliminated.take() {
            // Votes may land on a player who already died; nobody leaves the table then.
            let flipped =
                resolution::mark_dead(&mut self.state.players, std::slice::from_ref(&eliminated));
            if flipped > 0 {
                resolved.eliminated = Some(eliminated);
            }
        }
        self.state.touch();
        resolved
    }

    pub fn evaluate_winner(&self) -> Option<Faction> {
        let sole_survivor = match self.state.alive_players().collect::<Vec<_>>().as_slice() {
            [only] => only.role_name(),
            _ => None,
        };
        resolution::evaluate_winner(self.state.faction_counts(), sole_survivor)
    }

    /// Terminal transition. Later mutations fail with `MatchFinished`.
    pub fn finish(&mut self, winner: Option<Faction>) -> MatchOutcome {
        if !self.state.finished {
            self.state.finished = true;
            self.state.winner = winner;
            self.machine.mark_finished();
            self.state.touch();
        }
        MatchOutcome::from_state(&self.state)
    }

    fn begin(&mut self) -> PhaseChange {
        self.started = true;
        let change = self.machine.begin();
        self.sync_phase();
        change
    }

    fn sync_phase(&mut self) {
        self.state.phase = self.machine.phase();
        self.state.turn = self.machine.turn();
        self.state.touch();
    }

    fn unused_bot_name(&self, offset: usize) -> String {
        let taken = |name: &str| self.state.players.iter().any(|player| player.name == name);
        if let Some(name) = BOT_NAMES.iter().find(|name| !taken(name)) {
            return (*name).to_string();
        }
        let base = BOT_NAMES[offset % BOT_NAMES.len()];
        (2..)
            .map(|suffix| format!("{base}-{suffix}"))
            .find(|name| !taken(name))
            .unwrap_or_else(|| base.to_string())
    }

    fn ensure_lobby(&self) -> Result<(), MatchError> {
        if self.started {
            return Err(MatchError::new(
                MatchErrorKind::AlreadyStarted,
                "roster is locked once the match has started",
            ));
        }
        Ok(())
    }

    fn ensure_startable(&self) -> Result<(), MatchError> {
        self.ensure_lobby()?;
        let count = self.state.players.len();
        if count < self.rules.min_players || count > self.rules.max_players {
            return Err(MatchError::new(
                MatchErrorKind::InvalidPlayerCount,
                format!(
                    "{count} players joined, {}..={} required",
                    self.rules.min_players, self.rules.max_players
                ),
            ));
        }
        Ok(())
    }

    fn ensure_running(&self) -> Result<(), MatchError> {
        if !self.started {
            return Err(MatchError::new(
                MatchErrorKind::NotStarted,
                "match has not started",
            ));
        }
        if self.state.finished {
            return Err(MatchError::new(
                MatchErrorKind::MatchFinished,
                "match is finished",
            ));
        }
        Ok(())
    }
}
