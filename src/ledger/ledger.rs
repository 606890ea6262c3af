use crate::{
    ledger::error::{LedgerError, LedgerErrorKind, unknown_player},
    types::{MatchState, NightActionKind, NightActionRecord, Phase, VoteRecord},
};

/// Append/replace access to the night-action and vote logs of a match.
///
/// Validation happens before any write; a rejected call leaves both logs untouched.
pub struct ActionLedger<'a> {
    state: &'a mut MatchState,
}

impl<'a> ActionLedger<'a> {
    pub fn new(state: &'a mut MatchState) -> Self {
        Self { state }
    }

    /// Appends a night action. Repeated submissions by one actor are all kept.
    pub fn record_night_action(
        &mut self,
        actor_id: &str,
        target_id: &str,
        kind: NightActionKind,
    ) -> Result<(), LedgerError> {
        self.check_night_action(actor_id, target_id)?;

        let turn = self.state.turn;
        self.state.night_actions.push(NightActionRecord {
            actor_id: actor_id.to_string(),
            target_id: target_id.to_string(),
            kind,
            turn,
        });
        self.state.touch();
        Ok(())
    }

    /// Records a vote, replacing any earlier vote by the same voter this turn.
    pub fn record_vote(&mut self, voter_id: &str, target_id: &str) -> Result<(), LedgerError> {
        self.ensure_open(Phase::DayVote)?;

        let voter = self.state.player(voter_id).ok_or_else(|| unknown_player(voter_id))?;
        if !voter.is_alive() {
            return Err(LedgerError::new(
                LedgerErrorKind::VoterNotAlive,
                format!("player {voter_id} is dead and cannot vote"),
            ));
        }
        self.state
            .player(target_id)
            .ok_or_else(|| unknown_player(target_id))?;

        let turn = self.state.turn;
        match self
            .state
            .votes
            .iter_mut()
            .find(|vote| vote.voter_id == voter_id && vote.turn == turn)
        {
            Some(existing) => existing.target_id = target_id.to_string(),
            None => self.state.votes.push(VoteRecord {
                voter_id: voter_id.to_string(),
                target_id: target_id.to_string(),
                turn,
            }),
        }
        self.state.touch();
        Ok(())
    }

    /// Phase, actor and target checks for a night action, without writing anything.
    pub fn check_night_action(&self, actor_id: &str, target_id: &str) -> Result<(), LedgerError> {
        self.ensure_open(Phase::Night)?;

        let actor = self.state.player(actor_id).ok_or_else(|| unknown_player(actor_id))?;
        if !actor.is_alive() {
            return Err(LedgerError::new(
                LedgerErrorKind::ActorNotAlive,
                format!("player {actor_id} is dead and cannot act"),
            ));
        }
        self.state
            .player(target_id)
            .ok_or_else(|| unknown_player(target_id))?;
        Ok(())
    }

    fn ensure_open(&self, expected: Phase) -> Result<(), LedgerError> {
        if self.state.finished {
            return Err(LedgerError::new(
                LedgerErrorKind::MatchFinished,
                "match is finished",
            ));
        }
        if self.state.phase != expected {
            return Err(LedgerError::new(
                LedgerErrorKind::InvalidPhase,
                format!(
                    "expected phase {expected}, current phase is {}",
                    self.state.phase
                ),
            ));
        }
        Ok(())
    }
}
