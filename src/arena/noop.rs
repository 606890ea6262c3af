use async_trait::async_trait;

use crate::{
    arena::{
        ports::{PersistencePort, RatingPort},
        types::MatchOutcome,
    },
    types::{ChatLine, MatchId, NightActionRecord, VoteRecord},
};

#[derive(Debug, Clone, Default)]
pub struct NoopPersistence;

#[async_trait]
impl PersistencePort for NoopPersistence {
    async fn record_night_action(
        &self,
        _match_id: &MatchId,
        _record: &NightActionRecord,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    async fn record_vote(&self, _match_id: &MatchId, _record: &VoteRecord) -> anyhow::Result<()> {
        Ok(())
    }

    async fn record_chat_line(&self, _match_id: &MatchId, _line: &ChatLine) -> anyhow::Result<()> {
        Ok(())
    }

    async fn record_finished_match(&self, _outcome: &MatchOutcome) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct NoopRating;

#[async_trait]
impl RatingPort for NoopRating {
    async fn apply_outcome(&self, _outcome: &MatchOutcome) -> anyhow::Result<()> {
        Ok(())
    }
}
