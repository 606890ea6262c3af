use async_trait::async_trait;

use crate::{
    arena::types::MatchOutcome,
    types::{ChatLine, MatchId, NightActionRecord, VoteRecord},
};

/// Storage for match records. Failures are logged by the runtime and never reach game logic.
#[async_trait]
pub trait PersistencePort: Send + Sync {
    async fn record_night_action(
        &self,
        match_id: &MatchId,
        record: &NightActionRecord,
    ) -> anyhow::Result<()>;

    async fn record_vote(&self, match_id: &MatchId, record: &VoteRecord) -> anyhow::Result<()>;

    async fn record_chat_line(&self, match_id: &MatchId, line: &ChatLine) -> anyhow::Result<()>;

    async fn record_finished_match(&self, outcome: &MatchOutcome) -> anyhow::Result<()>;
}

/// Skill-rating updates after a match ends.
#[async_trait]
pub trait RatingPort: Send + Sync {
    async fn apply_outcome(&self, outcome: &MatchOutcome) -> anyhow::Result<()>;
}
