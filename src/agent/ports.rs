use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    agent::{error::GenerationError, personality::Personality},
    types::{Faction, Phase, RoleName},
};

/// Everything a text backend needs to voice one bot line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub speaker_name: String,
    pub role: RoleName,
    pub faction: Faction,
    pub personality: Personality,
    pub transcript_excerpt: Vec<String>,
    pub threat_level: u8,
    pub phase: Phase,
    pub turn: u32,
    pub alive_count: usize,
    pub max_output_tokens: u32,
    pub prompt: String,
}

#[async_trait]
pub trait GenerationPort: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;
}
