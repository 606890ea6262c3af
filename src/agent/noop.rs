use async_trait::async_trait;

use crate::agent::{
    error::{GenerationError, unavailable},
    ports::{GenerationPort, GenerationRequest},
};

/// Generator used when no backend is configured. Every bot line falls back.
#[derive(Debug, Clone, Default)]
pub struct UnavailableGenerator;

#[async_trait]
impl GenerationPort for UnavailableGenerator {
    async fn generate(&self, _request: GenerationRequest) -> Result<String, GenerationError> {
        Err(unavailable("text generation is disabled"))
    }
}
