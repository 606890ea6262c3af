use std::{env, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, header};
use serde_json::{Value, json};

use crate::{
    agent::{
        error::{
            GenerationError, GenerationErrorKind, invalid_response, map_http_status, unavailable,
        },
        ports::{GenerationPort, GenerationRequest},
    },
    config::GenerationConfig,
};

/// Chat-completions backend speaking the OpenAI wire format.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleGenerator {
    client: Client,
    endpoint: String,
    model: String,
    api_key_env: Option<String>,
    temperature: f32,
    request_timeout: Duration,
}

impl OpenAiCompatibleGenerator {
    pub fn from_config(config: &GenerationConfig) -> Result<Self, GenerationError> {
        let endpoint = config.endpoint.trim();
        if endpoint.is_empty() {
            return Err(unavailable("generation.endpoint cannot be empty"));
        }

        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| unavailable(format!("failed to build http client: {err}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key_env: config.api_key_env.clone(),
            temperature: config.temperature,
            request_timeout: Duration::from_millis(config.request_timeout_ms),
        })
    }

    fn auth_header(&self) -> Result<Option<String>, GenerationError> {
        let Some(var) = &self.api_key_env else {
            return Ok(None);
        };
        let token = env::var(var).map_err(|_| {
            unavailable(format!("missing credential environment variable {var}"))
        })?;
        Ok(Some(format!("Bearer {token}")))
    }
}

#[async_trait]
impl GenerationPort for OpenAiCompatibleGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let url = format!("{}/chat/completions", self.endpoint);
        let body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": request.prompt}],
            "max_tokens": request.max_output_tokens,
            "temperature": self.temperature,
        });

        let mut builder = self
            .client
            .post(url)
            .timeout(self.request_timeout)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body);
        if let Some(auth_header) = self.auth_header()? {
            builder = builder.header(header::AUTHORIZATION, auth_header);
        }

        let response = builder.send().await.map_err(|err| {
            let kind = if err.is_timeout() {
                GenerationErrorKind::Timeout
            } else {
                GenerationErrorKind::BackendTransient
            };
            GenerationError::new(kind, format!("generation request failed: {err}"))
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_status(status, &body));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| invalid_response(format!("generation response is not json: {err}")))?;
        extract_message_content(&payload)
    }
}

fn extract_message_content(payload: &Value) -> Result<String, GenerationError> {
    payload
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| invalid_response("generation response has no choices[0].message.content"))
}
