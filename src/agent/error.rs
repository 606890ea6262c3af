use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationErrorKind {
    Unavailable,
    Timeout,
    BackendTransient,
    BackendPermanent,
    InvalidResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationError {
    pub kind: GenerationErrorKind,
    pub message: String,
    pub http_status: Option<u16>,
}

impl GenerationError {
    pub fn new(kind: GenerationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            http_status: None,
        }
    }

    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.http_status {
            Some(status) => write!(f, "{} (status={})", self.message, status),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for GenerationError {}

pub fn unavailable(message: impl Into<String>) -> GenerationError {
    GenerationError::new(GenerationErrorKind::Unavailable, message)
}

pub fn invalid_response(message: impl Into<String>) -> GenerationError {
    GenerationError::new(GenerationErrorKind::InvalidResponse, message)
}

/// Maps a non-success HTTP status from a generation backend.
pub fn map_http_status(status: u16, body: &str) -> GenerationError {
    let body = body.chars().take(240).collect::<String>();
    let kind = if status == 408 || status == 429 || status >= 500 {
        GenerationErrorKind::BackendTransient
    } else {
        GenerationErrorKind::BackendPermanent
    };

    let mut message = format!("generation backend returned status {status}");
    if !body.is_empty() {
        message = format!("{message}: {body}");
    }
    GenerationError::new(kind, message).with_http_status(status)
}
