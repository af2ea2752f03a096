use crate::domain_model::*;
use crate::domain_port::TransportError;
use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// 401 that a refresh could not repair; carries the original response.
    #[error("unauthorized")]
    Unauthorized(ApiResponse),
    #[error("unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("decode error: {0}")]
    Decode(String),
}

impl SessionError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, SessionError::Unauthorized(_))
    }
}
