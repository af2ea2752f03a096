use crate::domain_model::*;

#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send `request`, attaching `Authorization: Bearer <token>` when `bearer` is set.
    ///
    /// Any HTTP status is a successful send; only failures to get a response are errors.
    async fn send(
        &self,
        request: &ApiRequest,
        bearer: Option<&AccessToken>,
    ) -> Result<ApiResponse, TransportError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
