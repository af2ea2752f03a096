use crate::application_impl::TokenStore;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::{Arc, Weak};

pub const REFRESH_PATH: &str = "/auth/refresh";

#[derive(Debug, Clone, thiserror::Error)]
pub enum RefreshFailure {
    #[error("no refresh token held")]
    NoRefreshToken,
    #[error("refresh rejected with status {0}")]
    Rejected(StatusCode),
    #[error("refresh response could not be decoded: {0}")]
    Decode(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

type RefreshOutcome = Result<AccessToken, RefreshFailure>;
type RefreshHandle = Shared<BoxFuture<'static, RefreshOutcome>>;
type RefreshSlot = Mutex<Option<RefreshHandle>>;

/// HTTP session that attaches the bearer token to every call and repairs
/// expired access tokens transparently.
///
/// A 401 triggers at most one refresh per session no matter how many
/// requests hit it at once: the first caller installs a shared handle in
/// `refresh_slot`, every later caller awaits that same handle, and the
/// handle removes itself once the refresh settles. Each request is replayed
/// at most once. Clones share the slot and the token store.
#[derive(Clone)]
pub struct AuthenticatedSession {
    transport: Arc<dyn HttpTransport>,
    tokens: Arc<TokenStore>,
    refresh_slot: Arc<RefreshSlot>,
}

impl AuthenticatedSession {
    pub fn new(transport: Arc<dyn HttpTransport>, tokens: Arc<TokenStore>) -> Self {
        Self {
            transport,
            tokens,
            refresh_slot: Arc::new(Mutex::new(None)),
        }
    }

    pub fn tokens(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    /// Send `request` with the current access token.
    ///
    /// Statuses other than 401 are returned untouched, error statuses included.
    /// A 401 that cannot be repaired yields [`SessionError::Unauthorized`].
    pub async fn request(&self, request: &ApiRequest) -> Result<ApiResponse, SessionError> {
        // read at send time, a refresh may have replaced it since construction
        let sent_with = self.tokens.access();
        let response = self.transport.send(request, sent_with.as_ref()).await?;
        if !response.is_unauthorized() {
            return Ok(response);
        }

        let token = match self.tokens.access() {
            Some(current) if Some(&current) != sent_with.as_ref() => {
                tracing::debug!(path = %request.path, "access token changed in flight; replaying");
                current
            }
            _ => match self.refreshed_access_token().await {
                Ok(token) => token,
                Err(e) => {
                    tracing::debug!(path = %request.path, "giving up after failed refresh: {}", e);
                    return Err(SessionError::Unauthorized(response));
                }
            },
        };

        tracing::debug!(method = %request.method, path = %request.path, "replaying request");
        let replayed = self.transport.send(request, Some(&token)).await?;
        if replayed.is_unauthorized() {
            return Err(SessionError::Unauthorized(replayed));
        }
        Ok(replayed)
    }

    /// [`request`](Self::request), then decode a 2xx JSON body.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> Result<T, SessionError> {
        let response = self.request(request).await?;
        if !response.is_success() {
            return Err(SessionError::Status {
                status: response.status,
                body: response.body,
            });
        }
        response
            .json()
            .map_err(|e| SessionError::Decode(e.to_string()))
    }

    async fn refreshed_access_token(&self) -> RefreshOutcome {
        let handle = {
            let mut slot = self.refresh_slot.lock();
            match slot.as_ref() {
                Some(handle) => handle.clone(),
                None => {
                    let handle = run_refresh(
                        self.transport.clone(),
                        self.tokens.clone(),
                        Arc::downgrade(&self.refresh_slot),
                    )
                    .boxed()
                    .shared();
                    *slot = Some(handle.clone());
                    handle
                }
            }
        };
        handle.await
    }
}

async fn run_refresh(
    transport: Arc<dyn HttpTransport>,
    tokens: Arc<TokenStore>,
    slot: Weak<RefreshSlot>,
) -> RefreshOutcome {
    let outcome = refresh_once(transport.as_ref(), &tokens).await;
    match &outcome {
        Ok(_) => tracing::info!("access token refreshed"),
        Err(e) => {
            tracing::warn!("token refresh failed, logging out: {}", e);
            tokens.clear();
        }
    }
    if let Some(slot) = slot.upgrade() {
        slot.lock().take();
    }
    outcome
}

async fn refresh_once(transport: &dyn HttpTransport, tokens: &TokenStore) -> RefreshOutcome {
    let refresh_token = tokens.refresh().ok_or(RefreshFailure::NoRefreshToken)?;
    let request = ApiRequest::post(REFRESH_PATH)
        .with_body(serde_json::json!({ "refresh_token": refresh_token.0 }));

    let response = transport.send(&request, None).await?;
    if !response.is_success() {
        return Err(RefreshFailure::Rejected(response.status));
    }
    let body: TokenResponse = response
        .json()
        .map_err(|e| RefreshFailure::Decode(e.to_string()))?;

    let access = body.access_token.clone();
    tokens.replace(body.into());
    Ok(access)
}
