use crate::application_impl::TokenStore;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::Arc;

pub const LOGIN_PATH: &str = "/auth/login";
pub const SIGNUP_PATH: &str = "/auth/signup";
pub const LOGOUT_PATH: &str = "/auth/logout";

#[derive(Debug, Deserialize)]
struct SignupResponse {
    id: UserId,
}

/// Credential exchanges against `/auth/*`.
///
/// These calls go straight to the transport: they carry no bearer token
/// and never take part in refresh coordination.
pub struct RealAuthService {
    transport: Arc<dyn HttpTransport>,
    tokens: Arc<TokenStore>,
}

impl RealAuthService {
    pub fn new(transport: Arc<dyn HttpTransport>, tokens: Arc<TokenStore>) -> Self {
        Self { transport, tokens }
    }
}

#[async_trait::async_trait]
impl AuthService for RealAuthService {
    async fn signup(&self, request: SignupInput) -> Result<UserId, AuthError> {
        let body = serde_json::json!({
            "username": request.username,
            "email": request.email,
            "password": request.password,
            "full_name": request.full_name,
        });
        let response = self
            .transport
            .send(&ApiRequest::post(SIGNUP_PATH).with_body(body), None)
            .await
            .map_err(SessionError::from)?;
        if response.status == StatusCode::BAD_REQUEST {
            return Err(AuthError::UserExists);
        }
        let created: SignupResponse = decode(response)?;
        tracing::info!(user_id = %created.id, "account created");

        self.login(LoginInput {
            username: request.username,
            password: request.password,
        })
        .await?;
        Ok(created.id)
    }

    async fn login(&self, request: LoginInput) -> Result<(), AuthError> {
        let body = serde_json::json!({
            "username": request.username,
            "password": request.password,
        });
        let response = self
            .transport
            .send(&ApiRequest::post(LOGIN_PATH).with_body(body), None)
            .await
            .map_err(SessionError::from)?;
        if response.is_unauthorized() {
            return Err(AuthError::InvalidCredentials);
        }
        let tokens: TokenResponse = decode(response)?;
        self.tokens.replace(tokens.into());
        tracing::info!(username = %request.username, "logged in");
        Ok(())
    }

    async fn logout(&self) -> Result<(), AuthError> {
        let Some(refresh_token) = self.tokens.refresh() else {
            self.tokens.clear();
            return Err(AuthError::NotLoggedIn);
        };

        let request = ApiRequest::post(LOGOUT_PATH)
            .with_body(serde_json::json!({ "refresh_token": refresh_token.0 }));
        match self.transport.send(&request, None).await {
            Ok(response) if response.is_success() => tracing::debug!("refresh token revoked"),
            Ok(response) => tracing::warn!("logout rejected with status {}", response.status),
            Err(e) => tracing::warn!("logout request failed: {}", e),
        }

        self.tokens.clear();
        tracing::info!("logged out");
        Ok(())
    }
}

fn decode<T: serde::de::DeserializeOwned>(response: ApiResponse) -> Result<T, AuthError> {
    if !response.is_success() {
        return Err(SessionError::Status {
            status: response.status,
            body: response.body,
        }
        .into());
    }
    response
        .json()
        .map_err(|e| SessionError::Decode(e.to_string()).into())
}
