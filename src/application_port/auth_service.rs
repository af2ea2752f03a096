use crate::application_port::SessionError;
use crate::domain_model::UserId;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("user already exists")]
    UserExists,
    #[error("not logged in")]
    NotLoggedIn,
    #[error("session error: {0}")]
    Session(#[from] SessionError),
}

#[derive(Debug, Clone)]
pub struct SignupInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Create the account, then log in with the same credentials.
    async fn signup(&self, request: SignupInput) -> Result<UserId, AuthError>;
    async fn login(&self, request: LoginInput) -> Result<(), AuthError>;
    /// Revoke the refresh token server-side (best effort) and forget both tokens.
    async fn logout(&self) -> Result<(), AuthError>;
}
