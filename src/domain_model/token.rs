use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(pub String);

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefreshToken(pub String);

// Credentials never show up in logs in full.
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken({})", mask(&self.0))
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RefreshToken({})", mask(&self.0))
    }
}

fn mask(token: &str) -> String {
    let head: String = token.chars().take(4).collect();
    format!("{}…", head)
}

/// The credential pair owned by the token store.
///
/// `access` is only ever set from a login, signup or refresh response.
/// `refresh` is the sole credential able to mint a new `access`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenPair {
    pub access: Option<AccessToken>,
    pub refresh: Option<RefreshToken>,
}

impl TokenPair {
    pub fn new(access: AccessToken, refresh: RefreshToken) -> Self {
        Self {
            access: Some(access),
            refresh: Some(refresh),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.access.is_none() && self.refresh.is_none()
    }
}

/// Wire shape shared by the login and refresh endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
}

impl From<TokenResponse> for TokenPair {
    fn from(value: TokenResponse) -> Self {
        TokenPair::new(value.access_token, value.refresh_token)
    }
}
