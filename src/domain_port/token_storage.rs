/// Durable key for the access token.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Durable key for the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Durable per-origin key/value storage mirroring the token pair.
pub trait TokenStorage: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}
