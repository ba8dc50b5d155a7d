use std::time::Duration;

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection unavailable: {0}")]
    Unavailable(String),

    #[error("Cache command failed: {0}")]
    Command(#[from] deadpool_redis::redis::RedisError),

    #[error("Cache entry could not be encoded: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Raw key/value storage with per-key time-to-live.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch a live value. Expired keys read as `None`.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Write `value`, expiring it `ttl` from now.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Re-arm the expiry of an existing key. Missing keys are ignored.
    async fn expire(&self, key: &str, ttl: Duration) -> Result<(), CacheError>;

    async fn remove(&self, key: &str) -> Result<(), CacheError>;
}
