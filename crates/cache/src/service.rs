//! Typed cache front end with a fixed eviction policy.
//!
//! Every write gets the same policy: an absolute lifetime measured from the
//! write, and a sliding window re-armed by every hit. Whichever runs out
//! first evicts the entry.
//!
//! Stores only understand a single TTL, so the value is wrapped in an
//! envelope that remembers its absolute deadline. The store TTL is always
//! `min(sliding, absolute_expiry - now)`.

use std::sync::Arc;
use std::time::Duration;

use movies_core::clock::Clock;
use movies_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::store::{CacheError, CacheStore};

/// Absolute and sliding expiry applied to an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub absolute: Duration,
    pub sliding: Duration,
}

/// Five minutes absolute, two minutes sliding.
pub const MOVIE_CACHE_POLICY: CachePolicy = CachePolicy {
    absolute: Duration::from_secs(5 * 60),
    sliding: Duration::from_secs(2 * 60),
};

/// Cache key for a movie's detailed representation.
pub fn movie_key(id: DbId) -> String {
    format!("movie_{id}")
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    value: String,
    absolute_expiry: Timestamp,
}

#[derive(Clone)]
pub struct CachingService {
    store: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    policy: CachePolicy,
}

impl CachingService {
    pub fn new(store: Arc<dyn CacheStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            policy: MOVIE_CACHE_POLICY,
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Fetch the value under `key`, re-arming its sliding window.
    ///
    /// An empty string is a present value; absence is `None`. Entries whose
    /// envelope cannot be decoded are dropped and reported absent.
    pub async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };

        let envelope: Envelope = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(key, error = %e, "Dropping undecodable cache entry");
                self.store.remove(key).await?;
                return Ok(None);
            }
        };

        let remaining = (envelope.absolute_expiry - self.clock.now())
            .to_std()
            .unwrap_or(Duration::ZERO);
        if remaining.is_zero() {
            self.store.remove(key).await?;
            return Ok(None);
        }

        self.store
            .expire(key, remaining.min(self.policy.sliding))
            .await?;
        Ok(Some(envelope.value))
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub async fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let absolute = chrono::Duration::from_std(self.policy.absolute)
            .unwrap_or_else(|_| chrono::Duration::minutes(5));
        let envelope = Envelope {
            value: value.to_string(),
            absolute_expiry: self.clock.now() + absolute,
        };
        let raw = serde_json::to_string(&envelope)?;
        let ttl = self.policy.sliding.min(self.policy.absolute);
        self.store.set(key, &raw, ttl).await
    }

    /// Evict `key`. Missing keys are not an error.
    pub async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.store.remove(key).await
    }
}
