//! Read-through cache for movie detail.
//!
//! [`CachingService`] is the typed front door: string keys, string values,
//! one fixed eviction policy. The bytes live in a [`CacheStore`], either
//! Redis ([`RedisCacheStore`]) or process memory ([`MemoryCacheStore`]).

pub mod memory;
pub mod redis_store;
pub mod service;
pub mod store;

pub use memory::MemoryCacheStore;
pub use redis_store::RedisCacheStore;
pub use service::{movie_key, CachePolicy, CachingService, MOVIE_CACHE_POLICY};
pub use store::{CacheError, CacheStore};
