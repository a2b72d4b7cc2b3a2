use crate::error::TokenError;
use crate::rotation::record::RefreshRecord;
use async_trait::async_trait;

pub mod memory;
pub mod redis;

pub use memory::MemoryStore;
pub use redis::RedisStore;

/// Capability contract for durable refresh-credential persistence.
///
/// Every write is all-or-nothing with respect to concurrent readers: no
/// reader ever observes a half-applied write. No operation holds store
/// state across calls; each method is a single scoped write or read.
/// `mark_consumed` is the serialization point for concurrent rotation
/// attempts on the same id.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Persists a fresh record. Fails if the id is already present.
    async fn insert(&self, record: &RefreshRecord) -> Result<(), TokenError>;

    /// Flips `used` to true iff the record exists and is unused.
    /// Returns the number of records affected (0 or 1).
    async fn mark_consumed(&self, id: &str) -> Result<u64, TokenError>;

    /// Deletes the record iff it exists and belongs to `user_id`.
    /// Returns the number of records affected (0 or 1).
    async fn delete_one(&self, user_id: &str, id: &str) -> Result<u64, TokenError>;

    /// Deletes every record owned by `user_id`; returns how many.
    async fn delete_many(&self, user_id: &str) -> Result<u64, TokenError>;

    /// True if `user_id` owns at least one record (used or not).
    async fn exists_user(&self, user_id: &str) -> Result<bool, TokenError>;

    /// True if the record exists and `used == false`.
    async fn exists_active(&self, id: &str) -> Result<bool, TokenError>;
}
