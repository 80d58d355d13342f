use async_trait::async_trait;

use crate::types::NewsRecord;
use crate::Result;

/// Persisted news records. Implementations own expiry: records older than
/// their retention window must never be returned.
#[async_trait]
pub trait NewsStore: Send + Sync {
    /// Append a record. There is no upsert; the same URL may appear many times.
    async fn insert(&self, record: &NewsRecord) -> Result<()>;

    /// Most recent records for a topic, newest first, at most `limit`
    async fn recent_by_topic(&self, topic: &str, limit: usize) -> Result<Vec<NewsRecord>>;

    /// Distinct topics currently held, sorted
    async fn topics(&self) -> Result<Vec<String>>;

    /// Fails when the backing store is unreachable
    async fn ping(&self) -> Result<()>;
}
