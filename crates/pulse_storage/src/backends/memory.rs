use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use pulse_core::{NewsRecord, NewsStore, Result};
use tokio::sync::RwLock;

use crate::StorageBackend;

pub struct MemoryStore {
    records: Vec<NewsRecord>,
    retention: Duration,
}

impl MemoryStore {
    pub fn new(retention: Duration) -> Self {
        Self {
            records: Vec::new(),
            retention,
        }
    }

    fn purge_expired(&mut self) {
        let now = Utc::now();
        let retention = self.retention;
        self.records.retain(|r| !r.is_expired(now, retention));
    }

    pub fn insert(&mut self, record: &NewsRecord) {
        self.records.push(record.clone());
        self.purge_expired();
    }

    pub fn recent_by_topic(&self, topic: &str, limit: usize) -> Vec<NewsRecord> {
        let now = Utc::now();
        let mut records = self
            .records
            .iter()
            .filter(|r| r.topic == topic && !r.is_expired(now, self.retention))
            .cloned()
            .collect::<Vec<_>>();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records.truncate(limit);
        records
    }

    pub fn topics(&self) -> Vec<String> {
        let now = Utc::now();
        self.records
            .iter()
            .filter(|r| !r.is_expired(now, self.retention))
            .map(|r| r.topic.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Process-local store. Expiry is applied on every read and write.
#[derive(Clone)]
pub struct MemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
}

impl MemoryStorage {
    pub fn new(retention: Duration) -> Self {
        Self {
            store: Arc::new(RwLock::new(MemoryStore::new(retention))),
        }
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    fn get_error_message() -> &'static str {
        "Memory storage should be available"
    }

    async fn open(_url: Option<&str>, retention: Duration) -> Result<Self> {
        Ok(Self::new(retention))
    }
}

#[async_trait]
impl NewsStore for MemoryStorage {
    async fn insert(&self, record: &NewsRecord) -> Result<()> {
        self.store.write().await.insert(record);
        Ok(())
    }

    async fn recent_by_topic(&self, topic: &str, limit: usize) -> Result<Vec<NewsRecord>> {
        Ok(self.store.read().await.recent_by_topic(topic, limit))
    }

    async fn topics(&self) -> Result<Vec<String>> {
        Ok(self.store.read().await.topics())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
