use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use pulse_core::{Error, NewsStore, Result};

pub mod backends;

pub use backends::*;

/// A store that can be opened from a connection string.
#[async_trait::async_trait]
pub trait StorageBackend: NewsStore + Sized {
    fn get_error_message() -> &'static str;

    async fn open(url: Option<&str>, retention: Duration) -> Result<Self>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Memory,
    #[cfg(feature = "sqlite")]
    Sqlite,
}

impl FromStr for StorageKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StorageKind::Memory),
            #[cfg(feature = "sqlite")]
            "sqlite" => Ok(StorageKind::Sqlite),
            other => Err(Error::Config(format!("Unknown storage backend: {}", other))),
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageKind::Memory => f.write_str("memory"),
            #[cfg(feature = "sqlite")]
            StorageKind::Sqlite => f.write_str("sqlite"),
        }
    }
}

async fn open_backend<T: StorageBackend + 'static>(
    url: Option<&str>,
    retention: Duration,
) -> Result<Arc<dyn NewsStore>> {
    let store = T::open(url, retention)
        .await
        .map_err(|e| Error::Storage(format!("{} ({})", e, T::get_error_message())))?;
    Ok(Arc::new(store))
}

/// Opens the configured backend. `url` is backend specific and may be omitted.
pub async fn create_storage(
    kind: &str,
    url: Option<&str>,
    retention: Duration,
) -> Result<Arc<dyn NewsStore>> {
    match kind.parse::<StorageKind>()? {
        StorageKind::Memory => open_backend::<MemoryStorage>(url, retention).await,
        #[cfg(feature = "sqlite")]
        StorageKind::Sqlite => open_backend::<SQLiteStorage>(url, retention).await,
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_storage, StorageBackend, StorageKind};
}
