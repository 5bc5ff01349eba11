use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::StorageConfig;
use crate::errors::Result;

pub mod backend;
pub mod file;
pub mod memory;
pub mod models;

pub use backend::SeaOrmStorage;
pub use file::FileStorage;
pub use memory::{MappingIndex, MemoryStorage};
pub use models::{OwnerId, SetError, UrlMapping};

/// Storage contract shared by every backend.
///
/// All backends must behave identically: a short code maps to exactly one
/// long URL, a long URL is stored under exactly one short code, and history
/// is only recorded for non-anonymous owners.
#[async_trait]
pub trait UrlStorage: Send + Sync {
    /// Look up the long URL for `short`. Read failures are logged and
    /// reported as a miss.
    async fn get(&self, short: &str) -> Option<String>;

    /// Insert a new mapping.
    async fn set(&self, owner: OwnerId, short: &str, long: &str) -> std::result::Result<(), SetError>;

    /// All `short → long` mappings created by `owner`.
    async fn get_history(&self, owner: OwnerId) -> Result<HashMap<String, String>>;

    /// Liveness probe.
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str;
}

pub struct StorageFactory;

impl StorageFactory {
    /// Open the backend selected by `config`.
    ///
    /// Precedence: database DSN, then file path, then in-memory.
    pub async fn create(config: &StorageConfig) -> Result<Arc<dyn UrlStorage>> {
        let storage: Arc<dyn UrlStorage> = match (non_empty(&config.database_dsn), non_empty(&config.file_path)) {
            (Some(dsn), _) => {
                let backend_type = backend::infer_backend_from_url(dsn)?;
                Arc::new(SeaOrmStorage::new(dsn, backend_type, config.pool_size).await?)
            }
            (None, Some(path)) => Arc::new(FileStorage::open(path)?),
            (None, None) => Arc::new(MemoryStorage::new()),
        };

        info!("Using storage backend: {}", storage.backend_name());
        Ok(storage)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
