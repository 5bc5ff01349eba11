//! SeaORM storage backend
//!
//! This module provides database storage using SeaORM,
//! supporting SQLite, MySQL/MariaDB, and PostgreSQL.

mod connection;
mod converters;
mod mutations;
mod query;

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tracing::{error, warn};

use super::{OwnerId, SetError, UrlStorage};
use crate::errors::{Result, SnaplinkError};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{mapping_to_active_model, model_to_mapping};

/// `ping` 的超时时间
const PING_TIMEOUT: Duration = Duration::from_secs(2);

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<&'static str> {
    if database_url.starts_with("sqlite://")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite")
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql")
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres")
    } else {
        Err(SnaplinkError::database_config(format!(
            "Cannot infer database type from '{}'. Supported schemes: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: &'static str,
}

impl SeaOrmStorage {
    pub async fn new(database_url: &str, backend_name: &'static str, pool_size: u32) -> Result<Self> {
        if database_url.is_empty() {
            return Err(SnaplinkError::database_config("Database DSN is empty"));
        }

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url, pool_size).await?
        } else {
            connect_generic(database_url, backend_name, pool_size).await?
        };

        let storage = SeaOrmStorage { db, backend_name };
        run_migrations(&storage.db).await?;

        warn!("{} storage initialized.", storage.backend_name.to_uppercase());
        Ok(storage)
    }
}

#[async_trait]
impl UrlStorage for SeaOrmStorage {
    async fn get(&self, short: &str) -> Option<String> {
        match self.find_by_short(short).await {
            Ok(found) => found.map(|m| m.long),
            Err(e) => {
                error!("Failed to look up short code {}: {}", short, e);
                None
            }
        }
    }

    async fn set(&self, owner: OwnerId, short: &str, long: &str) -> std::result::Result<(), SetError> {
        self.insert_mapping(owner, short, long).await
    }

    async fn get_history(&self, owner: OwnerId) -> Result<HashMap<String, String>> {
        self.load_history(owner).await
    }

    async fn ping(&self) -> Result<()> {
        match tokio::time::timeout(PING_TIMEOUT, self.db.ping()).await {
            Ok(result) => result.map_err(|e| {
                SnaplinkError::database_connection(format!("Database ping failed: {}", e))
            }),
            Err(_) => Err(SnaplinkError::database_connection(format!(
                "Database ping timed out after {}s",
                PING_TIMEOUT.as_secs()
            ))),
        }
    }

    fn backend_name(&self) -> &'static str {
        self.backend_name
    }
}
