//! Mutation operations for SeaOrmStorage
//!
//! This module contains all write database operations.

use sea_orm::{DbErr, EntityTrait, SqlErr};
use tracing::{debug, info};

use super::SeaOrmStorage;
use super::converters::mapping_to_active_model;
use crate::errors::SnaplinkError;
use crate::storage::{OwnerId, SetError, UrlMapping};

use migration::entities::short_url;

impl SeaOrmStorage {
    /// 插入新映射；唯一约束冲突时回查 long_url 判断冲突列
    pub async fn insert_mapping(&self, owner: OwnerId, short: &str, long: &str) -> Result<(), SetError> {
        let mapping = UrlMapping::new(owner, short, long);

        match short_url::Entity::insert(mapping_to_active_model(&mapping))
            .exec(&self.db)
            .await
        {
            Ok(_) => {
                info!("Short URL stored: {}", short);
                Ok(())
            }
            Err(e) if is_unique_violation(&e) => {
                debug!("Unique constraint hit for {}: {}", short, e);
                match self.find_by_long(long).await? {
                    Some(existing) => Err(SetError::UniqueViolation(existing)),
                    None => Err(SetError::CodeTaken(short.to_string())),
                }
            }
            Err(e) => Err(SetError::Other(SnaplinkError::database_operation(format!(
                "Failed to store short URL '{}': {}",
                short, e
            )))),
        }
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
