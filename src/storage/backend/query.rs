//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use std::collections::HashMap;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QuerySelect};
use tracing::debug;

use super::SeaOrmStorage;
use super::converters::model_to_mapping;
use crate::errors::Result;
use crate::storage::{OwnerId, UrlMapping};

use migration::entities::short_url;

impl SeaOrmStorage {
    pub async fn find_by_short(&self, short: &str) -> Result<Option<UrlMapping>> {
        let model = short_url::Entity::find()
            .filter(short_url::Column::ShortUrl.eq(short))
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_mapping))
    }

    pub async fn find_by_long(&self, long: &str) -> Result<Option<UrlMapping>> {
        let model = short_url::Entity::find()
            .filter(short_url::Column::LongUrl.eq(long))
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_mapping))
    }

    pub async fn load_history(&self, owner: OwnerId) -> Result<HashMap<String, String>> {
        if owner.is_anonymous() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(String, String)> = short_url::Entity::find()
            .select_only()
            .column(short_url::Column::ShortUrl)
            .column(short_url::Column::LongUrl)
            .filter(short_url::Column::UserId.eq(owner.to_string()))
            .into_tuple()
            .all(&self.db)
            .await?;

        debug!("Loaded {} history rows for {}", rows.len(), owner);
        Ok(rows.into_iter().collect())
    }
}
