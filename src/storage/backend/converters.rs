use tracing::warn;

use crate::storage::{OwnerId, UrlMapping};
use migration::entities::short_url;

/// 将 Sea-ORM Model 转换为 UrlMapping
pub fn model_to_mapping(model: short_url::Model) -> UrlMapping {
    let owner = model.user_id.parse::<OwnerId>().unwrap_or_else(|_| {
        warn!(
            "Row {} has an unparsable user_id '{}', treating as anonymous",
            model.id, model.user_id
        );
        OwnerId::ANONYMOUS
    });
    UrlMapping::new(owner, model.short_url, model.long_url)
}

/// 将 UrlMapping 转换为 ActiveModel（id 由数据库生成）
pub fn mapping_to_active_model(mapping: &UrlMapping) -> short_url::ActiveModel {
    use sea_orm::ActiveValue::*;

    short_url::ActiveModel {
        id: NotSet,
        user_id: Set(mapping.owner.to_string()),
        short_url: Set(mapping.short.clone()),
        long_url: Set(mapping.long.clone()),
    }
}
