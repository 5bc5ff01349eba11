use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "short_urls")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Hyphenated UUID; the nil UUID marks an anonymous writer.
    pub user_id: String,
    #[sea_orm(unique)]
    pub short_url: String,
    #[sea_orm(column_type = "Text", unique)]
    pub long_url: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
