use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

/// MySQL cannot put a unique index on an unbounded TEXT column; 768 utf8mb4
/// characters is the widest VARCHAR that still fits the 3072-byte key limit.
const MYSQL_LONG_URL_LEN: u32 = 768;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut long_url = ColumnDef::new(ShortUrl::LongUrl);
        match manager.get_database_backend() {
            DatabaseBackend::MySql => long_url.string_len(MYSQL_LONG_URL_LEN),
            _ => long_url.text(),
        };
        long_url.not_null();

        manager
            .create_table(
                Table::create()
                    .table(ShortUrl::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ShortUrl::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ShortUrl::UserId).string_len(36).not_null())
                    .col(ColumnDef::new(ShortUrl::ShortUrl).string_len(32).not_null())
                    .col(&mut long_url)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_short_urls_short_url")
                    .table(ShortUrl::Table)
                    .col(ShortUrl::ShortUrl)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("long_url_unique_idx")
                    .table(ShortUrl::Table)
                    .col(ShortUrl::LongUrl)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 按用户查询历史
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_short_urls_user_id")
                    .table(ShortUrl::Table)
                    .col(ShortUrl::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_short_urls_user_id").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("long_url_unique_idx").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_short_urls_short_url").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ShortUrl::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ShortUrl {
    #[sea_orm(iden = "short_urls")]
    Table,
    Id,
    UserId,
    ShortUrl,
    LongUrl,
}
