use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Stores::Table)
                    .if_not_exists()
                    .col(pk_uuid(Stores::Id))
                    .col(string_len(Stores::Name, 60))
                    .col(string(Stores::Email))
                    .col(string_len(Stores::Address, 400))
                    // Mean of all ratings, recomputed on every rating write
                    .col(decimal_len(Stores::Rating, 3, 2).default("0.00"))
                    .col(uuid_null(Stores::OwnerId))
                    .col(
                        timestamp_with_time_zone(Stores::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Stores::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stores_owner_id")
                            .from(Stores::Table, Stores::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_stores_owner_id")
                    .table(Stores::Table)
                    .col(Stores::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_stores_name")
                    .table(Stores::Table)
                    .col(Stores::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TRIGGER stores_touch_updated_at
                    BEFORE UPDATE ON stores
                    FOR EACH ROW
                    EXECUTE FUNCTION util.touch_updated_at()
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TRIGGER IF EXISTS stores_touch_updated_at ON stores")
            .await?;

        manager
            .drop_table(Table::drop().table(Stores::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Stores {
    Table,
    Id,
    Name,
    Email,
    Address,
    Rating,
    OwnerId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
