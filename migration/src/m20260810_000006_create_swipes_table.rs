use sea_orm_migration::prelude::*;

/// Creates the `swipes` table. The unique (from, to) pair makes re-swiping
/// an update instead of a second row.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Swipes {
    Table,
    Id,
    FromUserId,
    ToUserId,
    Like,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Swipes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Swipes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Swipes::FromUserId).integer().not_null())
                    .col(ColumnDef::new(Swipes::ToUserId).integer().not_null())
                    .col(
                        ColumnDef::new(Swipes::Like)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Swipes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_swipes_from_user_id")
                            .from(Swipes::Table, Swipes::FromUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_swipes_to_user_id")
                            .from(Swipes::Table, Swipes::ToUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_swipe_from_to")
                    .table(Swipes::Table)
                    .col(Swipes::FromUserId)
                    .col(Swipes::ToUserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Reciprocity check looks up by the receiving side
        manager
            .create_index(
                Index::create()
                    .name("idx_swipes_to_user_id")
                    .table(Swipes::Table)
                    .col(Swipes::ToUserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Swipes::Table).to_owned())
            .await
    }
}
