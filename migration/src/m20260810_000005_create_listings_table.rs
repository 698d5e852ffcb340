use sea_orm_migration::prelude::*;

/// Creates the `listings` table. A listing is cascade-deleted with its owner,
/// but a subject cannot be deleted while listings reference it (RESTRICT).
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Listings {
    Table,
    Id,
    OwnerId,
    SubjectId,
    Title,
    Description,
    Level,
    City,
    IsOnline,
    IsOffline,
    HourlyRate,
    IsPublished,
    PhotoUrl,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Subjects {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Listings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Listings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Listings::OwnerId).integer().not_null())
                    .col(ColumnDef::new(Listings::SubjectId).integer().null())
                    .col(ColumnDef::new(Listings::Title).string_len(200).not_null())
                    .col(
                        ColumnDef::new(Listings::Description)
                            .string_len(2000)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Listings::Level).string_len(80).null())
                    .col(ColumnDef::new(Listings::City).string_len(120).null())
                    .col(
                        ColumnDef::new(Listings::IsOnline)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Listings::IsOffline)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Listings::HourlyRate).double().null())
                    .col(
                        ColumnDef::new(Listings::IsPublished)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Listings::PhotoUrl).string_len(500).null())
                    .col(
                        ColumnDef::new(Listings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listings_owner_id")
                            .from(Listings::Table, Listings::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_listings_subject_id")
                            .from(Listings::Table, Listings::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_listings_owner_id")
                    .table(Listings::Table)
                    .col(Listings::OwnerId)
                    .to_owned(),
            )
            .await?;

        // Feed scans filter on publication state
        manager
            .create_index(
                Index::create()
                    .name("idx_listings_is_published")
                    .table(Listings::Table)
                    .col(Listings::IsPublished)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Listings::Table).to_owned())
            .await
    }
}
