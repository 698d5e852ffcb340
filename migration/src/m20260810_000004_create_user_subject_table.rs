use sea_orm_migration::prelude::*;

/// Creates the `user_subject` join table (many-to-many user <-> subject).
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserSubject::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserSubject::UserId).integer().not_null())
                    .col(ColumnDef::new(UserSubject::SubjectId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(UserSubject::UserId)
                            .col(UserSubject::SubjectId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_subject_user_id")
                            .from(UserSubject::Table, UserSubject::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_subject_subject_id")
                            .from(UserSubject::Table, UserSubject::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Reverse lookup: all users interested in a subject
        manager
            .create_index(
                Index::create()
                    .name("idx_user_subject_subject_id")
                    .table(UserSubject::Table)
                    .col(UserSubject::SubjectId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserSubject::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UserSubject {
    Table,
    UserId,
    SubjectId,
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
