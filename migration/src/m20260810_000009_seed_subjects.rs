use sea_orm_migration::prelude::*;

/// Seeds the subject catalog used by the onboarding wizard.
#[derive(DeriveMigrationName)]
pub struct Migration;

const SUBJECTS: &[&str] = &[
    "Mathematics",
    "Physics",
    "Chemistry",
    "Biology",
    "English",
    "Computer Science",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = manager.get_database_backend();

        for name in SUBJECTS {
            let sql = if backend == sea_orm::DatabaseBackend::Postgres {
                format!(
                    "INSERT INTO subjects (name) VALUES ('{name}') \
                     ON CONFLICT (name) DO NOTHING"
                )
            } else {
                format!("INSERT OR IGNORE INTO subjects (name) VALUES ('{name}')")
            };
            db.execute(sea_orm::Statement::from_string(backend, sql))
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(Query::delete().from_table(SubjectsIden::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SubjectsIden {
    #[sea_orm(iden = "subjects")]
    Table,
}
