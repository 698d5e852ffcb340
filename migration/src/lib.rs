pub use sea_orm_migration::prelude::*;

mod m20260810_000001_create_users_table;
mod m20260810_000002_create_subjects_table;
mod m20260810_000003_create_user_preferences_table;
mod m20260810_000004_create_user_subject_table;
mod m20260810_000005_create_listings_table;
mod m20260810_000006_create_swipes_table;
mod m20260810_000007_create_matches_table;
mod m20260810_000008_create_messages_table;
mod m20260810_000009_seed_subjects;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260810_000001_create_users_table::Migration),
            Box::new(m20260810_000002_create_subjects_table::Migration),
            Box::new(m20260810_000003_create_user_preferences_table::Migration),
            Box::new(m20260810_000004_create_user_subject_table::Migration),
            Box::new(m20260810_000005_create_listings_table::Migration),
            Box::new(m20260810_000006_create_swipes_table::Migration),
            Box::new(m20260810_000007_create_matches_table::Migration),
            Box::new(m20260810_000008_create_messages_table::Migration),
            Box::new(m20260810_000009_seed_subjects::Migration),
        ]
    }
}
