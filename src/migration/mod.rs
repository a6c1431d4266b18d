//! SeaORM database migrations.
//!
//! Tables are declared with the schema builder so the same migrations run on
//! PostgreSQL and on the in-memory SQLite databases used by the test suite.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_settings_tables;
mod m20260301_000002_create_user_profiles;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_settings_tables::Migration),
            Box::new(m20260301_000002_create_user_profiles::Migration),
        ]
    }
}
