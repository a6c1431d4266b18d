//! Migration: Create the settings tables referenced by user profiles.
//!
//! Emergency contacts, notification settings and work preferences only carry
//! identity and audit columns here; their payload belongs to the settings app.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
pub(super) enum EmergencyContacts {
    Table,
    Id,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(super) enum Notifications {
    Table,
    Id,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(super) enum WorkPreferences {
    Table,
    Id,
    CreatedAt,
    UpdatedAt,
}

fn settings_table<T, C>(table: T, id: C, created_at: C, updated_at: C) -> TableCreateStatement
where
    T: IntoIden,
    C: IntoIden,
{
    Table::create()
        .table(table)
        .if_not_exists()
        .col(ColumnDef::new(id).uuid().not_null().primary_key())
        .col(
            ColumnDef::new(created_at)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(updated_at)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(settings_table(
                EmergencyContacts::Table,
                EmergencyContacts::Id,
                EmergencyContacts::CreatedAt,
                EmergencyContacts::UpdatedAt,
            ))
            .await?;

        manager
            .create_table(settings_table(
                Notifications::Table,
                Notifications::Id,
                Notifications::CreatedAt,
                Notifications::UpdatedAt,
            ))
            .await?;

        manager
            .create_table(settings_table(
                WorkPreferences::Table,
                WorkPreferences::Id,
                WorkPreferences::CreatedAt,
                WorkPreferences::UpdatedAt,
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WorkPreferences::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Notifications::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EmergencyContacts::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}
