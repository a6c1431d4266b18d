//! Migration: Create user_profiles table.
//!
//! Email is the login identifier. The three settings foreign keys use
//! ON DELETE SET NULL so a profile outlives its settings records.

use sea_orm_migration::prelude::*;

use super::m20260301_000001_create_settings_tables::{
    EmergencyContacts, Notifications, WorkPreferences,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden, Clone, Copy)]
enum UserProfiles {
    Table,
    Id,
    Password,
    LastLogin,
    IsSuperuser,
    Username,
    FirstName,
    LastName,
    Email,
    IsStaff,
    IsActive,
    DateJoined,
    UserType,
    RefreshToken,
    TokenCreatedAt,
    TokenUpdatedAt,
    AboutMe,
    StartedAt,
    PaymentMethod,
    PaymentFrequency,
    GoogleId,
    AppleId,
    FacebookId,
    ProfileImage,
    PhoneNumber,
    DateOfBirth,
    Address,
    City,
    State,
    ZipCode,
    Country,
    AddressLatitude,
    AddressLongitude,
    CurrentLatitude,
    CurrentLongitude,
    LastLocationUpdate,
    WorkPreferenceId,
    NotificationId,
    EmergencyContactId,
    EmailVerified,
    PhoneVerified,
    IdentityVerified,
    Rating,
    CreatedAt,
    UpdatedAt,
}

/// Indexed columns, named `idx_user_profiles_<column>`.
const INDEXED: &[(&str, UserProfiles)] = &[
    ("address_latitude", UserProfiles::AddressLatitude),
    ("address_longitude", UserProfiles::AddressLongitude),
    ("current_latitude", UserProfiles::CurrentLatitude),
    ("current_longitude", UserProfiles::CurrentLongitude),
    ("rating", UserProfiles::Rating),
    ("created_at", UserProfiles::CreatedAt),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserProfiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserProfiles::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(UserProfiles::Password).text().not_null())
                    .col(ColumnDef::new(UserProfiles::LastLogin).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(UserProfiles::IsSuperuser)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(UserProfiles::Username).string_len(150).unique_key())
                    .col(
                        ColumnDef::new(UserProfiles::FirstName)
                            .string_len(150)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::LastName)
                            .string_len(150)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::Email)
                            .string_len(254)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::IsStaff)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::DateJoined)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::UserType)
                            .string_len(20)
                            .not_null()
                            .default("customer"),
                    )
                    .col(ColumnDef::new(UserProfiles::RefreshToken).text())
                    .col(
                        ColumnDef::new(UserProfiles::TokenCreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::TokenUpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserProfiles::AboutMe).text())
                    .col(
                        ColumnDef::new(UserProfiles::StartedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::PaymentMethod)
                            .string_len(20)
                            .not_null()
                            .default("card"),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::PaymentFrequency)
                            .string_len(20)
                            .not_null()
                            .default("instant"),
                    )
                    .col(ColumnDef::new(UserProfiles::GoogleId).string_len(255))
                    .col(ColumnDef::new(UserProfiles::AppleId).string_len(255))
                    .col(ColumnDef::new(UserProfiles::FacebookId).string_len(255))
                    .col(ColumnDef::new(UserProfiles::ProfileImage).string_len(100))
                    // Unique also gives the lookup index
                    .col(ColumnDef::new(UserProfiles::PhoneNumber).string_len(20).unique_key())
                    .col(ColumnDef::new(UserProfiles::DateOfBirth).date())
                    .col(ColumnDef::new(UserProfiles::Address).text())
                    .col(ColumnDef::new(UserProfiles::City).string_len(100))
                    .col(ColumnDef::new(UserProfiles::State).string_len(100))
                    .col(ColumnDef::new(UserProfiles::ZipCode).string_len(10))
                    .col(
                        ColumnDef::new(UserProfiles::Country)
                            .string_len(100)
                            .default("US"),
                    )
                    .col(ColumnDef::new(UserProfiles::AddressLatitude).decimal_len(9, 6))
                    .col(ColumnDef::new(UserProfiles::AddressLongitude).decimal_len(9, 6))
                    .col(ColumnDef::new(UserProfiles::CurrentLatitude).decimal_len(10, 7))
                    .col(ColumnDef::new(UserProfiles::CurrentLongitude).decimal_len(10, 7))
                    .col(
                        ColumnDef::new(UserProfiles::LastLocationUpdate)
                            .timestamp_with_time_zone(),
                    )
                    .col(ColumnDef::new(UserProfiles::WorkPreferenceId).uuid())
                    .col(ColumnDef::new(UserProfiles::NotificationId).uuid())
                    .col(ColumnDef::new(UserProfiles::EmergencyContactId).uuid())
                    .col(
                        ColumnDef::new(UserProfiles::EmailVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::PhoneVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::IdentityVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(UserProfiles::Rating).decimal_len(3, 1))
                    .col(
                        ColumnDef::new(UserProfiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserProfiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_profiles_work_preference_id")
                            .from(UserProfiles::Table, UserProfiles::WorkPreferenceId)
                            .to(WorkPreferences::Table, WorkPreferences::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_profiles_notification_id")
                            .from(UserProfiles::Table, UserProfiles::NotificationId)
                            .to(Notifications::Table, Notifications::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_profiles_emergency_contact_id")
                            .from(UserProfiles::Table, UserProfiles::EmergencyContactId)
                            .to(EmergencyContacts::Table, EmergencyContacts::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in INDEXED {
            manager
                .create_index(
                    Index::create()
                        .name(format!("idx_user_profiles_{}", name))
                        .table(UserProfiles::Table)
                        .col(*column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserProfiles::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}
