//! Database queries for the settings records referenced by profiles.

use chrono::Utc;
use sea_orm::{EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::entity::{emergency_contact, notification, work_preference};
use crate::error::{AppError, AppResult};
use crate::models::{SettingsKind, SettingsRecord};

use super::DbPool;

/// Evaluate `$body` with `$module` naming the entity module for `$kind`.
macro_rules! with_settings_table {
    ($kind:expr, |$module:ident| $body:expr) => {
        match $kind {
            SettingsKind::EmergencyContact => {
                use emergency_contact as $module;
                $body
            }
            SettingsKind::Notification => {
                use notification as $module;
                $body
            }
            SettingsKind::WorkPreference => {
                use work_preference as $module;
                $body
            }
        }
    };
}

impl DbPool {
    /// Create an empty settings record.
    pub async fn create_settings(&self, kind: SettingsKind) -> AppResult<SettingsRecord> {
        let id = Uuid::now_v7();
        let now = Utc::now();

        with_settings_table!(kind, |table| {
            let model = table::ActiveModel {
                id: Set(id),
                created_at: Set(now),
                updated_at: Set(now),
            };
            table::Entity::insert(model)
                .exec(self.connection())
                .await
                .map_err(|e| {
                    AppError::Database(format!("Failed to create {}: {}", kind, e))
                })?;
        });

        Ok(SettingsRecord {
            id,
            kind,
            created_at: now,
            updated_at: now,
        })
    }

    /// Find a settings record by ID.
    pub async fn get_settings(
        &self,
        kind: SettingsKind,
        id: Uuid,
    ) -> AppResult<Option<SettingsRecord>> {
        let record = with_settings_table!(kind, |table| {
            table::Entity::find_by_id(id)
                .one(self.connection())
                .await
                .map_err(|e| AppError::Database(format!("Failed to get {}: {}", kind, e)))?
                .map(|m| SettingsRecord {
                    id: m.id,
                    kind,
                    created_at: m.created_at,
                    updated_at: m.updated_at,
                })
        });

        Ok(record)
    }

    /// List all records of a kind, newest first.
    pub async fn list_settings(&self, kind: SettingsKind) -> AppResult<Vec<SettingsRecord>> {
        let records = with_settings_table!(kind, |table| {
            table::Entity::find()
                .order_by_desc(table::Column::CreatedAt)
                .all(self.connection())
                .await
                .map_err(|e| AppError::Database(format!("Failed to list {}: {}", kind, e)))?
                .into_iter()
                .map(|m| SettingsRecord {
                    id: m.id,
                    kind,
                    created_at: m.created_at,
                    updated_at: m.updated_at,
                })
                .collect()
        });

        Ok(records)
    }

    /// Delete a settings record. Referencing profiles keep existing with the
    /// reference cleared. Returns false if the record did not exist.
    pub async fn delete_settings(&self, kind: SettingsKind, id: Uuid) -> AppResult<bool> {
        let result = with_settings_table!(kind, |table| {
            table::Entity::delete_by_id(id)
                .exec(self.connection())
                .await
                .map_err(|e| AppError::Database(format!("Failed to delete {}: {}", kind, e)))?
        });

        Ok(result.rows_affected > 0)
    }
}
