//! Settings records referenced from user profiles.
//!
//! Emergency contacts, notification settings and work preferences carry only
//! an identity and timestamps here; their payload is owned elsewhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Which settings table a record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SettingsKind {
    EmergencyContact,
    Notification,
    WorkPreference,
}

impl SettingsKind {
    pub const ALL: [SettingsKind; 3] = [
        Self::EmergencyContact,
        Self::Notification,
        Self::WorkPreference,
    ];

    /// Admin URL slug, e.g. `emergencycontact`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmergencyContact => "emergencycontact",
            Self::Notification => "notification",
            Self::WorkPreference => "workpreference",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "emergencycontact" => Some(Self::EmergencyContact),
            "notification" => Some(Self::Notification),
            "workpreference" => Some(Self::WorkPreference),
            _ => None,
        }
    }

    pub fn verbose_name(&self) -> &'static str {
        match self {
            Self::EmergencyContact => "Emergency Contact",
            Self::Notification => "Notification Setting",
            Self::WorkPreference => "Work Preference",
        }
    }

    pub fn verbose_name_plural(&self) -> &'static str {
        match self {
            Self::EmergencyContact => "Emergency Contacts",
            Self::Notification => "Notification Settings",
            Self::WorkPreference => "Work Preferences",
        }
    }

    /// Model class name, used in display strings.
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::EmergencyContact => "EmergencyContact",
            Self::Notification => "Notification",
            Self::WorkPreference => "WorkPreference",
        }
    }

    /// Profile column holding the reference to this kind.
    pub fn profile_field(&self) -> &'static str {
        match self {
            Self::EmergencyContact => "emergency_contact_id",
            Self::Notification => "notification_id",
            Self::WorkPreference => "work_preference_id",
        }
    }
}

impl std::fmt::Display for SettingsKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A settings record of any kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SettingsRecord {
    pub id: Uuid,
    pub kind: SettingsKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Display for SettingsRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} object ({})", self.kind.class_name(), self.id)
    }
}
