//! Account creation and persistence rules for user profiles.
//!
//! Email is the login identifier: it is required, normalized before it is
//! stored, and unique across profiles.

use tracing::info;

use crate::db::DbPool;
use crate::error::{AppError, AppResult, FieldErrors};
use crate::models::validation::normalize_email;
use crate::models::{SettingsKind, UserProfile, UserProfileFields};
use crate::services::password;

/// Creates and saves user profiles.
#[derive(Clone, Copy)]
pub struct UserProfileManager<'a> {
    pool: &'a DbPool,
}

impl<'a> UserProfileManager<'a> {
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create and save a user with the given email and password.
    ///
    /// A missing password stores an unusable marker, so the account cannot
    /// log in until a password is set.
    pub async fn create_user(
        &self,
        email: Option<&str>,
        password: Option<&str>,
        username: Option<&str>,
        extra: UserProfileFields,
    ) -> AppResult<UserProfile> {
        let email = match email.map(str::trim) {
            Some(e) if !e.is_empty() => normalize_email(e),
            _ => return Err(AppError::InvalidInput("The Email field must be set".to_string())),
        };

        let mut profile = UserProfile::new(email, username.map(str::to_string));
        extra.apply_to(&mut profile);
        profile.normalize_blanks();
        set_password(&mut profile, password)?;

        let mut errors = profile.validate();
        errors.merge(self.check_references(&profile).await?);
        errors.into_result()?;

        let created = self.pool.insert_user_profile(&profile).await?;
        info!(
            "Created user profile: id={}, type={}, staff={}",
            created.id, created.user_type, created.is_staff
        );

        Ok(created)
    }

    /// Create a user with staff and superuser rights unless the caller
    /// explicitly set those flags.
    pub async fn create_superuser(
        &self,
        email: Option<&str>,
        password: Option<&str>,
        username: Option<&str>,
        mut extra: UserProfileFields,
    ) -> AppResult<UserProfile> {
        extra.is_staff.get_or_insert(true);
        extra.is_superuser.get_or_insert(true);
        self.create_user(email, password, username, extra).await
    }

    /// Validate and persist an edited profile.
    pub async fn save(&self, profile: &UserProfile) -> AppResult<UserProfile> {
        let mut errors = profile.validate();
        errors.merge(self.check_references(profile).await?);
        errors.into_result()?;

        self.pool.save_user_profile(profile).await
    }

    /// Settings references must point at existing records.
    async fn check_references(&self, profile: &UserProfile) -> AppResult<FieldErrors> {
        let mut errors = FieldErrors::new();
        let references = [
            (SettingsKind::WorkPreference, profile.work_preference_id),
            (SettingsKind::Notification, profile.notification_id),
            (SettingsKind::EmergencyContact, profile.emergency_contact_id),
        ];

        for (kind, id) in references {
            if let Some(id) = id
                && self.pool.get_settings(kind, id).await?.is_none()
            {
                errors.add(
                    kind.profile_field(),
                    format!("{} {} does not exist.", kind.verbose_name(), id),
                );
            }
        }

        Ok(errors)
    }
}

/// Hash and store a raw password, or mark the password unusable.
pub fn set_password(profile: &mut UserProfile, raw: Option<&str>) -> AppResult<()> {
    profile.password = match raw {
        Some(raw) => password::hash_password(raw)?,
        None => password::make_unusable_password(),
    };
    Ok(())
}

/// Whether `raw` matches the profile's stored password.
pub fn check_password(profile: &UserProfile, raw: &str) -> bool {
    password::verify_password(raw, &profile.password)
}
