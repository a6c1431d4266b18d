//! Admin registrations for the accounts and settings models.

use crate::error::AppResult;
use crate::models::{SettingsKind, UserProfile};

use super::{AdminSite, Fieldset, ModelAdmin};

pub const ACCOUNTS_APP: &str = "accounts";
pub const SETTINGS_APP: &str = "settings";
pub const USER_PROFILE_MODEL: &str = "userprofile";

/// Staff view of user profiles.
pub fn user_profile_admin() -> ModelAdmin {
    let mut admin = ModelAdmin::new(
        ACCOUNTS_APP,
        USER_PROFILE_MODEL,
        UserProfile::VERBOSE_NAME,
        UserProfile::VERBOSE_NAME_PLURAL,
    );

    admin.list_display = vec![
        "email",
        "first_name",
        "last_name",
        "user_type",
        "rating",
        "email_verified",
        "phone_verified",
        "is_staff",
        "created_at",
    ];
    admin.list_filter = vec![
        "user_type",
        "email_verified",
        "phone_verified",
        "identity_verified",
        "is_staff",
        "is_superuser",
        "is_active",
        "created_at",
    ];
    admin.search_fields = vec![
        "email",
        "first_name",
        "last_name",
        "phone_number",
        "city",
        "state",
    ];
    admin.ordering = vec!["-created_at"];

    admin.fieldsets = vec![
        Fieldset::new(None, &["email", "password", "username"]),
        Fieldset::new(
            Some("Personal Info"),
            &[
                "first_name",
                "last_name",
                "phone_number",
                "date_of_birth",
                "profile_image",
                "about_me",
            ],
        ),
        Fieldset::new(Some("User Type & Role"), &["user_type", "rating"]),
        Fieldset::new(
            Some("Location"),
            &[
                "address",
                "city",
                "state",
                "zip_code",
                "country",
                "address_latitude",
                "address_longitude",
                "current_latitude",
                "current_longitude",
                "last_location_update",
            ],
        ),
        Fieldset::new(
            Some("Payment Settings"),
            &["payment_method", "payment_frequency"],
        ),
        Fieldset::new(Some("Social Auth"), &["google_id", "apple_id", "facebook_id"])
            .classes(&["collapse"]),
        Fieldset::new(
            Some("Verification"),
            &["email_verified", "phone_verified", "identity_verified"],
        ),
        Fieldset::new(
            Some("Related Settings"),
            &[
                "work_preference_id",
                "notification_id",
                "emergency_contact_id",
            ],
        )
        .classes(&["collapse"]),
        // Groups and per-user permissions are not modelled
        Fieldset::new(Some("Permissions"), &["is_active", "is_staff", "is_superuser"])
            .classes(&["collapse"]),
        Fieldset::new(
            Some("Important Dates"),
            &[
                "started_at",
                "last_login",
                "date_joined",
                "created_at",
                "updated_at",
            ],
        ),
    ];

    admin.readonly_fields = vec![
        "created_at",
        "updated_at",
        "token_created_at",
        "token_updated_at",
        "date_joined",
    ];

    admin.add_fieldsets = vec![Fieldset::new(
        None,
        &[
            "email",
            "username",
            "first_name",
            "last_name",
            "password1",
            "password2",
            "user_type",
        ],
    )
    .classes(&["wide"])];

    admin
}

/// Default registration for a settings record.
pub fn settings_admin(kind: SettingsKind) -> ModelAdmin {
    ModelAdmin::new(
        SETTINGS_APP,
        kind.as_str(),
        kind.verbose_name(),
        kind.verbose_name_plural(),
    )
}

/// The site with every model registered.
pub fn build_site() -> AppResult<AdminSite> {
    let mut site = AdminSite::new();
    site.register(user_profile_admin())?;
    for kind in SettingsKind::ALL {
        site.register(settings_admin(kind))?;
    }
    Ok(site)
}
