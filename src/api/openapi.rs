//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::config::ADMIN_KEY_HEADER;
use crate::{admin, api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Marketplace Accounts Server",
        version = "0.1.0",
        description = "User profiles, settings records and the staff admin API for the marketplace"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Admin site
        api::admin_site::admin_index,
        // User profile admin
        api::admin_accounts::list_user_profiles,
        api::admin_accounts::add_user_profile,
        api::admin_accounts::get_user_profile,
        api::admin_accounts::change_user_profile,
        api::admin_accounts::delete_user_profile,
        api::admin_accounts::set_user_profile_password,
        // Settings admin
        api::admin_settings::list_settings,
        api::admin_settings::add_settings,
        api::admin_settings::get_settings,
        api::admin_settings::delete_settings,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            error::FieldErrors,
            models::Pagination,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Profiles
            models::UserProfile,
            models::UserType,
            models::PaymentPreference,
            models::PaymentFrequency,
            models::Rating,
            models::UserProfileChange,
            models::PaymentSummary,
            models::StripePaymentMethod,
            models::StripeExternalAccount,
            // Settings
            models::SettingsKind,
            models::SettingsRecord,
            // Admin
            admin::ModelAdmin,
            admin::Fieldset,
            api::admin_site::AdminIndexResponse,
            api::admin_accounts::ChangeListRow,
            api::admin_accounts::ChangeListResponse,
            api::admin_accounts::FieldValue,
            api::admin_accounts::FieldsetValues,
            api::admin_accounts::ChangeFormResponse,
            api::admin_accounts::AddUserProfileRequest,
            api::admin_accounts::SetPasswordRequest,
            api::admin_settings::SettingsRow,
            api::admin_settings::SettingsListResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Admin", description = "Staff administration of profiles and settings")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add admin key security scheme.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "admin_key",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Header(
                        utoipa::openapi::security::ApiKeyValue::new(ADMIN_KEY_HEADER),
                    ),
                ),
            );
        }
    }
}
