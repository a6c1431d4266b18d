//! Admin endpoints for user profiles.
//!
//! The change list, change form and add form follow the `accounts.userprofile`
//! registration.

use std::collections::{BTreeMap, HashMap};

use actix_web::{HttpResponse, delete, get, patch, post, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::admin::query::ChangeListQuery;
use crate::admin::registrations::{ACCOUNTS_APP, USER_PROFILE_MODEL};
use crate::admin::{AdminSite, ModelAdmin};
use crate::auth::StaffAuth;
use crate::db::DbPool;
use crate::error::{AppError, AppResult, FieldErrors};
use crate::models::{
    Pagination, PaymentSummary, UserProfile, UserProfileChange, UserProfileFields, UserType,
};
use crate::services::password::password_summary;
use crate::services::payments::{StripeCustomerSource, load_stripe_customer};
use crate::services::user_manager::{UserProfileManager, set_password};

/// One change-list row. `values` holds the `list_display` columns.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChangeListRow {
    pub id: Uuid,
    pub display: String,
    pub values: BTreeMap<String, Value>,
}

/// A page of the user profile change list.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChangeListResponse {
    pub model: String,
    /// Column order for `values`
    pub columns: Vec<&'static str>,
    pub results: Vec<ChangeListRow>,
    pub pagination: Pagination,
}

/// One field on the change form.
#[derive(Debug, Serialize, ToSchema)]
pub struct FieldValue {
    pub name: &'static str,
    pub value: Value,
    pub readonly: bool,
}

/// A fieldset with its current values.
#[derive(Debug, Serialize, ToSchema)]
pub struct FieldsetValues {
    pub name: Option<&'static str>,
    pub classes: Vec<&'static str>,
    pub fields: Vec<FieldValue>,
}

/// The change form for one profile.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChangeFormResponse {
    pub id: Uuid,
    pub display: String,
    pub fieldsets: Vec<FieldsetValues>,
    pub payments: PaymentSummary,
}

/// Add form body.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AddUserProfileRequest {
    pub email: String,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password1: String,
    pub password2: String,
    pub user_type: Option<UserType>,
}

/// Password change body.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SetPasswordRequest {
    pub password1: String,
    pub password2: String,
}

/// Configure user profile admin routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_user_profiles)
        .service(add_user_profile)
        .service(get_user_profile)
        .service(change_user_profile)
        .service(delete_user_profile)
        .service(set_user_profile_password);
}

fn registration(site: &AdminSite) -> AppResult<&ModelAdmin> {
    site.get(ACCOUNTS_APP, USER_PROFILE_MODEL)
        .ok_or_else(|| AppError::NotFound("Model accounts.userprofile".to_string()))
}

fn check_password_pair(password1: &str, password2: &str) -> AppResult<()> {
    let mut errors = FieldErrors::new();
    if password1.is_empty() {
        errors.add("password1", "This field is required.");
    }
    if password2.is_empty() {
        errors.add("password2", "This field is required.");
    }
    if errors.is_empty() && password1 != password2 {
        errors.add("password2", "The two password fields didn't match.");
    }
    errors.into_result()
}

fn field_value(profile: &UserProfile, json: &serde_json::Map<String, Value>, field: &str) -> Value {
    match field {
        "password" => Value::String(password_summary(&profile.password)),
        "__str__" => Value::String(profile.to_string()),
        _ => json.get(field).cloned().unwrap_or(Value::Null),
    }
}

fn profile_json(profile: &UserProfile) -> AppResult<serde_json::Map<String, Value>> {
    match serde_json::to_value(profile)? {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::InvalidInput(
            "Profile did not serialize to an object".to_string(),
        )),
    }
}

async fn load_profile(pool: &DbPool, id: Uuid) -> AppResult<UserProfile> {
    pool.get_user_profile(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User profile {}", id)))
}

/// Change list with search, filters, ordering and paging.
#[utoipa::path(
    get,
    path = "/api/v1/admin/accounts/userprofile/",
    tag = "Admin",
    params(
        ("q" = Option<String>, Query, description = "Search email, names, phone, city, state"),
        ("o" = Option<String>, Query, description = "Comma-separated list_display fields, '-' for descending"),
        ("p" = Option<u64>, Query, description = "1-based page"),
        ("user_type" = Option<String>, Query, description = "customer, driver or valet"),
        ("created_at" = Option<String>, Query, description = "today, past_7_days, this_month or this_year"),
    ),
    responses(
        (status = 200, description = "Change list page", body = ChangeListResponse),
        (status = 400, description = "Invalid query parameter"),
        (status = 401, description = "Missing or invalid admin key")
    ),
    security(("admin_key" = []))
)]
#[get("/admin/accounts/userprofile/")]
pub async fn list_user_profiles(
    _staff: StaffAuth,
    pool: web::Data<DbPool>,
    site: web::Data<AdminSite>,
    params: web::Query<HashMap<String, String>>,
) -> AppResult<HttpResponse> {
    let admin = registration(&site)?;
    let query = ChangeListQuery::parse(admin, &params, Utc::now())?;

    let (profiles, total) = pool.list_user_profiles(&query.list).await?;

    let mut results = Vec::with_capacity(profiles.len());
    for profile in &profiles {
        let json = profile_json(profile)?;
        let values = admin
            .list_display
            .iter()
            .map(|f| (f.to_string(), field_value(profile, &json, f)))
            .collect();
        results.push(ChangeListRow {
            id: profile.id,
            display: profile.to_string(),
            values,
        });
    }

    Ok(HttpResponse::Ok().json(ChangeListResponse {
        model: admin.key(),
        columns: admin.list_display.clone(),
        results,
        pagination: Pagination::new(query.page, query.per_page, total),
    }))
}

/// Create a profile from the add form.
#[utoipa::path(
    post,
    path = "/api/v1/admin/accounts/userprofile/",
    tag = "Admin",
    request_body = AddUserProfileRequest,
    responses(
        (status = 201, description = "Profile created", body = UserProfile),
        (status = 400, description = "Validation failed", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid admin key"),
        (status = 409, description = "Email, username or phone already in use")
    ),
    security(("admin_key" = []))
)]
#[post("/admin/accounts/userprofile/")]
pub async fn add_user_profile(
    _staff: StaffAuth,
    pool: web::Data<DbPool>,
    body: web::Json<AddUserProfileRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    check_password_pair(&body.password1, &body.password2)?;

    let extra = UserProfileFields {
        first_name: body.first_name,
        last_name: body.last_name,
        user_type: body.user_type,
        ..Default::default()
    };
    let profile = UserProfileManager::new(&pool)
        .create_user(
            Some(body.email.as_str()),
            Some(body.password1.as_str()),
            body.username.as_deref(),
            extra,
        )
        .await?;

    info!("Admin added user profile: id={}", profile.id);

    Ok(HttpResponse::Created().json(profile))
}

/// Change form grouped by fieldsets, with payment details.
#[utoipa::path(
    get,
    path = "/api/v1/admin/accounts/userprofile/{id}/",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Change form", body = ChangeFormResponse),
        (status = 401, description = "Missing or invalid admin key"),
        (status = 404, description = "Profile not found")
    ),
    security(("admin_key" = []))
)]
#[get("/admin/accounts/userprofile/{id}/")]
pub async fn get_user_profile(
    _staff: StaffAuth,
    pool: web::Data<DbPool>,
    site: web::Data<AdminSite>,
    stripe: web::Data<dyn StripeCustomerSource>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let admin = registration(&site)?;
    let profile = load_profile(&pool, path.into_inner()).await?;
    let profile = load_stripe_customer(stripe.get_ref(), profile).await?;
    let json = profile_json(&profile)?;

    let fieldsets = admin
        .fieldsets
        .iter()
        .map(|fs| FieldsetValues {
            name: fs.name,
            classes: fs.classes.clone(),
            fields: fs
                .fields
                .iter()
                .map(|f| FieldValue {
                    name: f,
                    value: field_value(&profile, &json, f),
                    readonly: admin.is_readonly(f),
                })
                .collect(),
        })
        .collect();

    Ok(HttpResponse::Ok().json(ChangeFormResponse {
        id: profile.id,
        display: profile.to_string(),
        fieldsets,
        payments: profile.payment_summary(),
    }))
}

/// Edit fields on the change form. Read-only and unknown fields are rejected,
/// as is `null` for a field that requires a value.
#[utoipa::path(
    patch,
    path = "/api/v1/admin/accounts/userprofile/{id}/",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Profile ID")),
    request_body = UserProfileChange,
    responses(
        (status = 200, description = "Profile updated", body = UserProfile),
        (status = 400, description = "Validation failed", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid admin key"),
        (status = 404, description = "Profile not found"),
        (status = 409, description = "Email, username or phone already in use")
    ),
    security(("admin_key" = []))
)]
#[patch("/admin/accounts/userprofile/{id}/")]
pub async fn change_user_profile(
    _staff: StaffAuth,
    pool: web::Data<DbPool>,
    site: web::Data<AdminSite>,
    path: web::Path<Uuid>,
    body: web::Json<Value>,
) -> AppResult<HttpResponse> {
    let admin = registration(&site)?;
    let id = path.into_inner();

    let Value::Object(fields) = body.into_inner() else {
        return Err(AppError::InvalidInput("Expected a JSON object".to_string()));
    };

    let mut errors = FieldErrors::new();
    for key in fields.keys() {
        if admin.is_readonly(key) {
            errors.add(key, "This field is read-only.");
        } else if key == "password" {
            errors.add(key, "Use the password change endpoint.");
        } else if !admin.editable_fields().any(|f| f == key) {
            errors.add(key, "Unknown field.");
        }
    }
    errors.merge(UserProfileChange::null_errors(&fields));
    errors.into_result()?;

    let change: UserProfileChange = serde_json::from_value(Value::Object(fields))?;
    let touched = change.touched_fields();

    let mut profile = load_profile(&pool, id).await?;
    change.apply_to(&mut profile);
    let saved = UserProfileManager::new(&pool).save(&profile).await?;

    info!("Admin changed user profile: id={}, fields={:?}", id, touched);

    Ok(HttpResponse::Ok().json(saved))
}

/// Delete a profile.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/accounts/userprofile/{id}/",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Profile ID")),
    responses(
        (status = 204, description = "Profile deleted"),
        (status = 401, description = "Missing or invalid admin key"),
        (status = 404, description = "Profile not found")
    ),
    security(("admin_key" = []))
)]
#[delete("/admin/accounts/userprofile/{id}/")]
pub async fn delete_user_profile(
    _staff: StaffAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if !pool.delete_user_profile(id).await? {
        return Err(AppError::NotFound(format!("User profile {}", id)));
    }

    info!("Admin deleted user profile: id={}", id);

    Ok(HttpResponse::NoContent().finish())
}

/// Set a new password.
#[utoipa::path(
    post,
    path = "/api/v1/admin/accounts/userprofile/{id}/password/",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Profile ID")),
    request_body = SetPasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Passwords missing or not matching", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid admin key"),
        (status = 404, description = "Profile not found")
    ),
    security(("admin_key" = []))
)]
#[post("/admin/accounts/userprofile/{id}/password/")]
pub async fn set_user_profile_password(
    _staff: StaffAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<SetPasswordRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    check_password_pair(&body.password1, &body.password2)?;

    let mut profile = load_profile(&pool, id).await?;
    set_password(&mut profile, Some(body.password1.as_str()))?;
    pool.save_user_profile(&profile).await?;

    info!("Admin changed password for user profile: id={}", id);

    Ok(HttpResponse::NoContent().finish())
}
