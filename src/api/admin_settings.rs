//! Admin endpoints for emergency contacts, notification settings and work
//! preferences.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::admin::AdminSite;
use crate::admin::registrations::SETTINGS_APP;
use crate::auth::StaffAuth;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{SettingsKind, SettingsRecord};

/// A settings record with its display string.
#[derive(Debug, Serialize, ToSchema)]
pub struct SettingsRow {
    pub display: String,
    #[serde(flatten)]
    pub record: SettingsRecord,
}

impl From<SettingsRecord> for SettingsRow {
    fn from(record: SettingsRecord) -> Self {
        Self {
            display: record.to_string(),
            record,
        }
    }
}

/// All records of one settings model.
#[derive(Debug, Serialize, ToSchema)]
pub struct SettingsListResponse {
    pub model: String,
    pub results: Vec<SettingsRow>,
}

/// Configure settings admin routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_settings)
        .service(add_settings)
        .service(get_settings)
        .service(delete_settings);
}

fn resolve_kind(site: &AdminSite, model: &str) -> AppResult<SettingsKind> {
    SettingsKind::parse(model)
        .filter(|kind| site.is_registered(SETTINGS_APP, kind.as_str()))
        .ok_or_else(|| AppError::NotFound(format!("Model {}.{}", SETTINGS_APP, model)))
}

/// List settings records, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/admin/settings/{model}/",
    tag = "Admin",
    params(("model" = String, Path, description = "emergencycontact, notification or workpreference")),
    responses(
        (status = 200, description = "Records", body = SettingsListResponse),
        (status = 401, description = "Missing or invalid admin key"),
        (status = 404, description = "Unknown model")
    ),
    security(("admin_key" = []))
)]
#[get("/admin/settings/{model}/")]
pub async fn list_settings(
    _staff: StaffAuth,
    pool: web::Data<DbPool>,
    site: web::Data<AdminSite>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let kind = resolve_kind(&site, &path)?;
    let records = pool.list_settings(kind).await?;

    Ok(HttpResponse::Ok().json(SettingsListResponse {
        model: format!("{}.{}", SETTINGS_APP, kind),
        results: records.into_iter().map(SettingsRow::from).collect(),
    }))
}

/// Create a settings record.
#[utoipa::path(
    post,
    path = "/api/v1/admin/settings/{model}/",
    tag = "Admin",
    params(("model" = String, Path, description = "emergencycontact, notification or workpreference")),
    responses(
        (status = 201, description = "Record created", body = SettingsRow),
        (status = 401, description = "Missing or invalid admin key"),
        (status = 404, description = "Unknown model")
    ),
    security(("admin_key" = []))
)]
#[post("/admin/settings/{model}/")]
pub async fn add_settings(
    _staff: StaffAuth,
    pool: web::Data<DbPool>,
    site: web::Data<AdminSite>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let kind = resolve_kind(&site, &path)?;
    let record = pool.create_settings(kind).await?;

    info!("Admin added {}: id={}", kind, record.id);

    Ok(HttpResponse::Created().json(SettingsRow::from(record)))
}

/// Get one settings record.
#[utoipa::path(
    get,
    path = "/api/v1/admin/settings/{model}/{id}/",
    tag = "Admin",
    params(
        ("model" = String, Path, description = "emergencycontact, notification or workpreference"),
        ("id" = Uuid, Path, description = "Record ID")
    ),
    responses(
        (status = 200, description = "Record", body = SettingsRow),
        (status = 401, description = "Missing or invalid admin key"),
        (status = 404, description = "Unknown model or record")
    ),
    security(("admin_key" = []))
)]
#[get("/admin/settings/{model}/{id}/")]
pub async fn get_settings(
    _staff: StaffAuth,
    pool: web::Data<DbPool>,
    site: web::Data<AdminSite>,
    path: web::Path<(String, Uuid)>,
) -> AppResult<HttpResponse> {
    let (model, id) = path.into_inner();
    let kind = resolve_kind(&site, &model)?;
    let record = pool
        .get_settings(kind, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} {}", kind.verbose_name(), id)))?;

    Ok(HttpResponse::Ok().json(SettingsRow::from(record)))
}

/// Delete a settings record. Profiles referencing it keep existing with the
/// reference cleared.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/settings/{model}/{id}/",
    tag = "Admin",
    params(
        ("model" = String, Path, description = "emergencycontact, notification or workpreference"),
        ("id" = Uuid, Path, description = "Record ID")
    ),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 401, description = "Missing or invalid admin key"),
        (status = 404, description = "Unknown model or record")
    ),
    security(("admin_key" = []))
)]
#[delete("/admin/settings/{model}/{id}/")]
pub async fn delete_settings(
    _staff: StaffAuth,
    pool: web::Data<DbPool>,
    site: web::Data<AdminSite>,
    path: web::Path<(String, Uuid)>,
) -> AppResult<HttpResponse> {
    let (model, id) = path.into_inner();
    let kind = resolve_kind(&site, &model)?;
    if !pool.delete_settings(kind, id).await? {
        return Err(AppError::NotFound(format!("{} {}", kind.verbose_name(), id)));
    }

    info!("Admin deleted {}: id={}", kind, id);

    Ok(HttpResponse::NoContent().finish())
}
