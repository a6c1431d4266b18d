//! Admin site index.

use actix_web::{HttpResponse, get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::admin::{AdminSite, ModelAdmin};
use crate::auth::StaffAuth;

/// Every registered model and its declaration.
#[derive(Serialize, ToSchema)]
pub struct AdminIndexResponse {
    pub models: Vec<ModelAdmin>,
}

/// List the admin registrations.
#[utoipa::path(
    get,
    path = "/api/v1/admin/",
    tag = "Admin",
    responses(
        (status = 200, description = "Registered models", body = AdminIndexResponse),
        (status = 401, description = "Missing or invalid admin key")
    ),
    security(("admin_key" = []))
)]
#[get("/admin/")]
pub async fn admin_index(_staff: StaffAuth, site: web::Data<AdminSite>) -> HttpResponse {
    HttpResponse::Ok().json(AdminIndexResponse {
        models: site.iter().cloned().collect(),
    })
}

/// Configure admin index route.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(admin_index);
}
