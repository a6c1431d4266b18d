//! API endpoint modules.

pub mod admin_accounts;
pub mod admin_settings;
pub mod admin_site;
pub mod health;
pub mod openapi;

pub use admin_accounts::configure_routes as configure_admin_account_routes;
pub use admin_settings::configure_routes as configure_admin_settings_routes;
pub use admin_site::configure_routes as configure_admin_site_routes;
pub use health::configure_health_routes;
pub use openapi::ApiDoc;

use actix_web::web;

/// Mount every `/api/v1` route.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_health_routes)
        .configure(configure_admin_site_routes)
        .configure(configure_admin_account_routes)
        .configure(configure_admin_settings_routes);
}
