//! Shared test helpers for the accounts suite.

use std::sync::Arc;

use actix_web::{App, dev::ServiceResponse, test, web};
use marketplace_accounts::admin::registrations;
use marketplace_accounts::auth::AdminKey;
use marketplace_accounts::config::DatabaseSettings;
use marketplace_accounts::db::DbPool;
use marketplace_accounts::models::{UserProfile, UserProfileFields};
use marketplace_accounts::services::{NoStripeCustomers, StripeCustomerSource, UserProfileManager};
use serde_json::Value;

/// Admin key used in tests.
pub const TEST_ADMIN_KEY: &str = "test-admin-key-for-accounts";

/// A fresh, migrated in-memory database.
///
/// One connection only: every SQLite memory connection is its own database.
pub async fn create_test_pool() -> DbPool {
    let settings = DatabaseSettings {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    };

    let pool = DbPool::connect(&settings)
        .await
        .expect("Failed to open in-memory database");
    pool.run_migrations()
        .await
        .expect("Failed to run migrations");
    pool
}

/// Create a user through the manager with the given extra fields.
pub async fn create_user(pool: &DbPool, email: &str, extra: UserProfileFields) -> UserProfile {
    UserProfileManager::new(pool)
        .create_user(Some(email), Some("test-password-123"), None, extra)
        .await
        .expect("Failed to create user")
}

/// Create a test app with no linked stripe customers.
pub async fn create_test_app(
    pool: &DbPool,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    create_test_app_with_stripe(pool, Arc::new(NoStripeCustomers)).await
}

/// Create a test app reading stripe customers from `stripe`.
pub async fn create_test_app_with_stripe(
    pool: &DbPool,
    stripe: Arc<dyn StripeCustomerSource>,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    let site = registrations::build_site().expect("Failed to build admin site");
    let admin_key = AdminKey::new(Some(TEST_ADMIN_KEY.to_string()));

    test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(admin_key))
            .app_data(web::Data::new(site))
            .app_data(web::Data::from(stripe))
            .service(web::scope("/api/v1").configure(marketplace_accounts::api::configure_routes)),
    )
    .await
}

/// Send a request with the admin key and return status and JSON body.
///
/// Empty bodies come back as `Value::Null`.
pub async fn admin_request<S>(app: &S, req: test::TestRequest) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = req.insert_header(("X-Admin-Key", TEST_ADMIN_KEY)).to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let bytes = test::read_body(resp).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response body is not JSON")
    };
    (status, body)
}
