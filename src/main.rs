//! Marketplace accounts server - main entry point.
//!
//! Starts the Actix-web server with the admin API, health checks and API docs.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http::header, web, App, HttpServer};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use marketplace_accounts::admin::registrations;
use marketplace_accounts::api::{self, ApiDoc};
use marketplace_accounts::auth::AdminKey;
use marketplace_accounts::config::{Config, ADMIN_KEY_HEADER};
use marketplace_accounts::db::DbPool;
use marketplace_accounts::middleware::RequestLogger;
use marketplace_accounts::services::{NoStripeCustomers, StripeCustomerSource};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Check for --health-check flag (used by Docker HEALTHCHECK)
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|arg| arg == "--health-check") {
        dotenvy::dotenv().ok();
        std::process::exit(if Config::from_env().is_ok() { 0 } else { 1 });
    }

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, DATABASE_URL and MKT_ADMIN_KEY must be set");
            error!("  - In production, values must not match development defaults");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  Marketplace Accounts Server");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
        info!("Using development defaults for DATABASE_URL and MKT_ADMIN_KEY");
    }

    let pool = DbPool::new(&config)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    info!("Database connection established");

    pool.run_migrations()
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let site = registrations::build_site().map_err(|e| std::io::Error::other(e.to_string()))?;
    info!("Admin site ready with {} registered models", site.len());

    // Prepare shared state
    let bind_address = config.bind_address();
    let admin_key = AdminKey::new(config.admin_key.clone());
    if !admin_key.is_configured() {
        warn!("No admin key configured; the admin API will reject every request");
    }
    let is_development = config.is_development();
    let site = web::Data::new(site);
    let stripe: Arc<dyn StripeCustomerSource> = Arc::new(NoStripeCustomers);
    let stripe = web::Data::from(stripe);
    let openapi = ApiDoc::openapi();

    let worker_count = if is_development {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!(
            "Starting server at http://{} ({} workers)",
            bind_address, cpus
        );
        cpus
    };

    let server = HttpServer::new(move || {
        let allowed_headers = vec![
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-admin-key"),
        ];
        let cors = if is_development {
            Cors::default()
                .allowed_origin("http://localhost:3000")
                .allowed_origin("http://127.0.0.1:3000")
                .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
                .allowed_headers(allowed_headers)
                .max_age(3600)
        } else {
            // Same-origin only
            Cors::default()
                .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
                .allowed_headers(allowed_headers)
                .max_age(3600)
        };

        App::new()
            .wrap(cors)
            .wrap(RequestLogger)
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(admin_key.clone()))
            .app_data(site.clone())
            .app_data(stripe.clone())
            .service(web::scope("/api/v1").configure(api::configure_routes))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
    });

    info!("Admin requests authenticate with the {} header", ADMIN_KEY_HEADER);

    server
        .workers(worker_count)
        .bind(&bind_address)?
        .run()
        .await
}
