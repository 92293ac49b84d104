// Member portal API: upcoming events and admin user management
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::middleware::{Compress, DefaultHeaders, Logger};
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Module declarations
mod auth;
mod config;
mod db;
mod error;
mod event_handlers;
mod models;
mod monitoring;
mod pagination;
pub mod query_builders;
pub mod repositories;
mod routes;
mod user_handlers;

use auth::AuthService;
use config::{load_config, Config, SecurityConfig};
use monitoring::{Metrics, RequestLogger};

pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: Config,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration (this calls load_env_file internally)
    let config = load_config()?;

    setup_logging(&config)?;
    config.print_startup_info();

    db::setup_database(&config.database.url).await?;
    let pool = db::create_database_pool(&config.database).await?;
    db::run_migrations(&pool)
        .await
        .context("Failed to apply database schema")?;

    let auth_service = Arc::new(AuthService::new(&config.auth.jwt_secret, config.auth.bcrypt_cost));

    let app_state = Arc::new(AppState {
        db_pool: pool.clone(),
        config: config.clone(),
    });

    let metrics_arc = Arc::new(Metrics::new());
    let metrics = web::Data::from(metrics_arc.clone());

    let bind_address = config.bind_address();
    log::info!("Starting server at http://{}", bind_address);

    let server_config = config.clone();
    let mut server = HttpServer::new(move || {
        let cors = setup_cors(&server_config.security.allowed_origins);
        let security_headers = setup_security_headers(&server_config.security);

        App::new()
            .wrap(cors)
            .wrap(security_headers)
            .wrap(Logger::default())
            .wrap(Compress::default())
            .wrap(RequestLogger::new(metrics_arc.clone()))
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(metrics.clone())
            .configure(routes::configure)
    })
    .keep_alive(std::time::Duration::from_secs(config.server.keep_alive));

    if let Some(workers) = config.server.workers {
        server = server.workers(workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await
        .context("Server failed to run")?;

    pool.close().await;
    log::info!("Server stopped");

    Ok(())
}

// ==================== HELPER FUNCTIONS ====================

/// Wildcard origins are rejected in production by `Config::validate`.
fn setup_cors(allowed_origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .expose_headers(vec![header::CONTENT_LENGTH])
        .max_age(3600);

    if allowed_origins.iter().any(|origin| origin == "*") {
        log::warn!("Using wildcard CORS (*) in development mode");
        return cors.allow_any_origin().allow_any_header().allow_any_method();
    }

    for origin in allowed_origins.iter().filter(|origin| !origin.is_empty()) {
        cors = cors.allowed_origin(origin);
    }

    cors
}

fn setup_logging(config: &Config) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.logging.level))
        .context("Invalid log level")?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .context("Failed to install log subscriber")?;

    Ok(())
}

fn setup_security_headers(config: &SecurityConfig) -> DefaultHeaders {
    let mut headers = DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "DENY"))
        .add(("Referrer-Policy", "strict-origin-when-cross-origin"));

    if config.require_https {
        headers = headers.add((
            "Strict-Transport-Security",
            "max-age=31536000; includeSubDomains",
        ));
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};

    #[actix_rt::test]
    async fn test_security_headers_applied() {
        let mut security = SecurityConfig::default();
        security.require_https = true;

        let app = test::init_service(
            App::new()
                .wrap(setup_security_headers(&security))
                .route("/start", web::get().to(monitoring::liveness_probe)),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/start").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get("X-Frame-Options").unwrap(), "DENY");
        assert!(resp.headers().contains_key("Strict-Transport-Security"));
    }

    #[actix_rt::test]
    async fn test_cors_allows_configured_origin_only() {
        let origins = vec!["http://portal.example.org".to_string()];
        let app = test::init_service(
            App::new()
                .wrap(setup_cors(&origins))
                .route("/start", web::get().to(monitoring::liveness_probe)),
        )
        .await;

        let allowed = test::TestRequest::get()
            .uri("/start")
            .insert_header((header::ORIGIN, "http://portal.example.org"))
            .to_request();
        let resp = test::call_service(&app, allowed).await;
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://portal.example.org"
        );
    }
}
