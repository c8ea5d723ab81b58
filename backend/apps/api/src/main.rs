//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request errors are rendered by the
//! auth crate.

use anyhow::Context;
use auth::{AuthConfig, PgUserRepository, SeedAdminUseCase, SeedOutcome};
use axum::{
    Json, Router, http,
    http::{HeaderName, Method, header},
    response::IntoResponse,
    routing::get,
};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PORT: u16 = 3000;

/// GET /health
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "attendance_api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Auth configuration (a missing secret is fatal)
    let auth_config = AuthConfig::from_env().context("invalid auth configuration")?;

    // Database connection
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let repo = PgUserRepository::new(pool.clone());

    // Seed the initial admin account; errors here should not prevent startup
    match (env::var("ADMIN_EMAIL"), env::var("ADMIN_DEFAULT_PASSWORD")) {
        (Ok(email), Ok(password)) => {
            let seeder = SeedAdminUseCase::new(Arc::new(repo.clone()), Arc::new(auth_config.clone()));
            match seeder.execute(&email, password).await {
                Ok(SeedOutcome::Created(user_id)) => {
                    tracing::info!(%user_id, "Admin seeding completed");
                }
                Ok(SeedOutcome::AlreadyPresent) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Admin seeding failed, continuing anyway");
                }
            }
        }
        _ => tracing::info!("ADMIN_EMAIL or ADMIN_DEFAULT_PASSWORD not set, skipping admin seed"),
    }

    auth::warm_up(&auth_config)
        .await
        .context("failed to prepare credential verifier")?;

    // CORS configuration
    let frontend_origins = env::var("ALLOWED_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:5173,http://127.0.0.1:5173".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(auth::application::config::CSRF_HEADER_NAME),
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest("/api", auth::pg_api_router(repo, auth_config))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port = match env::var("PORT") {
        Ok(raw) => raw
            .trim()
            .parse::<u16>()
            .with_context(|| format!("invalid PORT: {raw}"))?,
        Err(_) => DEFAULT_PORT,
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
