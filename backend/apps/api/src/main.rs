//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use auth::application::{AuthServices, EnsureAdminUseCase};
use auth::domain::SessionRepository;
use auth::{PgAuthRepository, auth_router};
use axum::{
    Json, Router, http,
    http::{Method, StatusCode, header},
    routing::get,
};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use users::users_router;

use crate::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "users_api=info,auth=info,users=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env()?;
    let services = AuthServices::from_config(config.auth.clone())?;
    if !services.hasher.has_pepper() {
        tracing::warn!("PASSWORD_HASH_SALT not set, hashing without a pepper");
    }

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect_with(config.database.clone())
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let repo = PgAuthRepository::new(pool.clone());

    // Errors here should not prevent server startup
    if let Err(e) = repo.purge_expired().await {
        tracing::warn!(error = %e, "Session cleanup failed, continuing anyway");
    }

    if let Some(seed) = config.admin_seed {
        let user_name = seed.user_name.clone();
        match EnsureAdminUseCase::new(Arc::new(repo.clone()), services.hasher.clone())
            .execute(seed)
            .await?
        {
            Some(id) => tracing::info!(user_id = %id, user_name = %user_name, "Admin created"),
            None => tracing::debug!("Admin already present"),
        }
    }

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .nest("/auth", auth_router(repo.clone(), services.clone()))
        .merge(users_router(repo, services))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    let shutdown = CancellationToken::new();
    tokio::spawn(shutdown_signal(shutdown.clone()));

    let mut server = tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { shutdown.cancelled().await })
                .await
        }
    });

    tokio::select! {
        result = &mut server => result??,
        _ = shutdown.cancelled() => {
            // in-flight requests get a bounded drain
            match tokio::time::timeout(config.shutdown_timeout, &mut server).await {
                Ok(result) => result??,
                Err(_) => {
                    tracing::warn!(
                        timeout_secs = config.shutdown_timeout.as_secs(),
                        "Shutdown timeout, dropping remaining connections"
                    );
                    server.abort();
                }
            }
        }
    }

    pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Cancel `shutdown` on Ctrl+C or SIGTERM.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }

    shutdown.cancel();
}
