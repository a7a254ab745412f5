//! HTTP interface for the project store

mod handlers;
mod response;

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::routing::get;
use devmasters_core::ProjectStore;
use devmasters_core::config::Config;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ProjectStore>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Fresh empty store with the given configuration
    pub fn new(config: Config) -> Self {
        Self {
            store: Arc::new(ProjectStore::new()),
            config: Arc::new(config),
        }
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    let cors_allow_any = state.config.api.cors_allow_any;

    let router = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route(
            "/projects",
            get(handlers::list_projects).post(handlers::create_project),
        )
        .route(
            "/projects/:id",
            get(handlers::get_project)
                .put(handlers::update_project)
                .delete(handlers::delete_project),
        )
        .with_state(state);

    let router = if cors_allow_any {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.layer(TraceLayer::new_for_http())
}

/// Serve the API until Ctrl+C
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let address = config.server.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    info!(
        address = %address,
        title = %config.api.title,
        version = %config.api.version,
        "DevMasters API listening"
    );

    let router = build_router(AppState::new(config));
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("DevMasters API stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "Failed to listen for Ctrl+C; running until killed");
            std::future::pending::<()>().await;
        }
    }
}
