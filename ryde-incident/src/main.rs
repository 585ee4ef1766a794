use axum::http::{Method, Uri};
use axum::routing::{delete, get, patch, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod config;
mod jobs;
mod models;
mod routes;
mod schema;
mod services;
mod validation;

use config::AppConfig;
use ryde_shared::clients::db::{create_pool, DbPool};
use ryde_shared::errors::AppError;

pub struct AppState {
    pub db: DbPool,
    pub config: AppConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ryde_shared::middleware::init_tracing("ryde-incident");

    let config = AppConfig::load()?;
    let port = config.port;

    let db = create_pool(&config.database_url)?;

    let state = Arc::new(AppState { db, config });

    // Daily purge of accounts whose soft deletion aged past retention.
    jobs::user_cleanup::spawn_user_cleanup_task(state.clone());

    let admin_routes = Router::new()
        .route("/all", get(routes::admin_routes::list_all_incidents))
        .route(
            "/:id/status",
            patch(routes::admin_routes::update_incident_status),
        )
        .route("/:id", delete(routes::admin_routes::delete_incident))
        .route(
            "/user/:user_id",
            get(routes::admin_routes::list_incidents_against_user),
        );

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/incidents", post(routes::incident_routes::create_incident))
        .route(
            "/incidents/me",
            get(routes::incident_routes::list_my_incidents),
        )
        .route("/incidents/:id", get(routes::incident_routes::get_incident))
        .nest("/incidents/admin", admin_routes)
        .fallback(route_not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "ryde-incident starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Catch-all for unmatched paths.
async fn route_not_found(method: Method, uri: Uri) -> AppError {
    AppError::not_found(format!("Cannot {method} {}", uri.path()))
}
