use axum::Json;

use ryde_shared::types::api::HealthResponse;

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(
        "ryde-incident",
        env!("CARGO_PKG_VERSION"),
    ))
}
