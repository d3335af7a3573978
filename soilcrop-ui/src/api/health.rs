//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Service identity plus the state of the soil-type vocabulary
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    pub build: &'static str,
    /// False until the startup load has finished
    pub vocabulary_loaded: bool,
    /// Zero after a failed load; the form then offers no soil types
    pub soil_types: usize,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (vocabulary, loaded) = state.vocabulary_snapshot().await;

    Json(HealthResponse {
        status: "ok",
        module: "soilcrop-ui",
        version: env!("CARGO_PKG_VERSION"),
        build: env!("SOILCROP_BUILD"),
        vocabulary_loaded: loaded,
        soil_types: vocabulary.len(),
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
