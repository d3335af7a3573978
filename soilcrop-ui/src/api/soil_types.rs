//! Soil-type options for the form's selection control

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use soilcrop_common::SoilTypeVocabulary;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SoilTypesResponse {
    /// Selectable labels in dataset order
    pub soil_types: SoilTypeVocabulary,
    /// False while the startup load is still running
    pub loaded: bool,
}

/// GET /api/soil-types
///
/// An unavailable dataset yields an empty list, never an error.
pub async fn list_soil_types(State(state): State<AppState>) -> Json<SoilTypesResponse> {
    let (soil_types, loaded) = state.vocabulary_snapshot().await;
    Json(SoilTypesResponse { soil_types, loaded })
}

pub fn soil_type_routes() -> Router<AppState> {
    Router::new().route("/api/soil-types", get(list_soil_types))
}
