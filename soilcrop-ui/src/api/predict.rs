//! Form submission endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use soilcrop_common::outcome::OutcomeView;
use soilcrop_common::FormFieldState;

use crate::{ApiError, ApiResult, AppState};

/// POST /api/predict
///
/// Body is the form state, each field an optional string. The soil type
/// must be one the vocabulary currently offers, otherwise it counts as
/// unset. Every classified outcome, failures included, is answered with
/// 200 and an [`OutcomeView`]; only an unreadable body is a 400.
pub async fn submit_prediction(
    State(state): State<AppState>,
    payload: Result<Json<FormFieldState>, JsonRejection>,
) -> ApiResult<Json<OutcomeView>> {
    let Json(mut form) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let (vocabulary, _) = state.vocabulary_snapshot().await;
    form.constrain_soil_type(&vocabulary);

    let outcome = state.predictor.submit(&form).await;
    Ok(Json(outcome.view()))
}

pub fn predict_routes() -> Router<AppState> {
    Router::new().route("/api/predict", post(submit_prediction))
}
