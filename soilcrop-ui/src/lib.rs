//! soilcrop-ui library - crop recommendation form service
//!
//! Serves the recommendation form and the JSON API behind it. The soil-type
//! vocabulary is loaded once in the background after startup; until it
//! arrives the form offers no soil types, and submissions still run.

use axum::Router;
use soilcrop_common::{
    PredictionRequestBuilder, Scorer, SoilTypeVocabulary, VocabularyLoader,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;

pub use crate::error::{ApiError, ApiResult};

/// Request builder as held by the service
pub type Predictor = PredictionRequestBuilder<Arc<dyn Scorer>>;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Soil-type vocabulary; `None` until the startup load finishes
    pub vocabulary: Arc<RwLock<Option<SoilTypeVocabulary>>>,
    /// Builds and submits scoring requests
    pub predictor: Arc<Predictor>,
}

impl AppState {
    pub fn new(scorer: Arc<dyn Scorer>) -> Self {
        Self {
            vocabulary: Arc::new(RwLock::new(None)),
            predictor: Arc::new(PredictionRequestBuilder::new(scorer)),
        }
    }

    /// Publish the loaded vocabulary; it is not replaced afterwards
    pub async fn install_vocabulary(&self, vocabulary: SoilTypeVocabulary) {
        let mut slot = self.vocabulary.write().await;
        if slot.is_none() {
            *slot = Some(vocabulary);
        } else {
            tracing::warn!("Soil-type vocabulary already installed, ignoring reload");
        }
    }

    /// Current vocabulary (empty while loading) and whether loading finished
    pub async fn vocabulary_snapshot(&self) -> (SoilTypeVocabulary, bool) {
        match self.vocabulary.read().await.as_ref() {
            Some(vocabulary) => (vocabulary.clone(), true),
            None => (SoilTypeVocabulary::empty(), false),
        }
    }
}

/// Load the vocabulary in the background and install it when done
pub fn spawn_vocabulary_load(
    state: AppState,
    loader: VocabularyLoader,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let vocabulary = loader.load().await;
        state.install_vocabulary(vocabulary).await;
    })
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::ui_routes())
        .merge(api::soil_type_routes())
        .merge(api::predict_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
