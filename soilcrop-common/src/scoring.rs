//! Scoring client and prediction request builder
//!
//! A submission runs validation, coercion and then exactly one scoring call:
//!
//! ```text
//! Idle -> Validating -> Coercing -> Submitting -> Succeeded
//!            |             |            |-------> Failed(Transport)
//!            |             |            |-------> Failed(ServerRejected)
//!            +-------------+--> Failed(IncompleteInput), no request made
//! ```
//!
//! Nothing is retried. Every call to [`PredictionRequestBuilder::submit`]
//! starts over from `Idle`, and the feature record lives only for the
//! duration of that call.

use crate::feature::FeatureRecord;
use crate::form::FormFieldState;
use crate::outcome::{PredictionError, PredictionOutcome, GENERIC_REJECTION_MESSAGE};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

const USER_AGENT: &str = concat!("soilcrop/", env!("CARGO_PKG_VERSION"));

/// Opaque remote scorer
///
/// Returns the recommended crop for a feature record.
#[async_trait]
pub trait Scorer: Send + Sync {
    async fn score(&self, record: &FeatureRecord) -> Result<String, PredictionError>;
}

#[async_trait]
impl<T: Scorer + ?Sized> Scorer for Arc<T> {
    async fn score(&self, record: &FeatureRecord) -> Result<String, PredictionError> {
        (**self).score(record).await
    }
}

/// Successful scoring response body
#[derive(Debug, Deserialize)]
struct PredictionResponse {
    prediction: String,
}

/// Rejection body; `error` is optional
#[derive(Debug, Default, Deserialize)]
struct RejectionResponse {
    error: Option<String>,
}

/// Scorer reached over HTTP (`POST <base>/predict` with a JSON body)
pub struct HttpScorer {
    http_client: reqwest::Client,
    predict_url: String,
}

impl HttpScorer {
    pub fn new(predict_url: impl Into<String>, timeout: Duration) -> crate::Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            predict_url: predict_url.into(),
        })
    }
}

#[async_trait]
impl Scorer for HttpScorer {
    async fn score(&self, record: &FeatureRecord) -> Result<String, PredictionError> {
        let response = self
            .http_client
            .post(&self.predict_url)
            .json(record)
            .send()
            .await
            .map_err(|e| PredictionError::Transport(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            // An unreadable body, non-JSON body or blank `error` all yield
            // the generic message
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<RejectionResponse>(&body)
                .unwrap_or_default()
                .error
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| GENERIC_REJECTION_MESSAGE.to_string());
            return Err(PredictionError::ServerRejected {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| PredictionError::Transport(e.to_string()))?;

        serde_json::from_str::<PredictionResponse>(&body)
            .map(|r| r.prediction)
            .map_err(|e| PredictionError::MalformedResponse(e.to_string()))
    }
}

/// Turns form state into a scoring call and classifies the result
pub struct PredictionRequestBuilder<S: Scorer> {
    scorer: S,
}

impl PredictionRequestBuilder<HttpScorer> {
    /// Builder backed by the HTTP scorer at `predict_url`
    pub fn http(predict_url: impl Into<String>, timeout: Duration) -> crate::Result<Self> {
        Ok(Self::new(HttpScorer::new(predict_url, timeout)?))
    }
}

impl<S: Scorer> PredictionRequestBuilder<S> {
    pub fn new(scorer: S) -> Self {
        Self { scorer }
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Validate, coerce and submit one form
    ///
    /// The form is only read. Incomplete or unparsable input fails before
    /// any request is made.
    pub async fn submit(&self, form: &FormFieldState) -> PredictionOutcome {
        tracing::debug!("Validating form");
        if let Err(e) = FeatureRecord::validate(form) {
            return Self::fail(e);
        }

        tracing::debug!("Coercing form fields");
        let record = match FeatureRecord::coerce(form) {
            Ok(record) => record,
            Err(e) => return Self::fail(e),
        };

        tracing::debug!(soil_type = record.soil_type(), "Submitting feature record");
        let outcome = PredictionOutcome::from(self.scorer.score(&record).await);

        match &outcome {
            PredictionOutcome::Succeeded { crop } => {
                tracing::info!(crop = %crop, "Prediction succeeded");
            }
            PredictionOutcome::Failed(e) => {
                tracing::warn!(kind = e.kind(), error = %e, "Prediction failed");
            }
        }

        outcome
    }

    fn fail(err: PredictionError) -> PredictionOutcome {
        if let PredictionError::IncompleteInput { fields } = &err {
            tracing::info!(fields = ?fields, "Form incomplete, not submitting");
        }
        PredictionOutcome::Failed(err)
    }
}
