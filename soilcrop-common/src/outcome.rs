//! Prediction outcome and failure classification

use crate::form::FormField;
use serde::Serialize;
use thiserror::Error;

/// Shown whenever a field is unset or not a usable number
pub const INCOMPLETE_INPUT_MESSAGE: &str = "Please fill out all fields before making a prediction.";

/// Substituted when a rejecting server gives no `error` field
pub const GENERIC_REJECTION_MESSAGE: &str = "Network response was not ok";

/// Why a submission did not produce a recommendation
///
/// `Display` is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    /// One or more fields unset or not parsable as a finite number.
    /// Detected locally; no request is made.
    #[error("{}", INCOMPLETE_INPUT_MESSAGE)]
    IncompleteInput { fields: Vec<FormField> },

    /// The scoring request could not reach or complete against the server
    #[error("{0}")]
    Transport(String),

    /// The server answered with a non-success status
    #[error("{message}")]
    ServerRejected { status: u16, message: String },

    /// A success status whose body carries no usable prediction
    #[error("Error making prediction: {0}")]
    MalformedResponse(String),
}

impl PredictionError {
    /// Stable tag for API consumers
    pub fn kind(&self) -> &'static str {
        match self {
            PredictionError::IncompleteInput { .. } => "incomplete_input",
            PredictionError::Transport(_) => "transport",
            PredictionError::ServerRejected { .. } => "server_rejected",
            PredictionError::MalformedResponse(_) => "malformed_response",
        }
    }
}

/// Terminal result of one submission
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionOutcome {
    /// The scorer recommended a crop
    Succeeded { crop: String },
    /// Classified failure
    Failed(PredictionError),
}

impl PredictionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PredictionOutcome::Succeeded { .. })
    }

    /// Message for the result region of the form
    pub fn message(&self) -> String {
        match self {
            PredictionOutcome::Succeeded { crop } => format!("Recommended Crop: {}", crop),
            PredictionOutcome::Failed(err) => err.to_string(),
        }
    }

    pub fn error(&self) -> Option<&PredictionError> {
        match self {
            PredictionOutcome::Failed(err) => Some(err),
            PredictionOutcome::Succeeded { .. } => None,
        }
    }

    pub fn view(&self) -> OutcomeView {
        OutcomeView::from(self)
    }
}

impl From<Result<String, PredictionError>> for PredictionOutcome {
    fn from(result: Result<String, PredictionError>) -> Self {
        match result {
            Ok(crop) => PredictionOutcome::Succeeded { crop },
            Err(err) => PredictionOutcome::Failed(err),
        }
    }
}

/// Serializable form of an outcome for the status display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeView {
    pub ok: bool,
    pub kind: Option<&'static str>,
    pub message: String,
    pub crop: Option<String>,
}

impl From<&PredictionOutcome> for OutcomeView {
    fn from(outcome: &PredictionOutcome) -> Self {
        match outcome {
            PredictionOutcome::Succeeded { crop } => Self {
                ok: true,
                kind: None,
                message: outcome.message(),
                crop: Some(crop.clone()),
            },
            PredictionOutcome::Failed(err) => Self {
                ok: false,
                kind: Some(err.kind()),
                message: err.to_string(),
                crop: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_message() {
        let outcome = PredictionOutcome::Succeeded {
            crop: "Rice".to_string(),
        };
        assert!(outcome.is_success());
        assert_eq!(outcome.message(), "Recommended Crop: Rice");
    }

    #[test]
    fn test_failure_messages() {
        let incomplete = PredictionError::IncompleteInput {
            fields: vec![FormField::Ph],
        };
        assert_eq!(incomplete.to_string(), INCOMPLETE_INPUT_MESSAGE);

        let rejected = PredictionError::ServerRejected {
            status: 400,
            message: "bad input".to_string(),
        };
        assert_eq!(PredictionOutcome::Failed(rejected).message(), "bad input");

        let transport = PredictionError::Transport("connection refused".to_string());
        assert_eq!(transport.to_string(), "connection refused");
    }

    #[test]
    fn test_view_serialization() {
        let view = PredictionOutcome::Failed(PredictionError::ServerRejected {
            status: 400,
            message: "bad input".to_string(),
        })
        .view();
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["kind"], "server_rejected");
        assert_eq!(json["message"], "bad input");
        assert!(json["crop"].is_null());
    }
}
