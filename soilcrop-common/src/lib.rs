//! # Soilcrop Common Library
//!
//! Shared code for the soil-to-crop recommendation service including:
//! - Soil-type vocabulary loading from the reference dataset
//! - Form field state and coercion into the scorer's feature record
//! - Scoring client and prediction outcome classification
//! - Configuration loading
//! - Error types

pub mod config;
pub mod error;
pub mod feature;
pub mod form;
pub mod outcome;
pub mod scoring;
pub mod vocabulary;

pub use error::{Error, Result};
pub use feature::FeatureRecord;
pub use form::{FormField, FormFieldState};
pub use outcome::{PredictionError, PredictionOutcome};
pub use scoring::{HttpScorer, PredictionRequestBuilder, Scorer};
pub use vocabulary::{SoilTypeVocabulary, VocabularyLoader};
