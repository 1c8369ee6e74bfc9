//! # Nirogya Prediction
//!
//! Client for the external disease outbreak prediction service.
//!
//! The service owns the forecasting model and the controlled vocabularies of regions and
//! diseases it was trained on. This crate only speaks its HTTP contract:
//!
//! - `GET /regions` and `GET /diseases` list the accepted identifiers
//! - `POST /predict` forecasts next-day cases from the most recent daily counts
//! - `GET /health` reports whether the model is loaded
//!
//! Calls are one-shot: no retries, no caching, no batching. Failures are classified into the
//! small set of outcomes in [`PredictionError`] so callers can show a useful message and let the
//! user resubmit.

mod client;
mod config;
mod models;

pub use client::PredictionClient;
pub use config::{PredictionConfig, DEFAULT_PREDICTION_API_URL};
pub use models::{PredictionRequest, PredictionResponse, ServiceHealth, RECENT_DAYS};
pub use reqwest::Url;

/// Outcomes of a failed prediction service call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    /// The service could not be reached (connection refused, unreachable host, timeout).
    #[error("prediction service is not reachable at {base_url}; start the prediction API server and try again")]
    ServiceUnavailable { base_url: String },

    /// The service answered with a rejection detail, surfaced verbatim.
    #[error("{0}")]
    ValidationRejected(String),

    /// Any other failure.
    #[error("prediction request failed: {0}")]
    Unknown(String),

    /// The request was rejected locally and never sent.
    #[error("invalid prediction request: {0}")]
    InvalidInput(String),

    #[error("invalid prediction service URL: {0}")]
    InvalidBaseUrl(String),
}

pub type PredictionResult<T> = std::result::Result<T, PredictionError>;
