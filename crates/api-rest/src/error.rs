//! Mapping of core and prediction errors onto HTTP responses.

use api_shared::ErrorRes;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use nirogya_core::PatientError;
use nirogya_prediction::PredictionError;

/// Error returned by REST handlers. Always rendered as `{ "detail": ... }`.
#[derive(Debug, PartialEq)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    /// The prediction service rejected the request; the detail is passed through verbatim.
    Unprocessable(String),
    ServiceUnavailable(String),
    BadGateway(String),
    Internal,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            ApiError::BadRequest(d)
            | ApiError::NotFound(d)
            | ApiError::Unprocessable(d)
            | ApiError::ServiceUnavailable(d)
            | ApiError::BadGateway(d) => d,
            ApiError::Internal => "Internal error".to_string(),
        };
        (status, Json(ErrorRes { detail })).into_response()
    }
}

impl From<PatientError> for ApiError {
    fn from(e: PatientError) -> Self {
        match e {
            PatientError::InvalidInput(_) | PatientError::InvalidStatus(_) => {
                ApiError::BadRequest(e.to_string())
            }
            PatientError::NotFound(_) => ApiError::NotFound(e.to_string()),
            other => {
                tracing::error!("Patient store error: {:?}", other);
                ApiError::Internal
            }
        }
    }
}

impl From<PredictionError> for ApiError {
    fn from(e: PredictionError) -> Self {
        match e {
            PredictionError::InvalidInput(_) => ApiError::BadRequest(e.to_string()),
            PredictionError::ValidationRejected(detail) => ApiError::Unprocessable(detail),
            PredictionError::ServiceUnavailable { .. } => {
                ApiError::ServiceUnavailable(e.to_string())
            }
            PredictionError::Unknown(_) => ApiError::BadGateway(e.to_string()),
            PredictionError::InvalidBaseUrl(_) => {
                tracing::error!("Prediction client misconfigured: {}", e);
                ApiError::Internal
            }
        }
    }
}
