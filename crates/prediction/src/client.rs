//! HTTP client for the prediction service.

use crate::config::PredictionConfig;
use crate::models::{DiseasesBody, PredictionRequest, PredictionResponse, RegionsBody, ServiceHealth};
use crate::{PredictionError, PredictionResult};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Client for the external prediction service.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct PredictionClient {
    http: Client,
    base_url: Url,
}

impl PredictionClient {
    /// Creates a client from resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PredictionError::Unknown`] if the HTTP client cannot be built (for example
    /// when the TLS backend fails to initialise).
    pub fn new(cfg: &PredictionConfig) -> PredictionResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = cfg.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| PredictionError::Unknown(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: cfg.base_url().clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Regions the model accepts, in the order the service lists them.
    pub async fn fetch_regions(&self) -> PredictionResult<Vec<String>> {
        let body: RegionsBody = self.get_json("regions").await?;
        Ok(body.regions)
    }

    /// Diseases the model accepts, in the order the service lists them.
    pub async fn fetch_diseases(&self) -> PredictionResult<Vec<String>> {
        let body: DiseasesBody = self.get_json("diseases").await?;
        Ok(body.diseases)
    }

    pub async fn health(&self) -> PredictionResult<ServiceHealth> {
        self.get_json("health").await
    }

    /// Submits a forecast request.
    ///
    /// # Errors
    ///
    /// - [`PredictionError::ServiceUnavailable`] if the service cannot be reached.
    /// - [`PredictionError::ValidationRejected`] if the service answers with a `detail`.
    /// - [`PredictionError::Unknown`] for anything else.
    pub async fn predict(&self, request: &PredictionRequest) -> PredictionResult<PredictionResponse> {
        let url = self.endpoint("predict")?;
        tracing::debug!(
            "requesting forecast for {} / {} from {}",
            request.region(),
            request.disease(),
            url
        );

        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.read_json(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> PredictionResult<T> {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.read_json(response).await
    }

    fn endpoint(&self, path: &str) -> PredictionResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| PredictionError::InvalidBaseUrl(format!("{}{path}: {e}", self.base_url)))
    }

    async fn read_json<T: DeserializeOwned>(&self, response: Response) -> PredictionResult<T> {
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let error = match rejection_detail(&body) {
                Some(detail) => PredictionError::ValidationRejected(detail),
                None => PredictionError::Unknown(format!("prediction service returned {status}")),
            };
            tracing::warn!("prediction service call failed ({}): {}", status, error);
            return Err(error);
        }

        serde_json::from_slice(&body).map_err(|e| {
            PredictionError::Unknown(format!("unexpected response from prediction service: {e}"))
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> PredictionError {
        if err.is_connect() || err.is_timeout() {
            tracing::warn!("prediction service unreachable at {}: {}", self.base_url, err);
            PredictionError::ServiceUnavailable {
                base_url: self.base_url.to_string(),
            }
        } else {
            tracing::warn!("prediction service transport error: {}", err);
            PredictionError::Unknown(err.to_string())
        }
    }
}

/// Extracts the `detail` of an error body.
///
/// A string detail is returned verbatim. A list of field errors (`[{"msg": ..}, ..]`) is
/// rendered as its messages joined with `; `. Any other shape falls back to its JSON text.
fn rejection_detail(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        Value::Null => None,
        Value::String(detail) => Some(detail.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                Some(Value::Array(items.clone()).to_string())
            } else {
                Some(messages.join("; "))
            }
        }
        other => Some(other.to_string()),
    }
}
