//! Prediction client configuration, resolved once at startup.

use crate::{PredictionError, PredictionResult};
use reqwest::Url;
use std::time::Duration;

/// Where the prediction service listens when nothing else is configured.
pub const DEFAULT_PREDICTION_API_URL: &str = "http://localhost:8000";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PredictionConfig {
    base_url: Url,
    timeout: Option<Duration>,
}

impl PredictionConfig {
    /// Creates a configuration for the service at `base_url`.
    ///
    /// A base URL with a path prefix (`http://host/ml`) is treated as a directory, so endpoint
    /// paths are appended to it rather than replacing its last segment.
    ///
    /// # Errors
    ///
    /// Returns [`PredictionError::InvalidBaseUrl`] if `base_url` does not parse or is not
    /// `http`/`https`.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> PredictionResult<Self> {
        let mut url = Url::parse(base_url.trim())
            .map_err(|e| PredictionError::InvalidBaseUrl(format!("'{base_url}': {e}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(PredictionError::InvalidBaseUrl(format!(
                "'{base_url}': scheme must be http or https"
            )));
        }

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self {
            base_url: url,
            timeout,
        })
    }

    /// Builds a configuration from raw environment values (`PREDICTION_API_URL`,
    /// `PREDICTION_TIMEOUT_SECS`). Missing or blank values fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PredictionError::InvalidBaseUrl`] for a malformed URL and
    /// [`PredictionError::InvalidInput`] for a timeout that is not a positive whole number of
    /// seconds.
    pub fn from_env_values(
        base_url: Option<String>,
        timeout_secs: Option<String>,
    ) -> PredictionResult<Self> {
        let base_url = non_blank(base_url).unwrap_or_else(|| DEFAULT_PREDICTION_API_URL.into());
        let timeout = timeout_from_env_value(timeout_secs)?;
        Self::new(&base_url, timeout)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse an optional request timeout in whole seconds.
pub(crate) fn timeout_from_env_value(value: Option<String>) -> PredictionResult<Option<Duration>> {
    let Some(value) = non_blank(value) else {
        return Ok(None);
    };

    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Some(Duration::from_secs(secs))),
        _ => Err(PredictionError::InvalidInput(format!(
            "PREDICTION_TIMEOUT_SECS must be a positive whole number of seconds, got '{value}'"
        ))),
    }
}
