//! Wire shapes of the prediction service.

use crate::{PredictionError, PredictionResult};
use chrono::NaiveDate;
use nirogya_types::NonEmptyText;
use serde::{Deserialize, Serialize};

/// Number of recent daily case counts a forecast is based on.
pub const RECENT_DAYS: usize = 7;

/// A next-day forecast request.
///
/// The service still names the case series `last_14_days_cases`; the series actually collected
/// and sent is the last [`RECENT_DAYS`] days.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PredictionRequest {
    region: NonEmptyText,
    disease: NonEmptyText,
    #[serde(rename = "last_14_days_cases")]
    recent_daily_cases: [f64; RECENT_DAYS],
    #[serde(skip_serializing_if = "Option::is_none")]
    prediction_date: Option<NaiveDate>,
}

impl PredictionRequest {
    /// Builds a request, oldest day first in `recent_daily_cases`.
    ///
    /// # Errors
    ///
    /// Returns [`PredictionError::InvalidInput`] if `region` or `disease` is blank, if there are
    /// not exactly [`RECENT_DAYS`] counts, or if any count is negative or not finite.
    pub fn new(region: &str, disease: &str, recent_daily_cases: &[f64]) -> PredictionResult<Self> {
        let region = NonEmptyText::new(region)
            .map_err(|_| PredictionError::InvalidInput("region is required".into()))?;
        let disease = NonEmptyText::new(disease)
            .map_err(|_| PredictionError::InvalidInput("disease is required".into()))?;

        let cases: [f64; RECENT_DAYS] = recent_daily_cases.try_into().map_err(|_| {
            PredictionError::InvalidInput(format!(
                "expected {RECENT_DAYS} daily case counts, got {}",
                recent_daily_cases.len()
            ))
        })?;

        if let Some((day, count)) = cases
            .iter()
            .enumerate()
            .find(|(_, c)| !c.is_finite() || **c < 0.0)
        {
            return Err(PredictionError::InvalidInput(format!(
                "daily case count for day {} must be a non-negative number, got {count}",
                day + 1
            )));
        }

        Ok(Self {
            region,
            disease,
            recent_daily_cases: cases,
            prediction_date: None,
        })
    }

    /// Forecast for a specific date instead of the service's "today".
    pub fn with_prediction_date(mut self, date: NaiveDate) -> Self {
        self.prediction_date = Some(date);
        self
    }

    pub fn region(&self) -> &str {
        self.region.as_str()
    }

    pub fn disease(&self) -> &str {
        self.disease.as_str()
    }

    pub fn recent_daily_cases(&self) -> &[f64; RECENT_DAYS] {
        &self.recent_daily_cases
    }

    pub fn prediction_date(&self) -> Option<NaiveDate> {
        self.prediction_date
    }
}

/// A point forecast with the service's confidence interval.
///
/// Nothing here is recomputed or checked locally; the bounds are whatever the service sent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub predicted_cases: f64,
    pub confidence_interval_lower: f64,
    pub confidence_interval_upper: f64,
    pub region: String,
    pub disease: String,
    pub prediction_date: String,
    pub model_version: String,
}

impl PredictionResponse {
    /// True when `lower <= predicted <= upper`, as the service is expected to return.
    pub fn interval_brackets_prediction(&self) -> bool {
        self.confidence_interval_lower <= self.predicted_cases
            && self.predicted_cases <= self.confidence_interval_upper
    }
}

/// Status reported by `GET /health`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHealth {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub model_loaded: bool,
    #[serde(default)]
    pub num_regions: u32,
    #[serde(default)]
    pub num_diseases: u32,
    #[serde(default)]
    pub model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegionsBody {
    #[serde(default)]
    pub regions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DiseasesBody {
    #[serde(default)]
    pub diseases: Vec<String>,
}
