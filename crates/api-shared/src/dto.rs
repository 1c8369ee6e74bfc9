//! Request and response bodies of the REST API.
//!
//! These are transport shapes only. Validation happens in the core and prediction crates; text
//! fields here are carried as received.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Error body returned by every failing endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub detail: String,
}

/// A patient intake record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub symptoms: String,
    /// One of `incoming`, `in-progress`, `completed`, `cancelled`.
    pub status: String,
    /// RFC 3339 creation time.
    pub submitted_at: String,
}

/// Dashboard search: free text over name/phone/email/symptoms plus a status filter.
#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
pub struct ListPatientsQuery {
    /// Case-insensitive substring; blank matches everything.
    pub q: Option<String>,
    /// `all` (default) or a single status.
    pub status: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListPatientsRes {
    pub patients: Vec<Patient>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreatePatientReq {
    pub name: String,
    pub phone: String,
    pub symptoms: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Initial status for doctor-side entry; intake submissions omit it.
    #[serde(default)]
    pub status: Option<String>,
}

/// Partial edit; omitted fields are left unchanged. An empty email/address clears it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UpdatePatientReq {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub symptoms: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SetStatusReq {
    pub status: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StatusCountsRes {
    pub incoming: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub total: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RegionsRes {
    pub regions: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DiseasesRes {
    pub diseases: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PredictReq {
    pub region: String,
    pub disease: String,
    /// Daily case counts for the last 7 days, oldest first.
    pub recent_daily_cases: Vec<f64>,
    /// `YYYY-MM-DD`; the prediction service defaults to today.
    #[serde(default)]
    pub prediction_date: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PredictionRes {
    pub predicted_cases: f64,
    pub confidence_interval_lower: f64,
    pub confidence_interval_upper: f64,
    pub region: String,
    pub disease: String,
    pub prediction_date: String,
    pub model_version: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PredictionHealthRes {
    pub status: String,
    pub model_loaded: bool,
    pub num_regions: u32,
    pub num_diseases: u32,
    pub model_version: Option<String>,
}
