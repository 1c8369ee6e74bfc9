//! REST handlers.

use crate::{ApiError, AppState};
use api_shared::{
    CreatePatientReq, DiseasesRes, ErrorRes, HealthRes, HealthService, ListPatientsQuery, ListPatientsRes,
    Patient, PredictReq, PredictionHealthRes, PredictionRes, RegionsRes, SetStatusReq,
    StatusCountsRes, UpdatePatientReq,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDate, SecondsFormat};
use nirogya_core::{
    PatientDraft, PatientId, PatientPatch, PatientRecord, PatientStatus, StatusFilter,
};
use nirogya_prediction::{PredictionRequest, PredictionResponse};

fn patient_res(record: &PatientRecord) -> Patient {
    Patient {
        id: record.id.to_string(),
        name: record.name.to_string(),
        phone: record.phone.to_string(),
        email: record.email.clone(),
        address: record.address.clone(),
        symptoms: record.symptoms.to_string(),
        status: record.status.to_string(),
        submitted_at: record
            .submitted_at
            .to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

fn parse_id(raw: &str) -> Result<PatientId, ApiError> {
    PatientId::parse(raw).map_err(|e| ApiError::BadRequest(e.to_string()))
}

fn parse_status(raw: Option<String>) -> Result<Option<PatientStatus>, ApiError> {
    raw.map(|s| s.parse::<PatientStatus>())
        .transpose()
        .map_err(ApiError::from)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
#[axum::debug_handler]
pub(crate) async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/patients",
    params(ListPatientsQuery),
    responses(
        (status = 200, description = "Matching patients in submission order", body = ListPatientsRes),
        (status = 400, description = "Unknown status filter", body = ErrorRes)
    )
)]
/// List patients, optionally narrowed by search text and status
///
/// `q` is matched case-insensitively against name, phone, email and symptoms. `status` is
/// `all` (the default) or one of the four statuses.
#[axum::debug_handler]
pub(crate) async fn list_patients(
    State(state): State<AppState>,
    Query(query): Query<ListPatientsQuery>,
) -> Result<Json<ListPatientsRes>, ApiError> {
    let filter = match query.status.as_deref() {
        Some(raw) => raw.parse::<StatusFilter>()?,
        None => StatusFilter::All,
    };
    let search = query.q.unwrap_or_default();

    let store = state.lock_store()?;
    let patients = store
        .query(&search, filter)
        .into_iter()
        .map(patient_res)
        .collect();
    Ok(Json(ListPatientsRes { patients }))
}

#[utoipa::path(
    post,
    path = "/patients",
    request_body = CreatePatientReq,
    responses(
        (status = 201, description = "Patient created", body = Patient),
        (status = 400, description = "Missing name, phone or symptoms, or unknown status", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Create a patient intake record
///
/// Intake submissions start as `incoming`; doctor-side entry may choose the initial status.
#[axum::debug_handler]
pub(crate) async fn create_patient(
    State(state): State<AppState>,
    Json(req): Json<CreatePatientReq>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let draft = PatientDraft {
        name: req.name,
        phone: req.phone,
        symptoms: req.symptoms,
        email: req.email,
        address: req.address,
        status: parse_status(req.status)?,
    };

    let mut store = state.lock_store()?;
    let record = store.add(draft)?;
    Ok((StatusCode::CREATED, Json(patient_res(&record))))
}

#[utoipa::path(
    get,
    path = "/patients/counts",
    responses(
        (status = 200, description = "Number of patients per status", body = StatusCountsRes)
    )
)]
/// Per-status totals for the dashboard summary cards
#[axum::debug_handler]
pub(crate) async fn status_counts(
    State(state): State<AppState>,
) -> Result<Json<StatusCountsRes>, ApiError> {
    let counts = state.lock_store()?.status_counts();
    Ok(Json(StatusCountsRes {
        incoming: counts.incoming,
        in_progress: counts.in_progress,
        completed: counts.completed,
        cancelled: counts.cancelled,
        total: counts.total,
    }))
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(("id" = String, Path, description = "Patient id, e.g. PAT-1731661200123")),
    responses(
        (status = 200, description = "The patient", body = Patient),
        (status = 404, description = "No such patient", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Patient>, ApiError> {
    let id = parse_id(&id)?;
    let store = state.lock_store()?;
    let record = store.get(&id)?;
    Ok(Json(patient_res(record)))
}

#[utoipa::path(
    put,
    path = "/patients/{id}",
    request_body = UpdatePatientReq,
    params(("id" = String, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Updated patient", body = Patient),
        (status = 400, description = "Invalid edit", body = ErrorRes),
        (status = 404, description = "No such patient", body = ErrorRes)
    )
)]
/// Edit a patient's details
#[axum::debug_handler]
pub(crate) async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdatePatientReq>,
) -> Result<Json<Patient>, ApiError> {
    let id = parse_id(&id)?;
    let patch = PatientPatch {
        name: req.name,
        phone: req.phone,
        email: req.email,
        address: req.address,
        symptoms: req.symptoms,
        status: parse_status(req.status)?,
    };

    let mut store = state.lock_store()?;
    let record = store.update(&id, &patch)?;
    Ok(Json(patient_res(&record)))
}

#[utoipa::path(
    put,
    path = "/patients/{id}/status",
    request_body = SetStatusReq,
    params(("id" = String, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Updated patient", body = Patient),
        (status = 400, description = "Unknown status", body = ErrorRes),
        (status = 404, description = "No such patient", body = ErrorRes)
    )
)]
/// Move a patient to another workflow status
#[axum::debug_handler]
pub(crate) async fn set_patient_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SetStatusReq>,
) -> Result<Json<Patient>, ApiError> {
    let id = parse_id(&id)?;
    let status: PatientStatus = req.status.parse()?;

    let mut store = state.lock_store()?;
    let record = store.set_status(&id, status)?;
    Ok(Json(patient_res(&record)))
}

#[utoipa::path(
    get,
    path = "/prediction/regions",
    responses(
        (status = 200, description = "Regions the model accepts", body = RegionsRes),
        (status = 503, description = "Prediction service not running", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_regions(
    State(state): State<AppState>,
) -> Result<Json<RegionsRes>, ApiError> {
    let regions = state.prediction.fetch_regions().await?;
    Ok(Json(RegionsRes { regions }))
}

#[utoipa::path(
    get,
    path = "/prediction/diseases",
    responses(
        (status = 200, description = "Diseases the model accepts", body = DiseasesRes),
        (status = 503, description = "Prediction service not running", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_diseases(
    State(state): State<AppState>,
) -> Result<Json<DiseasesRes>, ApiError> {
    let diseases = state.prediction.fetch_diseases().await?;
    Ok(Json(DiseasesRes { diseases }))
}

#[utoipa::path(
    get,
    path = "/prediction/health",
    responses(
        (status = 200, description = "Prediction service status", body = PredictionHealthRes),
        (status = 503, description = "Prediction service not running", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn prediction_health(
    State(state): State<AppState>,
) -> Result<Json<PredictionHealthRes>, ApiError> {
    let health = state.prediction.health().await?;
    Ok(Json(PredictionHealthRes {
        status: health.status,
        model_loaded: health.model_loaded,
        num_regions: health.num_regions,
        num_diseases: health.num_diseases,
        model_version: health.model_version,
    }))
}

#[utoipa::path(
    post,
    path = "/prediction",
    request_body = PredictReq,
    responses(
        (status = 200, description = "Next-day forecast with confidence interval", body = PredictionRes),
        (status = 400, description = "Malformed request", body = ErrorRes),
        (status = 422, description = "Rejected by the prediction service", body = ErrorRes),
        (status = 502, description = "Unexpected prediction service failure", body = ErrorRes),
        (status = 503, description = "Prediction service not running", body = ErrorRes)
    )
)]
/// Forecast next-day cases for a region and disease
///
/// The request is forwarded to the external prediction service. A rejection detail from the
/// service is returned verbatim with status 422.
#[axum::debug_handler]
pub(crate) async fn predict(
    State(state): State<AppState>,
    Json(req): Json<PredictReq>,
) -> Result<Json<PredictionRes>, ApiError> {
    let mut request = PredictionRequest::new(&req.region, &req.disease, &req.recent_daily_cases)?;
    if let Some(raw) = req.prediction_date.filter(|d| !d.trim().is_empty()) {
        let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
            ApiError::BadRequest(format!("prediction_date must be YYYY-MM-DD, got '{raw}'"))
        })?;
        request = request.with_prediction_date(date);
    }

    let response: PredictionResponse = state.prediction.predict(&request).await?;
    Ok(Json(PredictionRes {
        predicted_cases: response.predicted_cases,
        confidence_interval_lower: response.confidence_interval_lower,
        confidence_interval_upper: response.confidence_interval_upper,
        region: response.region,
        disease: response.disease,
        prediction_date: response.prediction_date,
        model_version: response.model_version,
    }))
}
