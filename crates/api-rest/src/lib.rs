//! # API REST
//!
//! REST API implementation for Nirogya.
//!
//! Handles:
//! - HTTP endpoints with axum over the doctor dashboard's patient store
//! - A proxy to the external prediction service, preserving its error classification
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS)
//!
//! Uses `api-shared` for request/response bodies.

#![warn(rust_2018_idioms)]

mod error;
mod handlers;

pub use error::ApiError;

use axum::{
    routing::{get, post, put},
    Router,
};
use nirogya_core::{PatientStore, RecordBackend};
use nirogya_prediction::PredictionClient;
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Patient store as shared between handlers.
pub type SharedStore = Arc<Mutex<PatientStore<Box<dyn RecordBackend>>>>;

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    store: SharedStore,
    prediction: PredictionClient,
}

impl AppState {
    pub fn new(store: PatientStore<Box<dyn RecordBackend>>, prediction: PredictionClient) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            prediction,
        }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Locks the store for the duration of one operation.
    pub(crate) fn lock_store(
        &self,
    ) -> Result<MutexGuard<'_, PatientStore<Box<dyn RecordBackend>>>, ApiError> {
        self.store.lock().map_err(|_| {
            tracing::error!("patient store mutex poisoned");
            ApiError::Internal
        })
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::list_patients,
        handlers::create_patient,
        handlers::status_counts,
        handlers::get_patient,
        handlers::update_patient,
        handlers::set_patient_status,
        handlers::list_regions,
        handlers::list_diseases,
        handlers::prediction_health,
        handlers::predict,
    ),
    components(schemas(
        api_shared::HealthRes,
        api_shared::ErrorRes,
        api_shared::Patient,
        api_shared::ListPatientsRes,
        api_shared::CreatePatientReq,
        api_shared::UpdatePatientReq,
        api_shared::SetStatusReq,
        api_shared::StatusCountsRes,
        api_shared::RegionsRes,
        api_shared::DiseasesRes,
        api_shared::PredictReq,
        api_shared::PredictionRes,
        api_shared::PredictionHealthRes,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router with all routes, Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/patients",
            get(handlers::list_patients).post(handlers::create_patient),
        )
        .route("/patients/counts", get(handlers::status_counts))
        .route(
            "/patients/:id",
            get(handlers::get_patient).put(handlers::update_patient),
        )
        .route("/patients/:id/status", put(handlers::set_patient_status))
        .route("/prediction", post(handlers::predict))
        .route("/prediction/regions", get(handlers::list_regions))
        .route("/prediction/diseases", get(handlers::list_diseases))
        .route("/prediction/health", get(handlers::prediction_health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use nirogya_core::InMemoryBackend;
    use nirogya_prediction::PredictionConfig;
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;

    fn app_with(backend: Arc<InMemoryBackend>) -> Router {
        let store = PatientStore::open(Box::new(backend) as Box<dyn RecordBackend>)
            .expect("in-memory store opens");
        // Port 1 on loopback refuses connections.
        let cfg = PredictionConfig::new("http://127.0.0.1:1", Some(Duration::from_secs(2)))
            .expect("valid url");
        let prediction = PredictionClient::new(&cfg).expect("client builds");
        router(AppState::new(store, prediction))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header("content-type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create(app: &Router, body: Value) -> Value {
        let (status, created) = send(app, "POST", "/patients", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        created
    }

    #[tokio::test]
    async fn test_health() {
        let app = app_with(Arc::new(InMemoryBackend::new()));
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_create_then_fetch_patient() {
        let backend = Arc::new(InMemoryBackend::new());
        let app = app_with(backend.clone());

        let created = create(
            &app,
            json!({"name": "Asha", "phone": "9990001111", "symptoms": "fever, headache"}),
        )
        .await;
        assert_eq!(created["status"], "incoming");
        assert!(created["id"].as_str().unwrap().starts_with("PAT-"));
        assert_eq!(created["email"], Value::Null);

        let uri = format!("/patients/{}", created["id"].as_str().unwrap());
        let (status, fetched) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
        assert_eq!(backend.save_count(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_missing_required_field() {
        let backend = Arc::new(InMemoryBackend::new());
        let app = app_with(backend.clone());

        let (status, body) = send(
            &app,
            "POST",
            "/patients",
            Some(json!({"name": "Asha", "phone": "  ", "symptoms": "fever"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("phone"));
        assert_eq!(backend.save_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_patient_is_not_found() {
        let app = app_with(Arc::new(InMemoryBackend::new()));
        let (status, body) = send(&app, "GET", "/patients/PAT-42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["detail"].as_str().unwrap().contains("PAT-42"));

        let (status, _) = send(
            &app,
            "PUT",
            "/patients/PAT-42/status",
            Some(json!({"status": "completed"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_status_change_and_counts() {
        let app = app_with(Arc::new(InMemoryBackend::new()));
        let first = create(&app, json!({"name": "Asha", "phone": "1", "symptoms": "fever"})).await;
        create(&app, json!({"name": "Ravi", "phone": "2", "symptoms": "cough"})).await;

        let uri = format!("/patients/{}/status", first["id"].as_str().unwrap());
        let (status, updated) =
            send(&app, "PUT", &uri, Some(json!({"status": "in-progress"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "in-progress");
        assert_eq!(updated["submittedAt"], first["submittedAt"]);

        let (status, bad) = send(&app, "PUT", &uri, Some(json!({"status": "done"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(bad["detail"].is_string());

        let (_, counts) = send(&app, "GET", "/patients/counts", None).await;
        assert_eq!(
            counts,
            json!({"incoming": 1, "in_progress": 1, "completed": 0, "cancelled": 0, "total": 2})
        );
    }

    #[tokio::test]
    async fn test_update_clears_email_with_empty_string() {
        let app = app_with(Arc::new(InMemoryBackend::new()));
        let created = create(
            &app,
            json!({"name": "Asha", "phone": "1", "symptoms": "fever", "email": "asha@example.com"}),
        )
        .await;
        let uri = format!("/patients/{}", created["id"].as_str().unwrap());

        let (status, updated) = send(
            &app,
            "PUT",
            &uri,
            Some(json!({"email": "", "symptoms": "fever, rash"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["email"], Value::Null);
        assert_eq!(updated["symptoms"], "fever, rash");
        assert_eq!(updated["name"], "Asha");
    }

    #[tokio::test]
    async fn test_list_filters_by_query_and_status() {
        let app = app_with(Arc::new(InMemoryBackend::new()));
        create(&app, json!({"name": "Asha", "phone": "1", "symptoms": "Fever"})).await;
        create(
            &app,
            json!({"name": "Ravi", "phone": "2", "symptoms": "cough", "status": "completed"}),
        )
        .await;

        let (_, all) = send(&app, "GET", "/patients", None).await;
        assert_eq!(all["patients"].as_array().unwrap().len(), 2);
        assert_eq!(all["patients"][0]["name"], "Asha");

        let (_, by_text) = send(&app, "GET", "/patients?q=FEVER", None).await;
        assert_eq!(by_text["patients"].as_array().unwrap().len(), 1);
        assert_eq!(by_text["patients"][0]["name"], "Asha");

        let (_, done) = send(&app, "GET", "/patients?status=completed", None).await;
        assert_eq!(done["patients"][0]["name"], "Ravi");

        let (_, none) = send(&app, "GET", "/patients?q=fever&status=completed", None).await;
        assert!(none["patients"].as_array().unwrap().is_empty());

        let (status, _) = send(&app, "GET", "/patients?status=urgent", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_predict_rejects_wrong_case_count_locally() {
        let app = app_with(Arc::new(InMemoryBackend::new()));
        let (status, body) = send(
            &app,
            "POST",
            "/prediction",
            Some(json!({"region": "Mumbai", "disease": "Dengue", "recent_daily_cases": [1.0, 2.0]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn test_predict_rejects_malformed_date() {
        let app = app_with(Arc::new(InMemoryBackend::new()));
        let (status, _) = send(
            &app,
            "POST",
            "/prediction",
            Some(json!({
                "region": "Mumbai",
                "disease": "Dengue",
                "recent_daily_cases": [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0],
                "prediction_date": "15/11/2025"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unreachable_prediction_service_leaves_store_untouched() {
        let backend = Arc::new(InMemoryBackend::new());
        let app = app_with(backend.clone());
        create(&app, json!({"name": "Asha", "phone": "1", "symptoms": "fever"})).await;
        let before = backend.snapshot();

        let (status, body) = send(
            &app,
            "POST",
            "/prediction",
            Some(json!({
                "region": "Mumbai",
                "disease": "Dengue",
                "recent_daily_cases": [12.0, 15.0, 11.0, 18.0, 20.0, 22.0, 19.0]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["detail"]
            .as_str()
            .unwrap()
            .contains("start the prediction API server"));

        let (status, _) = send(&app, "GET", "/prediction/regions", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        assert_eq!(backend.snapshot(), before);
        assert_eq!(backend.save_count(), 1);
    }

    #[test]
    fn test_openapi_lists_patient_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/patients/{id}/status"));
        assert!(doc.paths.paths.contains_key("/prediction"));
    }
}
