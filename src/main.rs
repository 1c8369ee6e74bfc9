use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use nirogya_core::{
    CoreConfig, JsonFileBackend, PatientStore, RecordBackend,
    config::patient_data_dir_from_env_value,
};
use nirogya_prediction::{PredictionClient, PredictionConfig};

/// Main entry point for the Nirogya doctor dashboard backend
///
/// Opens the patient store, connects the prediction client and serves the REST API.
///
/// # Environment Variables
/// - `NIROGYA_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `PATIENT_DATA_DIR`: Directory holding `patientRecords.json` (default: "patient_data")
/// - `PREDICTION_API_URL`: Prediction service base URL (default: "http://localhost:8000")
/// - `PREDICTION_TIMEOUT_SECS`: Optional per-request timeout for prediction calls
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nirogya=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr: SocketAddr = std::env::var("NIROGYA_REST_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".into())
        .parse()?;

    let core_cfg = CoreConfig::new(patient_data_dir_from_env_value(
        std::env::var("PATIENT_DATA_DIR").ok(),
    ))?;
    let backend: Box<dyn RecordBackend> = Box::new(JsonFileBackend::new(core_cfg.records_path()));
    let store = PatientStore::open(backend)?;
    tracing::info!(
        "++ Loaded {} patients from {}",
        store.len(),
        core_cfg.records_path().display()
    );

    let prediction_cfg = PredictionConfig::from_env_values(
        std::env::var("PREDICTION_API_URL").ok(),
        std::env::var("PREDICTION_TIMEOUT_SECS").ok(),
    )?;
    let prediction = PredictionClient::new(&prediction_cfg)?;
    tracing::info!("++ Prediction service at {}", prediction.base_url());

    let app = api_rest::router(AppState::new(store, prediction));

    tracing::info!("++ Starting Nirogya REST on {}", rest_addr);
    let listener = tokio::net::TcpListener::bind(rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
