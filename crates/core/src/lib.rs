//! # Nirogya Core
//!
//! Core business logic for the Nirogya doctor dashboard.
//!
//! This crate contains pure data operations:
//! - Patient intake records and their status workflow
//! - The [`PatientStore`] collection with search, status filtering and summary counts
//! - Persistence of the collection as a single JSON snapshot under `PATIENT_DATA_DIR`
//!
//! **No API concerns**: HTTP servers, CLI parsing and the prediction service client belong in
//! `api-rest`, `nirogya-cli` and `nirogya-prediction`.

pub mod backend;
pub mod config;
pub mod constants;
pub mod error;
pub mod patient;
pub mod store;

pub use backend::{InMemoryBackend, JsonFileBackend, RecordBackend};
pub use config::CoreConfig;
pub use constants::DEFAULT_PATIENT_DATA_DIR;
pub use error::{PatientError, PatientResult};
pub use nirogya_ids::PatientId;
pub use nirogya_types::NonEmptyText;
pub use patient::{
    PatientDraft, PatientPatch, PatientRecord, PatientStatus, StatusCounts, StatusFilter,
};
pub use store::PatientStore;

/// Opens the file-backed store described by `cfg`.
///
/// # Errors
///
/// Returns a [`PatientError`] if an existing collection cannot be read or parsed.
pub fn open_file_store(cfg: &CoreConfig) -> PatientResult<PatientStore<JsonFileBackend>> {
    PatientStore::open(JsonFileBackend::new(cfg.records_path()))
}
