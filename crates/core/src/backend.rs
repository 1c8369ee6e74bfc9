//! Persistence backends for the patient records collection.
//!
//! The collection is always persisted as one snapshot: a plain JSON array of
//! [`PatientRecord`]s. Backends never see partial updates.
//!
//! ## Storage Layout
//!
//! ```text
//! <PATIENT_DATA_DIR>/
//!   patientRecords.json        # [ { "name": ..., "id": "PAT-..." }, ... ]
//!   patientRecords.json.tmp    # only present while a snapshot is being written
//! ```

use crate::constants::SNAPSHOT_TMP_SUFFIX;
use crate::error::{PatientError, PatientResult};
use crate::patient::PatientRecord;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Somewhere a [`PatientStore`](crate::PatientStore) can load and save its collection.
pub trait RecordBackend: Send + Sync {
    /// Loads the persisted collection. `Ok(None)` means nothing has been persisted yet.
    fn load(&self) -> PatientResult<Option<Vec<PatientRecord>>>;

    /// Replaces the persisted collection with `records`.
    fn save(&self, records: &[PatientRecord]) -> PatientResult<()>;
}

impl<B: RecordBackend + ?Sized> RecordBackend for Box<B> {
    fn load(&self) -> PatientResult<Option<Vec<PatientRecord>>> {
        (**self).load()
    }

    fn save(&self, records: &[PatientRecord]) -> PatientResult<()> {
        (**self).save(records)
    }
}

impl<B: RecordBackend + ?Sized> RecordBackend for Arc<B> {
    fn load(&self) -> PatientResult<Option<Vec<PatientRecord>>> {
        (**self).load()
    }

    fn save(&self, records: &[PatientRecord]) -> PatientResult<()> {
        (**self).save(records)
    }
}

/// Stores the collection in a single JSON file.
#[derive(Clone, Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(SNAPSHOT_TMP_SUFFIX);
        PathBuf::from(name)
    }
}

impl RecordBackend for JsonFileBackend {
    fn load(&self) -> PatientResult<Option<Vec<PatientRecord>>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("no patient records at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(PatientError::FileRead(e)),
        };

        if contents.trim().is_empty() {
            return Ok(None);
        }

        let records: Vec<PatientRecord> =
            serde_json::from_str(&contents).map_err(PatientError::Deserialization)?;
        tracing::debug!(
            "loaded {} patient records from {}",
            records.len(),
            self.path.display()
        );
        Ok(Some(records))
    }

    fn save(&self, records: &[PatientRecord]) -> PatientResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(PatientError::StorageDirCreation)?;
        }

        let json = serde_json::to_string_pretty(records).map_err(PatientError::Serialization)?;

        // The collection file is only ever replaced whole, never truncated in place.
        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, json).map_err(PatientError::FileWrite)?;
        fs::rename(&tmp_path, &self.path).map_err(PatientError::FileWrite)?;

        tracing::debug!(
            "saved {} patient records to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Keeps the collection in memory. Useful as a substitute backend in tests.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    snapshot: Mutex<Option<Vec<PatientRecord>>>,
    saves: Mutex<usize>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an already-persisted collection.
    pub fn with_records(records: Vec<PatientRecord>) -> Self {
        Self {
            snapshot: Mutex::new(Some(records)),
            saves: Mutex::new(0),
        }
    }

    /// The currently persisted collection, if any.
    pub fn snapshot(&self) -> Option<Vec<PatientRecord>> {
        self.snapshot.lock().ok().and_then(|guard| guard.clone())
    }

    /// How many times [`RecordBackend::save`] has succeeded.
    pub fn save_count(&self) -> usize {
        self.saves.lock().map(|guard| *guard).unwrap_or_default()
    }
}

impl RecordBackend for InMemoryBackend {
    fn load(&self) -> PatientResult<Option<Vec<PatientRecord>>> {
        let guard = self
            .snapshot
            .lock()
            .map_err(|_| PatientError::BackendUnavailable("in-memory snapshot poisoned".into()))?;
        Ok(guard.clone())
    }

    fn save(&self, records: &[PatientRecord]) -> PatientResult<()> {
        let mut guard = self
            .snapshot
            .lock()
            .map_err(|_| PatientError::BackendUnavailable("in-memory snapshot poisoned".into()))?;
        *guard = Some(records.to_vec());
        if let Ok(mut saves) = self.saves.lock() {
            *saves += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patient::{PatientDraft, PatientStatus};
    use chrono::{TimeZone, Utc};
    use nirogya_ids::PatientId;
    use tempfile::TempDir;

    fn record(millis: i64, name: &str) -> PatientRecord {
        PatientDraft::new(name, "9990001111", "fever")
            .into_record(
                PatientId::from_millis(millis),
                Utc.timestamp_millis_opt(millis).unwrap(),
            )
            .unwrap()
    }

    #[test]
    fn test_missing_file_loads_as_none() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let backend = JsonFileBackend::new(temp_dir.path().join("patientRecords.json"));
        assert_eq!(backend.load().unwrap(), None);
    }

    #[test]
    fn test_save_creates_parent_dirs_and_cleans_tmp() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("nested/data/patientRecords.json");
        let backend = JsonFileBackend::new(&path);

        backend.save(&[record(1, "Asha")]).unwrap();

        assert!(path.is_file(), "records file should exist");
        assert!(
            !backend.tmp_path().exists(),
            "scratch file should be renamed away"
        );
    }

    #[test]
    fn test_file_roundtrip_preserves_order_and_fields() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let backend = JsonFileBackend::new(temp_dir.path().join("patientRecords.json"));

        let mut records = vec![record(3, "Chandra"), record(1, "Asha"), record(2, "Bala")];
        records[1].status = PatientStatus::Cancelled;
        records[2].address = Some("Kochi".into());

        backend.save(&records).unwrap();
        assert_eq!(backend.load().unwrap(), Some(records));
    }

    #[test]
    fn test_reads_plain_array_written_by_dashboard() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("patientRecords.json");
        fs::write(
            &path,
            r#"[{"name":"Ravi","phone":"9876543210","email":"","address":"","symptoms":"diarrhoea","status":"in-progress","submittedAt":"2025-11-02T10:15:00.000Z","id":"PAT-1762078500000"}]"#,
        )
        .unwrap();

        let records = JsonFileBackend::new(&path).load().unwrap().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name.as_str(), "Ravi");
        assert_eq!(records[0].email, None);
        assert_eq!(records[0].status, PatientStatus::InProgress);
        assert_eq!(records[0].id.millis(), Some(1_762_078_500_000));
    }

    #[test]
    fn test_store_opens_dashboard_blob_with_blank_phone() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("patientRecords.json");
        fs::write(
            &path,
            r#"[
  {"name":"Asha","phone":"9990001111","email":"","address":"","symptoms":"fever","status":"incoming","submittedAt":"2025-11-02T10:15:00.000Z","id":"PAT-1762078500000"},
  {"name":"Ravi","phone":"","email":"","address":"","symptoms":"cough","status":"completed","submittedAt":"2025-11-02T11:00:00.000Z","id":"PAT-1762081200000"}
]"#,
        )
        .unwrap();

        let mut store = crate::PatientStore::open(JsonFileBackend::new(&path)).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.list()[1].phone, "");

        let ravi = PatientId::parse("PAT-1762081200000").unwrap();
        let updated = store
            .set_status(&ravi, PatientStatus::Cancelled)
            .expect("status change does not touch the blank phone");
        assert_eq!(updated.phone, "");

        let reloaded = JsonFileBackend::new(&path).load().unwrap().unwrap();
        assert_eq!(reloaded, store.list());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("patientRecords.json");
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            JsonFileBackend::new(&path).load(),
            Err(PatientError::Deserialization(_))
        ));
    }

    #[test]
    fn test_in_memory_counts_saves() {
        let backend = InMemoryBackend::new();
        assert_eq!(backend.load().unwrap(), None);

        backend.save(&[record(1, "Asha")]).unwrap();
        backend.save(&[]).unwrap();

        assert_eq!(backend.save_count(), 2);
        assert_eq!(backend.snapshot(), Some(vec![]));
    }
}
