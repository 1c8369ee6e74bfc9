//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services.
//! Nothing in this crate reads environment variables during request handling; binaries read
//! the raw values and hand them to the helpers below.

use crate::constants::{DEFAULT_PATIENT_DATA_DIR, PATIENT_RECORDS_FILENAME};
use crate::{PatientError, PatientResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    patient_data_dir: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::InvalidInput`] if `patient_data_dir` is empty, or if it exists
    /// but is not a directory.
    pub fn new(patient_data_dir: PathBuf) -> PatientResult<Self> {
        if patient_data_dir.as_os_str().is_empty() {
            return Err(PatientError::InvalidInput(
                "patient_data_dir cannot be empty".into(),
            ));
        }
        if patient_data_dir.exists() && !patient_data_dir.is_dir() {
            return Err(PatientError::InvalidInput(format!(
                "patient_data_dir is not a directory: {}",
                patient_data_dir.display()
            )));
        }

        Ok(Self { patient_data_dir })
    }

    pub fn patient_data_dir(&self) -> &Path {
        &self.patient_data_dir
    }

    /// Location of the serialized patient records collection.
    pub fn records_path(&self) -> PathBuf {
        self.patient_data_dir.join(PATIENT_RECORDS_FILENAME)
    }
}

/// Resolve the patient data directory from an optional raw value (typically
/// `PATIENT_DATA_DIR`).
///
/// `None` or a blank value selects [`DEFAULT_PATIENT_DATA_DIR`].
pub fn patient_data_dir_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PATIENT_DATA_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_records_path_is_inside_data_dir() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cfg = CoreConfig::new(temp_dir.path().to_path_buf()).unwrap();

        assert_eq!(
            cfg.records_path(),
            temp_dir.path().join(PATIENT_RECORDS_FILENAME)
        );
    }

    #[test]
    fn test_missing_dir_is_accepted() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cfg = CoreConfig::new(temp_dir.path().join("not-yet-created"));
        assert!(cfg.is_ok());
    }

    #[test]
    fn test_rejects_empty_and_file_paths() {
        assert!(matches!(
            CoreConfig::new(PathBuf::new()),
            Err(PatientError::InvalidInput(_))
        ));

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file = temp_dir.path().join("plain.txt");
        std::fs::write(&file, "x").unwrap();
        assert!(matches!(
            CoreConfig::new(file),
            Err(PatientError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_patient_data_dir_from_env_value() {
        assert_eq!(
            patient_data_dir_from_env_value(None),
            PathBuf::from(DEFAULT_PATIENT_DATA_DIR)
        );
        assert_eq!(
            patient_data_dir_from_env_value(Some("  ".into())),
            PathBuf::from(DEFAULT_PATIENT_DATA_DIR)
        );
        assert_eq!(
            patient_data_dir_from_env_value(Some("/srv/nirogya ".into())),
            PathBuf::from("/srv/nirogya")
        );
    }
}
