//! Constants used throughout the Nirogya core crate.
//!
//! Path and filename constants live here so the on-disk layout is defined in one place.

/// Default directory for patient data storage when no explicit directory is configured.
pub const DEFAULT_PATIENT_DATA_DIR: &str = "patient_data";

/// Filename of the serialized patient records collection.
///
/// Matches the storage key the dashboard has always used.
pub const PATIENT_RECORDS_FILENAME: &str = "patientRecords.json";

/// Suffix of the scratch file a snapshot is written to before it replaces the collection.
pub const SNAPSHOT_TMP_SUFFIX: &str = ".tmp";
