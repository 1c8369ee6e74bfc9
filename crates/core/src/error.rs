#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid status '{0}': expected one of incoming, in-progress, completed, cancelled")]
    InvalidStatus(String),
    #[error("patient not found: {0}")]
    NotFound(String),
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to write patient records: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read patient records: {0}")]
    FileRead(std::io::Error),
    #[error("failed to serialize patient records: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize patient records: {0}")]
    Deserialization(serde_json::Error),
    #[error("record backend unavailable: {0}")]
    BackendUnavailable(String),
}

impl From<nirogya_types::TextError> for PatientError {
    fn from(e: nirogya_types::TextError) -> Self {
        PatientError::InvalidInput(e.to_string())
    }
}

impl From<nirogya_ids::IdError> for PatientError {
    fn from(e: nirogya_ids::IdError) -> Self {
        PatientError::InvalidInput(e.to_string())
    }
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;
