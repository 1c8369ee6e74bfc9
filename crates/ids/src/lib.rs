//! Patient identifiers.
//!
//! Intake records are keyed by a timestamp-derived token of the form `PAT-<unix-millis>`,
//! for example `PAT-1731661200123`. This is the format the dashboard has always written, so
//! collections persisted before this crate existed load unchanged.
//!
//! This crate provides:
//! - [`PatientId`], a validated wrapper around the identifier text.
//! - [`PatientIdGenerator`], which hands out identifiers that are strictly increasing even
//!   when several records are created within the same millisecond.
//!
//! ## Foreign identifiers
//! Records imported from elsewhere may carry identifiers in another format. [`PatientId::parse`]
//! accepts any non-blank text without whitespace; only identifiers in the `PAT-<millis>` form
//! take part in seeding the generator.

mod generator;

pub use generator::PatientIdGenerator;

use std::{fmt, str::FromStr};

/// Prefix of generated patient identifiers.
pub const PATIENT_ID_PREFIX: &str = "PAT-";

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type IdResult<T> = Result<T, IdError>;

/// A patient record identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct PatientId(String);

impl PatientId {
    /// Builds the identifier for a given creation instant, in milliseconds since the epoch.
    pub fn from_millis(millis: i64) -> Self {
        Self(format!("{PATIENT_ID_PREFIX}{millis}"))
    }

    /// Validates an externally supplied identifier.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::InvalidInput`] if `input` is blank or contains whitespace.
    pub fn parse(input: &str) -> IdResult<Self> {
        if input.is_empty() || input.chars().any(char::is_whitespace) {
            return Err(IdError::InvalidInput(format!(
                "patient id must be non-empty and contain no whitespace, got: '{}'",
                input
            )));
        }
        Ok(Self(input.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the embedded creation instant if this identifier is in `PAT-<millis>` form.
    pub fn millis(&self) -> Option<i64> {
        let digits = self.0.strip_prefix(PATIENT_ID_PREFIX)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PatientId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PatientId::parse(s)
    }
}

impl TryFrom<String> for PatientId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PatientId::parse(&value)
    }
}

impl From<PatientId> for String {
    fn from(id: PatientId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_millis_format() {
        assert_eq!(PatientId::from_millis(1731661200123).as_str(), "PAT-1731661200123");
    }

    #[test]
    fn test_millis_roundtrip() {
        let id = PatientId::from_millis(42);
        assert_eq!(id.millis(), Some(42));
    }

    #[test]
    fn test_millis_none_for_foreign_ids() {
        assert_eq!(PatientId::parse("legacy-17").unwrap().millis(), None);
        assert_eq!(PatientId::parse("PAT-").unwrap().millis(), None);
        assert_eq!(PatientId::parse("PAT-12ab").unwrap().millis(), None);
        assert_eq!(PatientId::parse("PAT--12").unwrap().millis(), None);
    }

    #[test]
    fn test_parse_rejects_blank_and_whitespace() {
        assert!(PatientId::parse("").is_err());
        assert!(PatientId::parse("PAT 12").is_err());
        match PatientId::parse(" ") {
            Err(IdError::InvalidInput(msg)) => assert!(msg.contains("no whitespace")),
            _ => panic!("Expected InvalidInput error"),
        }
    }

    #[test]
    fn test_serde_is_plain_string() {
        let id = PatientId::from_millis(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"PAT-7\"");

        let back: PatientId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_str::<PatientId>("\"\"").is_err());
    }
}
