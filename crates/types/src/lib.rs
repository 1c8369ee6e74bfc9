//! Validated text primitives shared by the Nirogya crates.
//!
//! Intake forms hand us raw strings. Anything that must be present (a patient's name, a
//! region identifier) is carried as [`NonEmptyText`]; anything optional goes through
//! [`optional_text`] so that blank input and absent input mean the same thing.

use std::fmt;

/// Rejection reasons for validated text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    #[error("text cannot be empty")]
    Empty,
}

/// A string that is guaranteed to contain at least one non-whitespace character.
///
/// The input is trimmed during construction, so two inputs that differ only in surrounding
/// whitespace produce equal values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Trims `input` and keeps it if anything is left.
    ///
    /// # Errors
    ///
    /// [`TextError::Empty`] for blank input.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        match input.as_ref().trim() {
            "" => Err(TextError::Empty),
            text => Ok(Self(text.to_owned())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NonEmptyText {
    type Error = TextError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyText> for String {
    fn from(value: NonEmptyText) -> Self {
        value.0
    }
}

/// Normalises optional free text: trims it and maps blank input to `None`.
pub fn optional_text(input: Option<impl AsRef<str>>) -> Option<String> {
    let text = input?.as_ref().trim().to_owned();
    (!text.is_empty()).then_some(text)
}

/// Serde helper for optional text fields where stored data uses `""` for "absent".
///
/// Absent values are written back as `""` so the stored shape does not change.
pub mod blank_as_none {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<String>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Option::<String>::deserialize(deserializer).map(super::optional_text)
    }
}
