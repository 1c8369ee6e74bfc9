//! Patient intake records and the value types used to create, edit and filter them.

use crate::error::{PatientError, PatientResult};
use chrono::{DateTime, Utc};
use nirogya_ids::PatientId;
use nirogya_types::{blank_as_none, optional_text, NonEmptyText};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Where a patient is in the doctor's workflow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatientStatus {
    #[default]
    Incoming,
    InProgress,
    Completed,
    Cancelled,
}

impl PatientStatus {
    pub const ALL: [PatientStatus; 4] = [
        PatientStatus::Incoming,
        PatientStatus::InProgress,
        PatientStatus::Completed,
        PatientStatus::Cancelled,
    ];

    /// Wire form of the status, as stored and as accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            PatientStatus::Incoming => "incoming",
            PatientStatus::InProgress => "in-progress",
            PatientStatus::Completed => "completed",
            PatientStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for PatientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatientStatus {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        PatientStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| PatientError::InvalidStatus(s.to_string()))
    }
}

/// Status filter used by the dashboard. `all` is a sentinel meaning "no filtering".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(PatientStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: PatientStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl From<PatientStatus> for StatusFilter {
    fn from(status: PatientStatus) -> Self {
        StatusFilter::Only(status)
    }
}

impl FromStr for StatusFilter {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(StatusFilter::All),
            other => other.parse().map(StatusFilter::Only),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => status.fmt(f),
        }
    }
}

/// A patient's self-reported symptom submission plus contact details.
///
/// Field names and order follow the stored JSON layout, so a persisted collection can be read
/// by anything that already understands it.
///
/// `name`, `phone` and `symptoms` are checked when a record is added or edited through the
/// store. Stored data is read as it is: older dashboard builds saved edits without checks, so a
/// loaded record may carry a blank required field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    pub name: String,
    pub phone: String,
    #[serde(default, with = "blank_as_none")]
    pub email: Option<String>,
    #[serde(default, with = "blank_as_none")]
    pub address: Option<String>,
    pub symptoms: String,
    pub status: PatientStatus,
    pub submitted_at: DateTime<Utc>,
    pub id: PatientId,
}

impl PatientRecord {
    /// True if `needle` (already lowercased) occurs in the name, phone, email or symptoms.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        let hit = |text: &str| text.to_lowercase().contains(needle);
        hit(&self.name)
            || hit(&self.phone)
            || self.email.as_deref().is_some_and(hit)
            || hit(&self.symptoms)
    }
}

/// Input for a new record, as submitted by the intake form or entered by a doctor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct PatientDraft {
    pub name: String,
    pub phone: String,
    pub symptoms: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Initial status. Intake submissions leave this unset and start as `incoming`.
    #[serde(default)]
    pub status: Option<PatientStatus>,
}

impl PatientDraft {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        symptoms: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            symptoms: symptoms.into(),
            ..Self::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_status(mut self, status: PatientStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Validates the draft and builds the record it describes.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::InvalidInput`] naming the first blank required field.
    pub(crate) fn into_record(
        self,
        id: PatientId,
        submitted_at: DateTime<Utc>,
    ) -> PatientResult<PatientRecord> {
        Ok(PatientRecord {
            name: required("name", &self.name)?,
            phone: required("phone", &self.phone)?,
            email: optional_text(self.email),
            address: optional_text(self.address),
            symptoms: required("symptoms", &self.symptoms)?,
            status: self.status.unwrap_or_default(),
            submitted_at,
            id,
        })
    }

    pub(crate) fn validate(&self) -> PatientResult<()> {
        required("name", &self.name)?;
        required("phone", &self.phone)?;
        required("symptoms", &self.symptoms)?;
        Ok(())
    }
}

/// A partial edit of a record. `None` leaves the field as it is.
///
/// For `email` and `address`, `Some("")` clears the field. The identifier and submission time
/// are not editable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct PatientPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub symptoms: Option<String>,
    #[serde(default)]
    pub status: Option<PatientStatus>,
}

impl PatientPatch {
    pub fn status(status: PatientStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns a copy of `record` with this patch merged in.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::InvalidInput`] if the patch would blank a required field.
    pub(crate) fn merged_into(&self, record: &PatientRecord) -> PatientResult<PatientRecord> {
        let mut merged = record.clone();
        if let Some(name) = &self.name {
            merged.name = required("name", name)?;
        }
        if let Some(phone) = &self.phone {
            merged.phone = required("phone", phone)?;
        }
        if let Some(symptoms) = &self.symptoms {
            merged.symptoms = required("symptoms", symptoms)?;
        }
        if let Some(email) = &self.email {
            merged.email = optional_text(Some(email));
        }
        if let Some(address) = &self.address {
            merged.address = optional_text(Some(address));
        }
        if let Some(status) = self.status {
            merged.status = status;
        }
        Ok(merged)
    }
}

fn required(field: &str, value: &str) -> PatientResult<String> {
    NonEmptyText::new(value)
        .map(NonEmptyText::into_inner)
        .map_err(|_| PatientError::InvalidInput(format!("{field} is required")))
}

/// Per-status totals shown on the dashboard summary cards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub incoming: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub total: usize,
}

impl StatusCounts {
    pub(crate) fn tally<'a>(records: impl IntoIterator<Item = &'a PatientRecord>) -> Self {
        records
            .into_iter()
            .fold(Self::default(), |mut counts, record| {
                match record.status {
                    PatientStatus::Incoming => counts.incoming += 1,
                    PatientStatus::InProgress => counts.in_progress += 1,
                    PatientStatus::Completed => counts.completed += 1,
                    PatientStatus::Cancelled => counts.cancelled += 1,
                }
                counts.total += 1;
                counts
            })
    }

    pub fn get(&self, status: PatientStatus) -> usize {
        match status {
            PatientStatus::Incoming => self.incoming,
            PatientStatus::InProgress => self.in_progress,
            PatientStatus::Completed => self.completed,
            PatientStatus::Cancelled => self.cancelled,
        }
    }
}
