//! The patient records collection used by the doctor dashboard.
//!
//! [`PatientStore`] owns the in-session list of intake records and persists the whole list
//! through a [`RecordBackend`] after every change. Reads (`list`, `search`, filters) are linear
//! scans over the in-memory list; the collection is expected to stay small.
//!
//! Every mutation is staged on a copy of the collection. The in-memory list is only replaced
//! once the backend has accepted the new snapshot, so a failed save or a rejected input leaves
//! the store exactly as it was.
//!
//! There is no cross-process coordination: two processes writing the same backend will race
//! and the last snapshot wins.

use crate::backend::RecordBackend;
use crate::error::{PatientError, PatientResult};
use crate::patient::{
    PatientDraft, PatientPatch, PatientRecord, PatientStatus, StatusCounts, StatusFilter,
};
use chrono::Utc;
use nirogya_ids::{PatientId, PatientIdGenerator};
use std::collections::HashSet;

pub struct PatientStore<B> {
    backend: B,
    records: Vec<PatientRecord>,
    ids: PatientIdGenerator,
}

impl<B: RecordBackend> PatientStore<B> {
    /// Opens the store, loading whatever the backend has persisted.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the persisted collection cannot be read or parsed, and
    /// [`PatientError::InvalidInput`] if it contains duplicate identifiers.
    pub fn open(backend: B) -> PatientResult<Self> {
        let records = backend.load()?.unwrap_or_default();

        ensure_unique_ids(&records)?;

        let ids = PatientIdGenerator::seeded(records.iter().map(|r| &r.id));
        tracing::debug!("opened patient store with {} records", records.len());

        Ok(Self {
            backend,
            records,
            ids,
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// All records in insertion order.
    pub fn list(&self) -> &[PatientRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up a single record.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::NotFound`] if no record has this id.
    pub fn get(&self, id: &PatientId) -> PatientResult<&PatientRecord> {
        self.records
            .iter()
            .find(|r| &r.id == id)
            .ok_or_else(|| PatientError::NotFound(id.to_string()))
    }

    /// Creates a record from `draft`, appends it and persists the collection.
    ///
    /// The new record gets a fresh id, `submitted_at = now`, and `draft.status` (defaulting to
    /// `incoming`).
    ///
    /// # Errors
    ///
    /// - [`PatientError::InvalidInput`] if `name`, `phone` or `symptoms` is blank, or if a
    ///   loaded id already sits at the largest representable `PAT-<millis>` value.
    /// - Any backend error from persisting the collection.
    ///
    /// In every error case the collection is unchanged.
    pub fn add(&mut self, draft: PatientDraft) -> PatientResult<PatientRecord> {
        draft.validate()?;

        let mut ids = self.ids.clone();
        let record = draft.into_record(ids.generate()?, Utc::now())?;

        let mut staged = self.records.clone();
        staged.push(record.clone());
        self.commit(staged)?;
        self.ids = ids;

        tracing::info!("added patient record {} ({})", record.id, record.status);
        Ok(record)
    }

    /// Merges `patch` into the record with this id and persists the collection.
    ///
    /// # Errors
    ///
    /// - [`PatientError::NotFound`] if no record has this id.
    /// - [`PatientError::InvalidInput`] if the patch would blank a required field.
    /// - Any backend error from persisting the collection.
    ///
    /// In every error case the collection is unchanged.
    pub fn update(&mut self, id: &PatientId, patch: &PatientPatch) -> PatientResult<PatientRecord> {
        let index = self
            .records
            .iter()
            .position(|r| &r.id == id)
            .ok_or_else(|| PatientError::NotFound(id.to_string()))?;

        let merged = patch.merged_into(&self.records[index])?;

        let mut staged = self.records.clone();
        staged[index] = merged.clone();
        self.commit(staged)?;

        tracing::debug!("updated patient record {}", id);
        Ok(merged)
    }

    /// Moves the record with this id to `status`.
    ///
    /// # Errors
    ///
    /// Same contract as [`PatientStore::update`].
    pub fn set_status(
        &mut self,
        id: &PatientId,
        status: PatientStatus,
    ) -> PatientResult<PatientRecord> {
        let record = self.update(id, &PatientPatch::status(status))?;
        tracing::info!("patient record {} is now {}", id, status);
        Ok(record)
    }

    /// Records whose name, phone, email or symptoms contain `query`, ignoring case.
    ///
    /// A blank query matches every record.
    pub fn search(&self, query: &str) -> Vec<&PatientRecord> {
        self.query(query, StatusFilter::All)
    }

    /// Records matching `filter`. [`StatusFilter::All`] returns the whole collection.
    pub fn filter_by_status(&self, filter: StatusFilter) -> Vec<&PatientRecord> {
        self.query("", filter)
    }

    /// Records that match both the search text and the status filter, in insertion order.
    pub fn query(&self, search: &str, filter: StatusFilter) -> Vec<&PatientRecord> {
        let blank = search.trim().is_empty();
        let needle = search.to_lowercase();
        self.records
            .iter()
            .filter(|r| filter.matches(r.status))
            .filter(|r| blank || r.matches_lowercase(&needle))
            .collect()
    }

    pub fn status_counts(&self) -> StatusCounts {
        StatusCounts::tally(&self.records)
    }

    fn commit(&mut self, staged: Vec<PatientRecord>) -> PatientResult<()> {
        self.backend.save(&staged)?;
        self.records = staged;
        Ok(())
    }
}

fn ensure_unique_ids(records: &[PatientRecord]) -> PatientResult<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(&record.id) {
            return Err(PatientError::InvalidInput(format!(
                "persisted collection contains duplicate id {}",
                record.id
            )));
        }
    }
    Ok(())
}
