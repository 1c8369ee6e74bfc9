//! Monotonic generation of `PAT-<millis>` identifiers.

use crate::{IdError, IdResult, PatientId};
use chrono::{DateTime, Utc};

/// Hands out strictly increasing patient identifiers.
///
/// The generator remembers the newest instant it has issued (or been seeded with). When the
/// clock has not moved past that instant, the next identifier is the previous one plus 1 ms.
/// This keeps identifiers unique when records are created in bursts, and keeps them ordered
/// after the wall clock steps backwards.
#[derive(Clone, Debug, Default)]
pub struct PatientIdGenerator {
    last_millis: Option<i64>,
}

impl PatientIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator that will never reissue any of `existing`.
    pub fn seeded<'a>(existing: impl IntoIterator<Item = &'a PatientId>) -> Self {
        let last_millis = existing.into_iter().filter_map(PatientId::millis).max();
        Self { last_millis }
    }

    /// Generates the next identifier using the current time.
    ///
    /// # Errors
    ///
    /// See [`PatientIdGenerator::generate_at`].
    pub fn generate(&mut self) -> IdResult<PatientId> {
        self.generate_at(Utc::now())
    }

    /// Generates the next identifier as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::InvalidInput`] if the newest known identifier is already at
    /// `i64::MAX` milliseconds, so no larger one exists. The generator is left unchanged.
    pub fn generate_at(&mut self, now: DateTime<Utc>) -> IdResult<PatientId> {
        let now_millis = now.timestamp_millis();
        let millis = match self.last_millis {
            Some(prev) if now_millis <= prev => prev.checked_add(1).ok_or_else(|| {
                IdError::InvalidInput(format!(
                    "no patient id left after {}",
                    PatientId::from_millis(prev)
                ))
            })?,
            _ => now_millis,
        };
        self.last_millis = Some(millis);
        Ok(PatientId::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    #[test]
    fn test_uses_clock_when_it_moves_forward() {
        let mut generator = PatientIdGenerator::new();
        assert_eq!(generator.generate_at(at(1_000)).unwrap().as_str(), "PAT-1000");
        assert_eq!(generator.generate_at(at(2_000)).unwrap().as_str(), "PAT-2000");
    }

    #[test]
    fn test_same_millisecond_bumps_by_one() {
        let mut generator = PatientIdGenerator::new();
        let first = generator.generate_at(at(5_000)).unwrap();
        let second = generator.generate_at(at(5_000)).unwrap();
        let third = generator.generate_at(at(4_000)).unwrap();

        assert_eq!(first.millis(), Some(5_000));
        assert_eq!(second.millis(), Some(5_001));
        assert_eq!(third.millis(), Some(5_002));
    }

    #[test]
    fn test_seeded_skips_existing_ids() {
        let existing = vec![
            PatientId::from_millis(9_000),
            PatientId::parse("legacy-1").unwrap(),
            PatientId::from_millis(3_000),
        ];
        let mut generator = PatientIdGenerator::seeded(&existing);

        let next = generator.generate_at(at(1_000)).unwrap();
        assert_eq!(next.millis(), Some(9_001));
        assert!(!existing.contains(&next));
    }

    #[test]
    fn test_seeded_at_max_millis_errors_instead_of_wrapping() {
        let existing = vec![PatientId::parse("PAT-9223372036854775807").unwrap()];
        let mut generator = PatientIdGenerator::seeded(&existing);

        assert!(matches!(
            generator.generate_at(at(1_000)),
            Err(IdError::InvalidInput(_))
        ));
        assert!(matches!(generator.generate(), Err(IdError::InvalidInput(_))));
    }

    #[test]
    fn test_burst_generation_is_unique() {
        let mut generator = PatientIdGenerator::new();
        let ids: HashSet<PatientId> = (0..500).map(|_| generator.generate().unwrap()).collect();
        assert_eq!(ids.len(), 500);
    }
}
