//! Period store: one [`LogPeriod`] per distinct start time.
//!
//! Periods are keyed by the exact bit pattern of their start UT and kept in
//! insertion order, which is the order exporters emit them in.

use std::collections::HashMap;

use careerlog_types::time::{add_months, TimeError};
use careerlog_types::LogPeriod;

/// Errors raised by the period store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PeriodError {
    /// A period with the same start time is already registered.
    #[error("LOGPERIOD for {start_ut} already exists")]
    Duplicate {
        /// The colliding start time.
        start_ut: f64,
    },

    /// The period end could not be computed.
    #[error("cannot compute period end: {0}")]
    Time(#[from] TimeError),

    /// The lookup index and the period list disagree.
    #[error("internal period store error: {0}")]
    Internal(&'static str),
}

/// Normalise `-0.0` to `0.0` so both map to the same key.
fn key(start_ut: f64) -> u64 {
    (start_ut + 0.0).to_bits()
}

/// Ordered collection of periods with lookup by start time.
#[derive(Debug, Clone, Default)]
pub struct PeriodStore {
    periods: Vec<LogPeriod>,
    index: HashMap<u64, usize>,
}

impl PeriodStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of periods.
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Whether the store holds no periods.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Iterate periods in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &LogPeriod> {
        self.periods.iter()
    }

    /// All periods in insertion order.
    pub fn as_slice(&self) -> &[LogPeriod] {
        &self.periods
    }

    /// The period starting exactly at `start_ut`.
    pub fn get(&self, start_ut: f64) -> Option<&LogPeriod> {
        self.index
            .get(&key(start_ut))
            .and_then(|&idx| self.periods.get(idx))
    }

    /// Register a fully built period.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodError::Duplicate`] if a period with the same start
    /// time exists; the store is left unchanged.
    pub fn insert(&mut self, period: LogPeriod) -> Result<&mut LogPeriod, PeriodError> {
        let k = key(period.start_ut);
        if self.index.contains_key(&k) {
            return Err(PeriodError::Duplicate {
                start_ut: period.start_ut,
            });
        }
        let idx = self.periods.len();
        self.periods.push(period);
        self.index.insert(k, idx);
        self.periods
            .get_mut(idx)
            .ok_or(PeriodError::Internal("period missing after insert"))
    }

    /// Return the period starting at `start_ut`, creating it with an end
    /// `months` calendar months later if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`PeriodError::Time`] if the end date cannot be computed.
    pub fn get_or_create(
        &mut self,
        start_ut: f64,
        months: u32,
    ) -> Result<&mut LogPeriod, PeriodError> {
        if let Some(idx) = self.index.get(&key(start_ut)).copied() {
            return self
                .periods
                .get_mut(idx)
                .ok_or(PeriodError::Internal("indexed period missing"));
        }
        let end_ut = add_months(start_ut, months)?;
        self.insert(LogPeriod::new(start_ut, end_ut))
    }
}
