//! Error types for the career log aggregate.
//!
//! Ignorable events never produce an error; they return
//! [`EventOutcome::Ignored`](crate::bus::EventOutcome::Ignored). The
//! variants here cover the few conditions that leave the period pointers
//! unusable.

use careerlog_types::TimeError;

use crate::periods::PeriodError;
use crate::save::SaveError;

/// Errors raised while updating or restoring the career log.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CareerLogError {
    /// A period could not be looked up or created.
    #[error("period error: {source}")]
    Period {
        /// The underlying period store error.
        #[from]
        source: PeriodError,
    },

    /// A timestamp could not be converted to a calendar date.
    #[error("time error: {source}")]
    Time {
        /// The underlying conversion error.
        #[from]
        source: TimeError,
    },

    /// A persisted pointer value could not be read.
    #[error("save error: {source}")]
    Save {
        /// The underlying save tree error.
        #[from]
        source: SaveError,
    },

    /// A rollover did not move the next-period pointer forward.
    #[error("rollover did not advance past {next_period_start}")]
    StalledRollover {
        /// The pointer value that failed to advance.
        next_period_start: f64,
    },
}
