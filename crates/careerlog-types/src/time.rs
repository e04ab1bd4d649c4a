//! Conversion between simulated universal time (UT) and calendar dates.
//!
//! UT is a count of seconds since the career epoch, `1951-01-01T00:00:00Z`.
//! Periods are calendar months, so period boundaries are computed by
//! converting to a date, adding months, and converting back.

use chrono::{DateTime, Months, SecondsFormat, TimeDelta, Utc};

/// Unix timestamp of the career epoch (`1951-01-01T00:00:00Z`).
pub const EPOCH_UNIX_SECONDS: i64 = -599_616_000;

/// Largest UT magnitude accepted for date conversion (about 290 000 years).
const MAX_UT_SECONDS: f64 = 9.0e12;

/// Errors that can occur when converting UT to a calendar date.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimeError {
    /// The UT value was NaN or infinite.
    #[error("UT is not a finite number: {ut}")]
    NonFinite {
        /// The rejected UT value.
        ut: f64,
    },

    /// The UT value (or the result of month arithmetic) does not fit in the
    /// supported calendar range.
    #[error("UT {ut} is outside the supported calendar range")]
    OutOfRange {
        /// The rejected UT value.
        ut: f64,
    },
}

/// Return the career epoch as a UTC date-time.
///
/// # Errors
///
/// Never fails in practice; the error path exists because the chrono
/// constructor is fallible.
pub fn epoch() -> Result<DateTime<Utc>, TimeError> {
    DateTime::from_timestamp(EPOCH_UNIX_SECONDS, 0).ok_or(TimeError::OutOfRange { ut: 0.0 })
}

/// Convert a UT value to a calendar date.
///
/// Sub-millisecond precision is rounded away.
///
/// # Errors
///
/// Returns [`TimeError::NonFinite`] for NaN/infinite input and
/// [`TimeError::OutOfRange`] if the date cannot be represented.
pub fn ut_to_date(ut: f64) -> Result<DateTime<Utc>, TimeError> {
    if !ut.is_finite() {
        return Err(TimeError::NonFinite { ut });
    }
    if ut.abs() > MAX_UT_SECONDS {
        return Err(TimeError::OutOfRange { ut });
    }

    // Bounded by MAX_UT_SECONDS above, so the millisecond count fits in i64.
    #[allow(clippy::cast_possible_truncation)]
    let millis = (ut * 1000.0).round() as i64;
    let delta = TimeDelta::try_milliseconds(millis).ok_or(TimeError::OutOfRange { ut })?;
    epoch()?
        .checked_add_signed(delta)
        .ok_or(TimeError::OutOfRange { ut })
}

/// Convert a calendar date back to UT seconds.
///
/// # Errors
///
/// Propagates [`epoch`] failures.
pub fn date_to_ut(date: DateTime<Utc>) -> Result<f64, TimeError> {
    let millis = date.signed_duration_since(epoch()?).num_milliseconds();
    // Dates produced by `ut_to_date` stay far below 2^53 milliseconds.
    #[allow(clippy::cast_precision_loss)]
    let seconds = millis as f64 / 1000.0;
    Ok(seconds)
}

/// Return the UT that lies `months` calendar months after `ut`.
///
/// # Errors
///
/// Returns [`TimeError`] if `ut` is not representable or the addition
/// overflows the calendar.
pub fn add_months(ut: f64, months: u32) -> Result<f64, TimeError> {
    let date = ut_to_date(ut)?;
    let next = date
        .checked_add_months(Months::new(months))
        .ok_or(TimeError::OutOfRange { ut })?;
    date_to_ut(next)
}

/// Format the month containing `ut` as `yyyy-MM`.
///
/// # Errors
///
/// Returns [`TimeError`] if `ut` is not representable.
pub fn month_label(ut: f64) -> Result<String, TimeError> {
    Ok(ut_to_date(ut)?.format("%Y-%m").to_string())
}

/// Format `ut` as an ISO-8601 timestamp with millisecond precision.
///
/// # Errors
///
/// Returns [`TimeError`] if `ut` is not representable.
pub fn iso8601(ut: f64) -> Result<String, TimeError> {
    Ok(ut_to_date(ut)?.to_rfc3339_opts(SecondsFormat::Millis, true))
}
