//! CSV export: one row per period.
//!
//! Rows follow period insertion order. Snapshot columns come straight from
//! the period; advance, reward and penalty totals are summed from the
//! contract log, construction costs from facility upgrades started in the
//! period. List columns join names with `", "` and the CSV writer quotes
//! them as needed.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use careerlog_core::CareerRecords;
use careerlog_types::time::month_label;
use careerlog_types::{LogPeriod, TimeError};
use tracing::info;

use crate::error::ExportError;

/// Column names of the export, in order.
pub const HEADER: [&str; 22] = [
    "Month",
    "VAB",
    "SPH",
    "RnD",
    "Current Funds",
    "Current Sci",
    "Total sci earned",
    "Contract advances",
    "Contract rewards",
    "Contract penalties",
    "Other funds earned",
    "Launch fees",
    "Maintenance",
    "Tooling",
    "Entry Costs",
    "Facility construction costs",
    "Other Fees",
    "Launches",
    "Accepted contracts",
    "Completed contracts",
    "Tech",
    "Facilities",
];

/// Format `value` with a fixed number of decimals, printing negative zero
/// without its sign.
fn fixed(value: f64, decimals: usize) -> String {
    let text = format!("{value:.decimals$}");
    match text.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_owned(),
        _ => text,
    }
}

/// Whole-unit currency column.
fn funds(value: f64) -> String {
    fixed(value, 0)
}

/// Science column, one decimal.
fn sci(value: f64) -> String {
    fixed(value, 1)
}

/// Render the 22 fields of one period row.
pub fn period_row(records: &CareerRecords, period: &LogPeriod) -> Result<Vec<String>, TimeError> {
    let summary = records.summarize(period);
    Ok(vec![
        month_label(period.start_ut)?,
        period.vab_upgrades.to_string(),
        period.sph_upgrades.to_string(),
        period.rnd_upgrades.to_string(),
        funds(period.current_funds),
        sci(period.current_sci),
        sci(period.science_earned),
        funds(summary.advance_funds),
        funds(summary.reward_funds),
        funds(summary.failure_funds),
        funds(period.other_funds_earned),
        funds(period.launch_fees),
        funds(period.maintenance_fees),
        funds(period.tooling_fees),
        funds(period.entry_costs),
        funds(summary.construction_fees),
        funds(period.other_fees - summary.construction_fees),
        summary.launches.join(", "),
        summary.accepted_contracts.join(", "),
        summary.completed_contracts.join(", "),
        summary.techs.join(", "),
        summary.facilities.join(", "),
    ])
}

/// Write the header and one row per period to `writer`.
///
/// Returns the number of period rows written.
pub fn write_csv<W: Write>(records: &CareerRecords, writer: W) -> Result<usize, ExportError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(HEADER)?;
    let mut rows = 0_usize;
    for period in records.periods().iter() {
        writer.write_record(period_row(records, period)?)?;
        rows = rows.saturating_add(1);
    }
    writer.flush()?;
    Ok(rows)
}

/// Render the export as a string.
pub fn render_csv(records: &CareerRecords) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_csv(records, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Write the export to the file at `path`, replacing it if it exists.
pub fn export_to_file(records: &CareerRecords, path: &Path) -> Result<usize, ExportError> {
    let file = File::create(path)?;
    let rows = write_csv(records, file)?;
    info!(path = %path.display(), rows, "Career log exported to CSV");
    Ok(rows)
}
