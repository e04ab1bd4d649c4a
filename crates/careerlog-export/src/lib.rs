//! Exporters for career log records.
//!
//! Two destinations are supported:
//!
//! - [`csv_export`] -- One CSV row per period, written to a file or a string
//! - [`upload`] -- One JSON document sent to the career log server with an
//!   HTTP `PATCH`
//!
//! Both read a [`CareerRecords`](careerlog_core::CareerRecords) and never
//! modify it. [`payload`] builds the JSON document shared by the web
//! exporter and anything else that wants the upload shape.

pub mod csv_export;
pub mod error;
pub mod payload;
pub mod upload;

pub use csv_export::{export_to_file, period_row, render_csv, write_csv, HEADER};
pub use error::ExportError;
pub use payload::{build_payload, period_dto};
pub use upload::WebExporter;
