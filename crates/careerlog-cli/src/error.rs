//! Error types for the `careerlog` binary.

use std::path::PathBuf;

/// Failures specific to the command-line front end.
///
/// Library errors are wrapped so `main` can propagate everything with `?`.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: careerlog_core::ConfigError,
    },

    /// The save file could not be read.
    #[error("cannot read save file {}: {source}", path.display())]
    ReadSave {
        /// Path of the save file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The save file is not valid save tree text.
    #[error("save parse error: {source}")]
    Save {
        /// The underlying parse error.
        #[from]
        source: careerlog_core::SaveError,
    },

    /// The save file holds no career log data.
    #[error("no career log found in {}", path.display())]
    NoCareerLog {
        /// Path of the save file.
        path: PathBuf,
    },

    /// An exporter failed.
    #[error("export error: {source}")]
    Export {
        /// The underlying export error.
        #[from]
        source: careerlog_export::ExportError,
    },

    /// The server rejected the upload or could not be reached.
    #[error("upload failed: {message}")]
    UploadFailed {
        /// Error text reported by the web exporter.
        message: String,
    },
}
