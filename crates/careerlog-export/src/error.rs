//! Error types for the exporters.

use careerlog_types::TimeError;

/// Errors that can occur while exporting career records.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// A timestamp could not be formatted as a date.
    #[error("time error: {source}")]
    Time {
        /// The underlying conversion error.
        #[from]
        source: TimeError,
    },

    /// Writing a CSV record failed.
    #[error("CSV error: {source}")]
    Csv {
        /// The underlying CSV error.
        #[from]
        source: csv::Error,
    },

    /// Reading or writing a file failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Rendered CSV was not valid UTF-8.
    #[error("encoding error: {source}")]
    Encoding {
        /// The underlying conversion error.
        #[from]
        source: std::string::FromUtf8Error,
    },

    /// Serialising the upload document failed.
    #[error("JSON error: {source}")]
    Json {
        /// The underlying serialisation error.
        #[from]
        source: serde_json::Error,
    },

    /// The exporter is missing a required setting.
    #[error("export not configured: {reason}")]
    NotConfigured {
        /// Which setting is missing.
        reason: String,
    },

    /// The HTTP request could not be sent or its response not read.
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, or a placeholder if it could not be read.
        body: String,
    },
}
