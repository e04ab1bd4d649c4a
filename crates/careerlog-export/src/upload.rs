//! Web export: send every record to the career log server in one PATCH.
//!
//! The document is serialised before the request is sent, so records are
//! only borrowed while it is built. There is no retry; the caller learns
//! the result through a `Result` or a success/failure callback pair.

use careerlog_core::{CareerRecords, ExportConfig};
use tracing::{debug, info, warn};

use crate::error::ExportError;
use crate::payload::build_payload;

/// Client for the career log server.
#[derive(Debug, Clone)]
pub struct WebExporter {
    client: reqwest::Client,
    server_url: String,
    token: String,
}

impl WebExporter {
    /// Create an exporter for `server_url` authenticated by `token`.
    pub fn new(server_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            server_url: server_url.into(),
            token: token.into(),
        }
    }

    /// Create an exporter from the export configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::NotConfigured`] if the server URL or token is
    /// empty.
    pub fn from_config(config: &ExportConfig) -> Result<Self, ExportError> {
        if config.server_url.trim().is_empty() {
            return Err(ExportError::NotConfigured {
                reason: "export.server_url is empty".to_owned(),
            });
        }
        if config.token.trim().is_empty() {
            return Err(ExportError::NotConfigured {
                reason: "export.token is empty".to_owned(),
            });
        }
        Ok(Self::new(config.server_url.clone(), config.token.clone()))
    }

    /// Request URL: the server URL without trailing slashes, then the
    /// token as the last path segment.
    pub fn endpoint(&self) -> String {
        format!("{}/{}", self.server_url.trim_end_matches('/'), self.token)
    }

    /// Upload every record, tagging periods with `career_uuid`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Request`] on transport failure and
    /// [`ExportError::Status`] if the server answers with a non-2xx status.
    pub async fn upload(
        &self,
        records: &CareerRecords,
        career_uuid: &str,
    ) -> Result<(), ExportError> {
        let body = serde_json::to_string(&build_payload(records, career_uuid)?)?;
        let url = self.endpoint();
        debug!(%url, payload = %body, "Sending career log");

        let response = self
            .client
            .patch(&url)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| ExportError::Request(format!("career log upload failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "unable to read response body".to_owned());
        if !status.is_success() {
            return Err(ExportError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        info!(%status, response = %text, "Career log uploaded");
        Ok(())
    }

    /// Upload every record and report the outcome through callbacks.
    ///
    /// `on_fail` receives the error text.
    pub async fn export<S, F>(
        &self,
        records: &CareerRecords,
        career_uuid: &str,
        on_success: S,
        on_fail: F,
    ) where
        S: FnOnce(),
        F: FnOnce(String),
    {
        match self.upload(records, career_uuid).await {
            Ok(()) => on_success(),
            Err(e) => {
                warn!(error = %e, "Career log upload failed");
                on_fail(e.to_string());
            }
        }
    }
}
