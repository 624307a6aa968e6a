//! Error types for analysis submissions.

use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for analysis submissions.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error type for analysis submissions.
#[derive(Debug, Error)]
pub enum Error {
    /// The pipeline has no nodes; nothing was sent.
    #[error("add at least one node to the pipeline before submitting it")]
    EmptyPipeline,

    /// The analyzer URL cannot address the parse endpoint.
    #[error("invalid analyzer url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The service could not be reached or did not answer in time.
    #[error("analysis service is unreachable: {0}")]
    Transport(#[source] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("analysis service answered {status}: {body}")]
    Status {
        /// Response status code.
        status: StatusCode,
        /// Response body, as text.
        body: String,
    },

    /// The service answered, but not with an analysis report.
    #[error("analysis service returned an invalid report: {0}")]
    Decode(#[source] serde_json::Error),
}

impl Error {
    /// Returns whether the service could not be reached at all.
    ///
    /// Such failures leave the pipeline untouched and may be retried by
    /// submitting again.
    #[inline]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns whether the service rejected the submitted document.
    #[inline]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Status { status, .. } if status.is_client_error())
    }
}
