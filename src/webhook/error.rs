//! Error types for HTTP operations and webhook delivery.

use thiserror::Error;

/// Error type for HTTP operations.
///
/// Describes what went wrong at the transport level.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// and streams that break while the body is being read.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    ///
    /// The server did not respond within the configured timeout period.
    #[error("Request timed out")]
    Timeout,

    /// The request could not be assembled by the client.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// A failed delivery to a single target.
///
/// Each variant names the stage that failed.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The target URL could not be parsed.
    #[error("parsing hook url '{url}': {source}")]
    InvalidUrl {
        /// The raw target string
        url: String,
        /// Underlying parse error
        #[source]
        source: url::ParseError,
    },

    /// The request could not be constructed (bad method, header or credentials).
    #[error("creating http request: {0}")]
    RequestBuild(String),

    /// The request was built but could not be sent.
    #[error("executing http request: {0}")]
    Transport(#[source] HttpError),
}

impl DeliveryError {
    /// Returns true if the request never left the process.
    #[must_use]
    pub const fn is_build_failure(&self) -> bool {
        matches!(self, Self::InvalidUrl { .. } | Self::RequestBuild(_))
    }
}
