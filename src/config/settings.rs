//! Raw webhook settings shared by the plugin parameters and the config file.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Webhook settings as written by the user.
///
/// The same shape is accepted from the pipeline's plugin parameters
/// (`vargs` JSON) and from the `[webhook]` table of a TOML config file.
/// Empty strings mean "not set"; defaults are applied later by
/// [`Configuration`](super::Configuration).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WebhookSettings {
    /// Target URLs, in delivery order
    pub urls: Vec<String>,

    /// Print full request and response details for every target
    pub debug: bool,

    /// Basic auth credentials
    pub auth: BasicAuth,

    /// Custom HTTP headers
    #[serde(alias = "headers")]
    pub header: BTreeMap<String, String>,

    /// HTTP method (default: POST)
    pub method: String,

    /// Handlebars payload template, inline or `file://` path
    pub template: String,

    /// Content-Type header (default: application/json)
    pub content_type: String,

    /// Request timeout in seconds (default: none)
    pub timeout: Option<u64>,

    /// Failure policy: "abort" or "continue"
    pub on_error: Option<String>,
}

/// Basic auth credentials.
///
/// The password is only used when the username is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BasicAuth {
    /// Username; empty disables basic auth
    pub username: String,
    /// Password; may be empty
    pub password: String,
}

impl BasicAuth {
    /// Creates credentials from a username and password.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the credentials if a username is configured.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        if self.username.is_empty() {
            None
        } else {
            Some((&self.username, &self.password))
        }
    }
}
