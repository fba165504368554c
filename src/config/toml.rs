//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::{ConfigError, WebhookSettings};

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with plugin parameters and CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Webhook configuration section
    #[serde(default)]
    pub webhook: WebhookSettings,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# ci-webhook Configuration File
#
# Values here are overridden by the plugin parameters (vargs) supplied by
# the CI server, which are in turn overridden by command-line flags.

[webhook]
# Webhook URLs, delivered to in order
# urls = ["https://hooks.example.com/build"]

# HTTP method (default: POST)
# method = "POST"

# Content-Type header (default: application/json)
# content_type = "application/json"

# Handlebars payload template, inline or "file:///path/to/template.hbs".
# Available variables: {{Build.*}}, {{Repo.*}}, {{System.*}}
# Helpers: uppercase, lowercase, uppercasefirst, truncate, urlencode, duration
# When unset, the payload is the build metadata encoded as JSON.
# template = '{"text": "{{Repo.full_name}} build #{{Build.number}} {{Build.status}}"}'

# Print full request and response details for every webhook
# debug = false

# Request timeout in seconds (default: no timeout)
# timeout = 30

# What to do when a request cannot be built or sent: "abort" or "continue"
# on_error = "abort"

# Basic auth credentials (sent only when username is set)
# [webhook.auth]
# username = "ci"
# password = "secret"

# HTTP headers
# [webhook.header]
# X-Custom-Header = "value"
"#
    .to_string()
}
