//! Validated configuration after merging all sources.
//!
//! This module contains the final configuration that is used by the
//! dispatcher. Defaults are applied exactly once, during construction.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::webhook::FailurePolicy;

use super::cli::Cli;
use super::defaults;
use super::error::ConfigError;
use super::settings::{BasicAuth, WebhookSettings};
use super::toml::TomlConfig;

/// Fully resolved configuration ready for use by the application.
///
/// URL, method and header strings are kept verbatim: they are parsed per
/// request so that a bad value is reported at the delivery stage where
/// it is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// Target URLs, in delivery order
    pub targets: Vec<String>,

    /// Verbose request/response reporting
    pub debug: bool,

    /// Basic auth credentials
    pub auth: BasicAuth,

    /// Custom headers, applied after `Content-Type`
    pub headers: BTreeMap<String, String>,

    /// HTTP method
    pub method: String,

    /// Payload template source (inline or `file://` path)
    pub template: Option<String>,

    /// `Content-Type` header value
    pub content_type: String,

    /// Per-request timeout
    pub timeout: Option<Duration>,

    /// Behaviour when a request cannot be built or sent
    pub failure_policy: FailurePolicy,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            debug: false,
            auth: BasicAuth::default(),
            headers: BTreeMap::new(),
            method: defaults::METHOD.to_string(),
            template: None,
            content_type: defaults::CONTENT_TYPE.to_string(),
            timeout: None,
            failure_policy: FailurePolicy::default(),
            verbose: false,
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let timeout_str = self
            .timeout
            .map_or_else(|| "none".to_string(), |t| format!("{}s", t.as_secs()));

        write!(
            f,
            "Config {{ targets: {}, method: {}, content_type: {}, template: {}, headers: {}, \
             basic_auth: {}, timeout: {}, on_error: {}, debug: {} }}",
            self.targets.len(),
            self.method,
            self.content_type,
            self.template.is_some(),
            self.headers.len(),
            self.auth.credentials().is_some(),
            timeout_str,
            self.failure_policy,
            self.debug,
        )
    }
}

impl Configuration {
    /// Creates a configuration from CLI arguments, an optional TOML config
    /// and the plugin parameters supplied by the CI server.
    ///
    /// Priority (highest first): CLI, plugin parameters, TOML, defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A CLI header is not in `Key=Value` or `Key: Value` form
    /// - The failure policy name is unknown
    /// - The timeout is zero
    pub fn from_raw(
        cli: &Cli,
        toml: Option<&TomlConfig>,
        vargs: &WebhookSettings,
    ) -> Result<Self, ConfigError> {
        let file = toml.map(|t| &t.webhook);
        // Lowest priority first
        let layers: Vec<&WebhookSettings> = file.into_iter().chain([vargs]).collect();

        let targets = Self::resolve_targets(cli, &layers);
        let headers = Self::resolve_headers(cli, &layers)?;
        let auth = Self::resolve_auth(cli, &layers);

        let method = pick(cli.method.as_deref(), &layers, |s| &s.method)
            .unwrap_or(defaults::METHOD)
            .to_string();
        let content_type = pick(cli.content_type.as_deref(), &layers, |s| &s.content_type)
            .unwrap_or(defaults::CONTENT_TYPE)
            .to_string();
        let template = pick(cli.template.as_deref(), &layers, |s| &s.template).map(String::from);

        let timeout = Self::resolve_timeout(cli, &layers)?;
        let failure_policy = Self::resolve_failure_policy(cli, &layers)?;

        // Flags only enable
        let debug = cli.debug || layers.iter().any(|s| s.debug);

        Ok(Self {
            targets,
            debug,
            auth,
            headers,
            method,
            template,
            content_type,
            timeout,
            failure_policy,
            verbose: cli.verbose,
        })
    }

    /// Loads the optional config file named by the CLI and merges it.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli, vargs: &WebhookSettings) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref(), vargs)
    }

    fn resolve_targets(cli: &Cli, layers: &[&WebhookSettings]) -> Vec<String> {
        // The highest layer with any URLs replaces all lower ones
        if !cli.urls.is_empty() {
            return cli.urls.clone();
        }

        layers
            .iter()
            .rev()
            .find(|s| !s.urls.is_empty())
            .map(|s| s.urls.clone())
            .unwrap_or_default()
    }

    fn resolve_headers(
        cli: &Cli,
        layers: &[&WebhookSettings],
    ) -> Result<BTreeMap<String, String>, ConfigError> {
        let mut headers = BTreeMap::new();

        for layer in layers {
            for (name, value) in &layer.header {
                headers.insert(name.clone(), value.clone());
            }
        }

        for header_str in &cli.headers {
            let (name, value) = parse_header_string(header_str)?;
            headers.insert(name, value);
        }

        Ok(headers)
    }

    fn resolve_auth(cli: &Cli, layers: &[&WebhookSettings]) -> BasicAuth {
        if let Some(ref username) = cli.username {
            return BasicAuth::new(username.clone(), cli.password.clone().unwrap_or_default());
        }

        let mut auth = layers
            .iter()
            .rev()
            .find(|s| !s.auth.username.is_empty())
            .map(|s| s.auth.clone())
            .unwrap_or_default();

        // A CLI password applies to whichever username won
        if let Some(ref password) = cli.password {
            auth.password.clone_from(password);
        }

        auth
    }

    fn resolve_timeout(
        cli: &Cli,
        layers: &[&WebhookSettings],
    ) -> Result<Option<Duration>, ConfigError> {
        let seconds = cli
            .timeout
            .or_else(|| layers.iter().rev().find_map(|s| s.timeout));

        match seconds {
            Some(0) => Err(ConfigError::InvalidTimeout {
                reason: "must be greater than 0".to_string(),
            }),
            Some(secs) => Ok(Some(Duration::from_secs(secs))),
            None => Ok(None),
        }
    }

    fn resolve_failure_policy(
        cli: &Cli,
        layers: &[&WebhookSettings],
    ) -> Result<FailurePolicy, ConfigError> {
        if cli.continue_on_error {
            return Ok(FailurePolicy::Continue);
        }

        layers
            .iter()
            .rev()
            .find_map(|s| s.on_error.as_deref())
            .map_or(Ok(FailurePolicy::default()), parse_failure_policy)
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

/// Returns the highest-priority non-empty value for a string setting.
fn pick<'a>(
    cli: Option<&'a str>,
    layers: &[&'a WebhookSettings],
    field: impl Fn(&'a WebhookSettings) -> &'a String,
) -> Option<&'a str> {
    cli.filter(|s| !s.is_empty()).or_else(|| {
        layers
            .iter()
            .rev()
            .map(|&s| field(s).as_str())
            .find(|s| !s.is_empty())
    })
}

fn parse_header_string(s: &str) -> Result<(String, String), ConfigError> {
    // Try "Key=Value" format first
    if let Some((name, value)) = s.split_once('=') {
        return Ok((name.trim().to_string(), value.trim().to_string()));
    }

    // Try "Key: Value" format
    if let Some((name, value)) = s.split_once(':') {
        return Ok((name.trim().to_string(), value.trim().to_string()));
    }

    Err(ConfigError::InvalidHeader {
        value: s.to_string(),
    })
}

fn parse_failure_policy(s: &str) -> Result<FailurePolicy, ConfigError> {
    match s.to_lowercase().as_str() {
        "abort" | "" => Ok(FailurePolicy::Abort),
        "continue" => Ok(FailurePolicy::Continue),
        _ => Err(ConfigError::InvalidFailurePolicy {
            value: s.to_string(),
        }),
    }
}
