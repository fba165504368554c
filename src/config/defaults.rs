//! Default values for configuration options.
//!
//! Centralized constants to avoid magic strings scattered across the codebase.

/// Default HTTP method for webhook requests.
pub const METHOD: &str = "POST";

/// Default `Content-Type` header for webhook requests.
pub const CONTENT_TYPE: &str = "application/json";

/// Default output path for the `init` subcommand.
pub const CONFIG_FILE: &str = "ci-webhook.toml";
