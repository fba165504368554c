//! Configuration layer for ci-webhook.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Raw settings shared with the plugin parameters ([`WebhookSettings`])
//! - Resolved configuration ([`Configuration`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **Plugin parameters** - The `vargs` block of the CI-provided document
//! 3. **TOML config file** - Values from the configuration file
//! 4. **Built-in defaults** - `POST` and `application/json`
//!
//! An empty string counts as "not set" at every layer, so an empty method
//! or content type always falls through to the default.
//!
//! URL lists use "replace" semantics: the highest layer that lists any URLs
//! wins outright. Header maps are merged key by key, higher layers winning.
//!
//! # Boolean Flag Semantics
//!
//! `debug` and `--continue-on-error` use OR semantics: once enabled in any
//! layer, a higher layer cannot disable them.

mod cli;
pub mod defaults;
mod error;
mod settings;
mod toml;
mod validated;

#[cfg(test)]
mod cli_tests;

pub use cli::{Cli, Command};
pub use error::ConfigError;
pub use settings::{BasicAuth, WebhookSettings};
pub use toml::{TomlConfig, default_config_template};
pub use validated::{Configuration, write_default_config};
