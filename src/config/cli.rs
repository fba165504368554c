//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::context::InputSource;

/// ci-webhook: CI build notifications over HTTP
///
/// Reads the build metadata document from the CI server and delivers a
/// notification to every configured webhook URL, in order.
#[derive(Debug, Parser)]
#[command(name = "ci-webhook")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Plugin input document as inline JSON (read from stdin when omitted)
    #[arg(value_name = "PAYLOAD", conflicts_with = "input")]
    pub payload: Option<String>,

    /// Path to the plugin input document
    #[arg(long, short)]
    pub input: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Webhook URL (can be specified multiple times, replaces configured URLs)
    #[arg(long = "url", value_name = "URL")]
    pub urls: Vec<String>,

    /// HTTP method for webhook requests
    #[arg(long)]
    pub method: Option<String>,

    /// HTTP headers in 'Key=Value' or 'Key: Value' format (can be specified multiple times)
    #[arg(long = "header", value_name = "K=V")]
    pub headers: Vec<String>,

    /// Basic auth username
    #[arg(long)]
    pub username: Option<String>,

    /// Basic auth password
    #[arg(long)]
    pub password: Option<String>,

    /// Handlebars payload template (inline or file://path)
    #[arg(long)]
    pub template: Option<String>,

    /// Content-Type header for webhook requests
    #[arg(long = "content-type")]
    pub content_type: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Keep delivering to remaining URLs after a failed request
    #[arg(long = "continue-on-error")]
    pub continue_on_error: bool,

    /// Print request and response details for every webhook
    #[arg(long)]
    pub debug: bool,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Subcommands for ci-webhook
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = super::defaults::CONFIG_FILE)]
        output: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }

    /// Returns where the plugin input document should be read from.
    #[must_use]
    pub fn input_source(&self) -> InputSource {
        if let Some(ref json) = self.payload {
            InputSource::Inline(json.clone())
        } else if let Some(ref path) = self.input {
            InputSource::File(path.clone())
        } else {
            InputSource::Stdin
        }
    }
}
