//! Build metadata supplied by the CI environment.
//!
//! The CI server hands the plugin a single JSON document with `system`,
//! `repo` and `build` blocks plus the plugin parameters under `vargs`.
//! The metadata blocks are passed through untouched: field order and
//! values are preserved exactly as received.

use std::io::Read;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::WebhookSettings;

/// An opaque, ordered bag of metadata fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(serde_json::Map<String, serde_json::Value>);

impl Metadata {
    /// Creates metadata from an existing JSON object.
    #[must_use]
    pub const fn new(fields: serde_json::Map<String, serde_json::Value>) -> Self {
        Self(fields)
    }

    /// Returns the value of a top-level field, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// Returns true if no fields are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// System, repository and build metadata for a single CI run.
///
/// Read-only once constructed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildContext {
    /// CI server information
    pub system: Metadata,
    /// Repository information
    pub repo: Metadata,
    /// Build information
    pub build: Metadata,
}

/// The full document handed to the plugin by the CI server.
#[derive(Debug, Default, Deserialize)]
pub struct PluginInput {
    #[serde(default)]
    system: Metadata,
    #[serde(default)]
    repo: Metadata,
    #[serde(default)]
    build: Metadata,
    /// Plugin parameters from the pipeline definition
    #[serde(default)]
    pub vargs: WebhookSettings,
}

/// Where the plugin document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// JSON passed directly on the command line
    Inline(String),
    /// JSON file on disk
    File(PathBuf),
    /// Standard input
    Stdin,
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inline(_) => f.write_str("command line"),
            Self::File(path) => write!(f, "'{}'", path.display()),
            Self::Stdin => f.write_str("stdin"),
        }
    }
}

/// Error loading the plugin document.
#[derive(Debug, Error)]
pub enum InputError {
    /// The document could not be read.
    #[error("Failed to read plugin input from {source_name}: {source}")]
    Read {
        /// Human-readable name of the input source
        source_name: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or has the wrong shape.
    #[error("Failed to parse plugin input from {source_name}: {source}")]
    Parse {
        /// Human-readable name of the input source
        source_name: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },
}

impl PluginInput {
    /// Parses a plugin document from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::Parse`] if the JSON is malformed or a block
    /// is not an object.
    pub fn parse(content: &str) -> Result<Self, InputError> {
        Self::parse_from(content, &InputSource::Inline(String::new()))
    }

    /// Reads and parses the plugin document from the given source.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or parsed.
    pub fn load(source: &InputSource) -> Result<Self, InputError> {
        let content = match source {
            InputSource::Inline(json) => return Self::parse_from(json, source),
            InputSource::File(path) => std::fs::read_to_string(path),
            InputSource::Stdin => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf).map(|_| buf)
            }
        }
        .map_err(|e| InputError::Read {
            source_name: source.to_string(),
            source: e,
        })?;

        Self::parse_from(&content, source)
    }

    fn parse_from(content: &str, source: &InputSource) -> Result<Self, InputError> {
        serde_json::from_str(content).map_err(|e| InputError::Parse {
            source_name: source.to_string(),
            source: e,
        })
    }

    /// Splits the document into build metadata and plugin parameters.
    #[must_use]
    pub fn into_parts(self) -> (BuildContext, WebhookSettings) {
        let context = BuildContext {
            system: self.system,
            repo: self.repo,
            build: self.build,
        };
        (context, self.vargs)
    }
}
