//! Payload construction.
//!
//! The payload is computed once per run and sent verbatim to every target.
//! By default it is the build metadata encoded as JSON; a Handlebars
//! template may be supplied instead.
//!
//! # Template Variables
//!
//! Templates are rendered in strict mode against:
//! - `Build`: build metadata (`{{Build.number}}`, `{{Build.status}}`, ...)
//! - `Repo`: repository metadata (`{{Repo.full_name}}`, ...)
//! - `System`: CI server metadata (`{{System.link_url}}`, ...)
//!
//! Referencing a field that does not exist is an error.
//!
//! # Helpers
//!
//! - `uppercase`, `lowercase`, `uppercasefirst`: change case of a string
//! - `truncate s n`: first `n` characters of `s`
//! - `urlencode s`: query-string escaping
//! - `duration start end`: elapsed time between two Unix timestamps, e.g. `3m30s`

use std::path::PathBuf;

use handlebars::{Handlebars, handlebars_helper};
use serde::Serialize;
use thiserror::Error;

use crate::context::{BuildContext, Metadata};

/// Prefix marking a template source as a file reference.
const FILE_SCHEME: &str = "file://";

/// Error building the payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// The default JSON encoding failed.
    #[error("encoding json payload: {0}")]
    Encode(#[from] serde_json::Error),

    /// The template is malformed or references an undefined field.
    #[error("executing content template: {0}")]
    Template(String),

    /// A `file://` template could not be read.
    #[error("executing content template: failed to read '{}': {source}", path.display())]
    TemplateFile {
        /// Path of the template file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// The request body sent to every target.
///
/// Immutable once built; each request gets its own copy of the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload(Vec<u8>);

impl Payload {
    /// Wraps pre-encoded bytes.
    #[must_use]
    pub const fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Returns the payload bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns a fresh copy of the bytes for a single request body.
    #[must_use]
    pub fn to_body(&self) -> Vec<u8> {
        self.0.clone()
    }

    /// Returns the payload length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// How the payload body is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Renderer {
    /// Compact JSON of `system`, `repo` and `build`
    Structured,
    /// Handlebars template source (inline text or `file://` path)
    Template(String),
}

/// Builds the payload from build metadata.
///
/// The renderer is selected once, when the builder is created.
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    renderer: Renderer,
}

/// Default encoding: fields in declaration order.
#[derive(Serialize)]
struct StructuredData<'a> {
    system: &'a Metadata,
    repo: &'a Metadata,
    build: &'a Metadata,
}

/// Variables exposed to templates.
#[derive(Serialize)]
struct TemplateData<'a> {
    #[serde(rename = "Build")]
    build: &'a Metadata,
    #[serde(rename = "Repo")]
    repo: &'a Metadata,
    #[serde(rename = "System")]
    system: &'a Metadata,
}

impl PayloadBuilder {
    /// Selects the template renderer if a non-empty template is given,
    /// the structured encoder otherwise.
    #[must_use]
    pub fn from_template(template: Option<&str>) -> Self {
        let renderer = match template {
            Some(source) if !source.is_empty() => Renderer::Template(source.to_string()),
            _ => Renderer::Structured,
        };
        Self { renderer }
    }

    /// Returns the selected renderer.
    #[must_use]
    pub const fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Builds the payload for the given build.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError`] if encoding fails, the template file
    /// cannot be read, or the template cannot be rendered.
    pub fn build(&self, context: &BuildContext) -> Result<Payload, PayloadError> {
        match &self.renderer {
            Renderer::Structured => encode_structured(context),
            Renderer::Template(source) => render_template(source, context),
        }
    }
}

fn encode_structured(context: &BuildContext) -> Result<Payload, PayloadError> {
    let data = StructuredData {
        system: &context.system,
        repo: &context.repo,
        build: &context.build,
    };

    let mut bytes = serde_json::to_vec(&data)?;
    bytes.push(b'\n');
    Ok(Payload(bytes))
}

fn render_template(source: &str, context: &BuildContext) -> Result<Payload, PayloadError> {
    let template = load_template(source)?;

    let data = TemplateData {
        build: &context.build,
        repo: &context.repo,
        system: &context.system,
    };

    let rendered = registry()
        .render_template(&template, &data)
        .map_err(|e| PayloadError::Template(e.to_string()))?;

    Ok(Payload(rendered.into_bytes()))
}

fn load_template(source: &str) -> Result<String, PayloadError> {
    let Some(path) = source.strip_prefix(FILE_SCHEME) else {
        return Ok(source.to_string());
    };

    let path = PathBuf::from(path);
    std::fs::read_to_string(&path).map_err(|e| PayloadError::TemplateFile { path, source: e })
}

handlebars_helper!(uppercase: |s: str| s.to_uppercase());
handlebars_helper!(lowercase: |s: str| s.to_lowercase());
handlebars_helper!(uppercasefirst: |s: str| {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect::<String>()
    })
});
handlebars_helper!(truncate: |s: str, len: u64| {
    s.chars().take(usize::try_from(len).unwrap_or(usize::MAX)).collect::<String>()
});
handlebars_helper!(urlencode: |s: str| {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect::<String>()
});
handlebars_helper!(duration: |started: i64, finished: i64| format_duration(finished.saturating_sub(started)));

fn registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();
    hbs.set_strict_mode(true);
    hbs.register_helper("uppercase", Box::new(uppercase));
    hbs.register_helper("lowercase", Box::new(lowercase));
    hbs.register_helper("uppercasefirst", Box::new(uppercasefirst));
    hbs.register_helper("truncate", Box::new(truncate));
    hbs.register_helper("urlencode", Box::new(urlencode));
    hbs.register_helper("duration", Box::new(duration));
    hbs
}

/// Formats a number of seconds as `1h2m3s`, omitting leading zero units.
fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let (hours, minutes, secs) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);

    if hours > 0 {
        format!("{hours}h{minutes}m{secs}s")
    } else if minutes > 0 {
        format!("{minutes}m{secs}s")
    } else {
        format!("{secs}s")
    }
}

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;
