//! Sequential delivery of one payload to every configured target.

use std::fmt;

use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use url::Url;

use crate::config::Configuration;
use crate::payload::Payload;

use super::{Delivery, DeliveryError, HttpClient, HttpRequest, HttpResponse, Reporter, ResponseBody};

/// What to do when a target's request cannot be built or sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failure; remaining targets are not attempted.
    #[default]
    Abort,
    /// Record the failure and move on to the next target.
    Continue,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abort => f.write_str("abort"),
            Self::Continue => f.write_str("continue"),
        }
    }
}

/// Result of delivering to a single target.
#[derive(Debug)]
pub enum DeliveryOutcome {
    /// The server answered.
    ///
    /// `body` is `Some` only when it was read for reporting.
    Sent {
        /// Response status
        status: http::StatusCode,
        /// Response body, if read
        body: Option<Vec<u8>>,
    },
    /// The URL or request was invalid; nothing was sent.
    RequestBuildFailed(DeliveryError),
    /// The request could not be sent or no response arrived.
    TransportFailed(DeliveryError),
}

impl DeliveryOutcome {
    /// Returns true unless the target answered.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        !matches!(self, Self::Sent { .. })
    }

    fn from_error(error: DeliveryError) -> Self {
        if error.is_build_failure() {
            Self::RequestBuildFailed(error)
        } else {
            Self::TransportFailed(error)
        }
    }
}

/// Delivers a payload to a list of targets, one at a time, in order.
///
/// Method, content type, custom headers and credentials come from the
/// [`Configuration`] and are applied identically to every request.
#[derive(Debug)]
pub struct Dispatcher<'c, H> {
    client: H,
    config: &'c Configuration,
}

impl<'c, H: HttpClient> Dispatcher<'c, H> {
    /// Creates a dispatcher using the given client and configuration.
    #[must_use]
    pub const fn new(client: H, config: &'c Configuration) -> Self {
        Self { client, config }
    }

    /// Sends `payload` to each target in order.
    ///
    /// Each target gets its own copy of the payload bytes. A response is
    /// released before the next target is attempted.
    ///
    /// # Errors
    ///
    /// Under [`FailurePolicy::Abort`], returns the first [`DeliveryError`];
    /// targets after the failing one are not attempted. Under
    /// [`FailurePolicy::Continue`] this never fails and failures appear as
    /// outcomes instead.
    pub async fn dispatch<R: Reporter>(
        &self,
        targets: &[String],
        payload: &Payload,
        reporter: &mut R,
    ) -> Result<Vec<DeliveryOutcome>, DeliveryError> {
        let mut outcomes = Vec::with_capacity(targets.len());

        for (i, target) in targets.iter().enumerate() {
            let index = i + 1;

            match self.deliver(index, target, payload, reporter).await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => match self.config.failure_policy {
                    FailurePolicy::Abort => return Err(e),
                    FailurePolicy::Continue => {
                        tracing::error!("Webhook {index} failed: {e}");
                        outcomes.push(DeliveryOutcome::from_error(e));
                    }
                },
            }
        }

        Ok(outcomes)
    }

    async fn deliver<R: Reporter>(
        &self,
        index: usize,
        target: &str,
        payload: &Payload,
        reporter: &mut R,
    ) -> Result<DeliveryOutcome, DeliveryError> {
        let url = Url::parse(target).map_err(|e| DeliveryError::InvalidUrl {
            url: target.to_string(),
            source: e,
        })?;

        let request = self.build_request(url, payload)?;
        tracing::debug!("Sending webhook {index}: {} {}", request.method, request.url);

        let response = self
            .client
            .request(request.clone())
            .await
            .map_err(DeliveryError::Transport)?;
        let is_error = response.is_error();
        let HttpResponse { status, body, .. } = response;
        tracing::debug!("Webhook {index} responded {status}");

        if !self.config.debug && !is_error {
            // Unread body is dropped here, releasing the connection
            return Ok(DeliveryOutcome::Sent { status, body: None });
        }

        let body = body.read().await.unwrap_or_else(|e| {
            tracing::warn!("Error reading http response body for webhook {index}: {e}");
            Vec::new()
        });

        reporter.report(
            &Delivery {
                index,
                request: &request,
                status,
                body: &body,
            },
            self.config.debug,
        );

        Ok(DeliveryOutcome::Sent {
            status,
            body: Some(body),
        })
    }

    /// Builds the request for one target.
    fn build_request(&self, url: Url, payload: &Payload) -> Result<HttpRequest, DeliveryError> {
        let method = http::Method::from_bytes(self.config.method.as_bytes()).map_err(|e| {
            DeliveryError::RequestBuild(format!("invalid method '{}': {e}", self.config.method))
        })?;

        let mut request = HttpRequest::new(method, url).with_body(payload.to_body());

        request.set_header(
            CONTENT_TYPE,
            parse_header_value("Content-Type", &self.config.content_type)?,
        );

        // Custom headers win over the content type default
        for (name, value) in &self.config.headers {
            request.set_header(parse_header_name(name)?, parse_header_value(name, value)?);
        }

        if let Some((username, password)) = self.config.auth.credentials() {
            request
                .set_basic_auth(username, password)
                .map_err(|e| DeliveryError::RequestBuild(e.to_string()))?;
        }

        Ok(request)
    }
}

fn parse_header_name(name: &str) -> Result<HeaderName, DeliveryError> {
    name.parse::<HeaderName>()
        .map_err(|e| DeliveryError::RequestBuild(format!("invalid header name '{name}': {e}")))
}

fn parse_header_value(name: &str, value: &str) -> Result<HeaderValue, DeliveryError> {
    HeaderValue::from_str(value).map_err(|e| {
        DeliveryError::RequestBuild(format!("invalid header value for '{name}': {e}"))
    })
}
