//! Per-target delivery reporting.

use std::io::Write;

use super::{HttpRequest, is_error_status};

/// A completed request and the response it received.
#[derive(Debug, Clone, Copy)]
pub struct Delivery<'a> {
    /// 1-based position of the target in the configured list
    pub index: usize,
    /// The request exactly as sent
    pub request: &'a HttpRequest,
    /// Response status
    pub status: http::StatusCode,
    /// Response body; empty when it was not read or could not be read
    pub body: &'a [u8],
}

impl Delivery<'_> {
    /// Returns true if the response status is 400 or above.
    #[must_use]
    pub fn is_error(&self) -> bool {
        is_error_status(self.status)
    }
}

/// Receives the outcome of each delivered request.
pub trait Reporter {
    /// Reports one delivery.
    ///
    /// With `debug` set every delivery is reported in full; otherwise
    /// only error responses are reported.
    fn report(&mut self, delivery: &Delivery<'_>, debug: bool);
}

/// Formats the record for a delivery, or `None` if nothing should be shown.
///
/// Records are for people, not parsers: headers use the `Debug` form of
/// the header map and the status shows the standard reason phrase for
/// its code rather than the one the server sent.
#[must_use]
pub fn format_record(delivery: &Delivery<'_>, debug: bool) -> Option<String> {
    let request = delivery.request;
    let response_body = String::from_utf8_lossy(delivery.body);

    if debug {
        Some(format!(
            "[debug] Webhook {}\n  URL: {}\n  METHOD: {}\n  HEADERS: {:?}\n  REQUEST BODY: {}\n  RESPONSE STATUS: {}\n  RESPONSE BODY: {}\n",
            delivery.index,
            request.url,
            request.method,
            request.headers,
            request.body_text(),
            delivery.status,
            response_body,
        ))
    } else if delivery.is_error() {
        Some(format!(
            "[info] Webhook {}\n  URL: {}\n  RESPONSE STATUS: {}\n  RESPONSE BODY: {}\n",
            delivery.index, request.url, delivery.status, response_body,
        ))
    } else {
        None
    }
}

/// Reporter that writes line-formatted records to any [`Write`] sink.
///
/// Production uses standard output. Write failures are logged and
/// otherwise ignored.
#[derive(Debug)]
pub struct WriterReporter<W> {
    out: W,
}

impl WriterReporter<std::io::Stdout> {
    /// Creates a reporter writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> WriterReporter<W> {
    /// Creates a reporter writing to the given sink.
    #[must_use]
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Consumes the reporter, returning the sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for WriterReporter<W> {
    fn report(&mut self, delivery: &Delivery<'_>, debug: bool) {
        let Some(record) = format_record(delivery, debug) else {
            return;
        };

        if let Err(e) = self
            .out
            .write_all(record.as_bytes())
            .and_then(|()| self.out.flush())
        {
            tracing::warn!("Failed to write report for webhook {}: {e}", delivery.index);
        }
    }
}
