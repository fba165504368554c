//! Webhook layer for delivering the payload to external services.
//!
//! This module provides types and traits for:
//! - Building HTTP requests ([`HttpRequest`])
//! - Handling HTTP responses with lazily read bodies ([`HttpResponse`], [`ResponseBody`])
//! - Abstracting HTTP clients ([`HttpClient`])
//! - Production HTTP client implementation ([`ReqwestClient`])
//! - Sequential multi-target delivery ([`Dispatcher`], [`FailurePolicy`])
//! - Per-target outcome reporting ([`Reporter`], [`WriterReporter`])

mod client;
mod dispatcher;
mod error;
mod http;
mod report;

#[cfg(test)]
mod http_tests;

pub use client::{ReqwestBody, ReqwestClient};
pub use dispatcher::{DeliveryOutcome, Dispatcher, FailurePolicy};
pub use error::{DeliveryError, HttpError};
pub use http::{HttpClient, HttpRequest, HttpResponse, ResponseBody, is_error_status};
pub use report::{Delivery, Reporter, WriterReporter, format_record};
