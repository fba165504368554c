//! ci-webhook: CI build notifications over HTTP
//!
//! A library for building a notification payload from CI build metadata
//! and delivering it to one or more webhook endpoints.

pub mod config;
pub mod context;
pub mod payload;
pub mod webhook;
