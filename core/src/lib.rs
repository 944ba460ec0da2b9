//! Minimal blocking client for the Front REST API.
//!
//! # Overview
//! Authenticates with a bearer token, sends a request for a relative API
//! path and verb, and decodes the JSON reply. Resources are not modelled:
//! every call is a path plus an arbitrary `serde_json::Value`.
//!
//! # Design
//! - `FrontClient` is stateless between calls and returns an `Outcome` per
//!   call holding the decoded body, the raw request/response and any error.
//! - `FrontApp` wraps a client and remembers the last `Outcome` for callers
//!   who prefer to inspect `success()` / `last_error()` after the fact.
//! - Network I/O sits behind the `Transport` trait; `UreqTransport` is the
//!   blocking implementation, tests swap in fakes.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod outcome;
pub mod query;
pub mod session;
pub mod transport;

pub use client::FrontClient;
pub use config::{ClientConfig, DEFAULT_ENDPOINT};
pub use error::{ApiError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use outcome::{Outcome, RequestRecord, ResponseRecord};
pub use session::FrontApp;
pub use transport::{Transport, UreqTransport};
