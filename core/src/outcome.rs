//! The result of a single API call.
//!
//! # Design
//! Every call returns an `Outcome` that owns everything observable about the
//! exchange: what was sent, what came back, the decoded payload, and the
//! error if any. Nothing is kept on the client between calls.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::HttpMethod;

/// What was sent. `body` is empty for GET.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestRecord {
    pub method: HttpMethod,
    /// Relative API path as given by the caller.
    pub path: String,
    pub url: String,
    pub body: String,
    pub timeout: Duration,
    pub headers: Vec<(String, String)>,
}

/// What came back. All fields stay empty when the transport failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResponseRecord {
    pub status: Option<u16>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub(crate) successful: bool,
    pub(crate) error: Option<ApiError>,
    pub(crate) request: RequestRecord,
    pub(crate) response: ResponseRecord,
    pub(crate) body: Option<Value>,
    pub(crate) decode_error: Option<String>,
}

impl Outcome {
    /// True when a non-empty body arrived and did not describe an API error.
    /// A body that is not JSON still counts; see `decode_error`.
    pub fn success(&self) -> bool {
        self.successful
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    /// The error rendered as a message, e.g. `"401: Unauthorized"`.
    pub fn last_error(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// Decoded JSON payload. `None` is the failure sentinel: no body arrived
    /// or it was not JSON. A literal JSON `null` is `Some(Value::Null)`.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Why a non-empty body could not be decoded. Does not affect `success()`.
    pub fn decode_error(&self) -> Option<&str> {
        self.decode_error.as_deref()
    }

    pub fn into_body(self) -> Option<Value> {
        self.body
    }

    pub fn request(&self) -> &RequestRecord {
        &self.request
    }

    pub fn response(&self) -> &ResponseRecord {
        &self.response
    }

    /// Collapse into a `Result` for `?` propagation.
    ///
    /// An unsuccessful outcome without an error (empty body) is `Ok(None)`.
    pub fn into_result(self) -> Result<Option<Value>, ApiError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.body),
        }
    }
}
