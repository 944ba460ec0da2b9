//! Request builder, dispatcher and response classifier for the Front API.
//!
//! # Design
//! `FrontClient` carries only its configuration and a `Transport`; it keeps
//! no mutable state between calls, so one instance can be shared freely.
//! Each call is split the same way every time:
//!
//! 1. `build_request` turns verb + path + arguments into an `HttpRequest`
//!    (query string for GET, JSON body otherwise).
//! 2. The transport executes it.
//! 3. `parse_response` classifies whatever came back into an `Outcome`.
//!
//! All five verbs funnel through `request`, and every resource is treated
//! the same: an opaque path plus an opaque JSON payload.

use std::fmt;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, instrument, warn};
use ureq::http::Uri;

use crate::config::ClientConfig;
use crate::error::{ApiError, TransportError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::outcome::{Outcome, RequestRecord, ResponseRecord};
use crate::query::build_query;
use crate::transport::{Transport, UreqTransport};

const REDACTED_AUTHORIZATION: &str = "Bearer [redacted]";

/// Blocking client for the Front REST API.
pub struct FrontClient<T = UreqTransport> {
    api_key: String,
    endpoint: String,
    verify_ssl: bool,
    timeout: Duration,
    user_agent: String,
    transport: T,
}

impl FrontClient<UreqTransport> {
    /// Client for the default endpoint using the ureq transport.
    pub fn new(api_key: &str) -> Result<Self, ApiError> {
        Self::with_transport(api_key, UreqTransport::new())
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::from_config_with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> FrontClient<T> {
    pub fn with_transport(api_key: &str, transport: T) -> Result<Self, ApiError> {
        Self::from_config_with_transport(&ClientConfig::new(api_key), transport)
    }

    pub fn from_config_with_transport(config: &ClientConfig, transport: T) -> Result<Self, ApiError> {
        if config.api_key.trim().is_empty() {
            return Err(ApiError::MissingApiKey);
        }
        let endpoint = normalize_endpoint(&config.endpoint)?;
        if !config.verify_ssl {
            warn!(%endpoint, "TLS certificate verification is disabled");
        }
        Ok(Self {
            api_key: config.api_key.clone(),
            endpoint,
            verify_ssl: config.verify_ssl,
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
            transport,
        })
    }

    /// Point the client at a different base URL (a proxy or a test server).
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self, ApiError> {
        self.endpoint = normalize_endpoint(endpoint)?;
        Ok(self)
    }

    /// Default timeout for the verb helpers.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn verify_ssl(&self) -> bool {
        self.verify_ssl
    }

    /// Turning verification off lets anyone on the path read the bearer token.
    pub fn set_verify_ssl(&mut self, verify: bool) {
        if !verify {
            warn!(endpoint = %self.endpoint, "TLS certificate verification is disabled");
        }
        self.verify_ssl = verify;
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn get(&self, path: &str, args: Option<&Value>) -> Outcome {
        self.request(HttpMethod::Get, path, args, None)
    }

    pub fn post(&self, path: &str, args: Option<&Value>) -> Outcome {
        self.request(HttpMethod::Post, path, args, None)
    }

    pub fn put(&self, path: &str, args: Option<&Value>) -> Outcome {
        self.request(HttpMethod::Put, path, args, None)
    }

    pub fn patch(&self, path: &str, args: Option<&Value>) -> Outcome {
        self.request(HttpMethod::Patch, path, args, None)
    }

    pub fn delete(&self, path: &str, args: Option<&Value>) -> Outcome {
        self.request(HttpMethod::Delete, path, args, None)
    }

    pub fn get_with_timeout(&self, path: &str, args: Option<&Value>, timeout: Duration) -> Outcome {
        self.request(HttpMethod::Get, path, args, Some(timeout))
    }

    pub fn post_with_timeout(&self, path: &str, args: Option<&Value>, timeout: Duration) -> Outcome {
        self.request(HttpMethod::Post, path, args, Some(timeout))
    }

    pub fn put_with_timeout(&self, path: &str, args: Option<&Value>, timeout: Duration) -> Outcome {
        self.request(HttpMethod::Put, path, args, Some(timeout))
    }

    pub fn patch_with_timeout(&self, path: &str, args: Option<&Value>, timeout: Duration) -> Outcome {
        self.request(HttpMethod::Patch, path, args, Some(timeout))
    }

    pub fn delete_with_timeout(&self, path: &str, args: Option<&Value>, timeout: Duration) -> Outcome {
        self.request(HttpMethod::Delete, path, args, Some(timeout))
    }

    /// Perform one call. `timeout` falls back to the client default.
    #[instrument(level = "debug", skip(self, args))]
    pub fn request(
        &self,
        method: HttpMethod,
        path: &str,
        args: Option<&Value>,
        timeout: Option<Duration>,
    ) -> Outcome {
        let timeout = timeout.unwrap_or(self.timeout);
        let request = match self.build_request(method, path, args, timeout) {
            Ok(request) => request,
            Err(err) => {
                warn!(error = %err, "could not build request");
                return Outcome {
                    successful: false,
                    error: Some(err),
                    request: RequestRecord {
                        method,
                        path: path.to_string(),
                        url: self.url_for(path),
                        body: String::new(),
                        timeout,
                        headers: redact(self.headers()),
                    },
                    response: ResponseRecord::default(),
                    body: None,
                    decode_error: None,
                };
            }
        };

        let result = self.transport.execute(&request);
        let outcome = self.parse_response(record_request(path, request), result);
        debug!(success = outcome.success(), "request settled");
        outcome
    }

    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        args: Option<&Value>,
        timeout: Duration,
    ) -> Result<HttpRequest, ApiError> {
        let mut url = self.url_for(path);
        let body = if method.sends_body() {
            let encoded = match args {
                Some(args) => serde_json::to_string(args)
                    .map_err(|e| ApiError::Serialization(e.to_string()))?,
                None => "{}".to_string(),
            };
            Some(encoded)
        } else {
            let query = args.map(build_query).unwrap_or_default();
            if !query.is_empty() {
                url.push(if url.contains('?') { '&' } else { '?' });
                url.push_str(&query);
            }
            None
        };

        Ok(HttpRequest {
            method,
            url,
            headers: self.headers(),
            body,
            timeout,
            verify_ssl: self.verify_ssl,
        })
    }

    /// Classify a transport result.
    ///
    /// - no response: transport error, nothing decoded
    /// - empty body: failure sentinel, no error
    /// - payload with `status` != 200 and a `detail`: API error, payload kept
    /// - anything else: success, including a body that is not JSON (which
    ///   yields the sentinel and a `decode_error`)
    pub fn parse_response(
        &self,
        request: RequestRecord,
        result: Result<HttpResponse, TransportError>,
    ) -> Outcome {
        let response = match result {
            Ok(response) => response,
            Err(err) => {
                return Outcome {
                    successful: false,
                    error: Some(err.into()),
                    request,
                    response: ResponseRecord::default(),
                    body: None,
                    decode_error: None,
                };
            }
        };

        let Classified {
            successful,
            error,
            body,
            decode_error,
        } = classify(&response.body);
        if let Some(reason) = &decode_error {
            debug!(status = response.status, %reason, "response body is not JSON");
        }
        if let Some(err) = &error {
            warn!(status = response.status, error = %err, "request failed");
        }

        Outcome {
            successful,
            error,
            request,
            response: ResponseRecord {
                status: Some(response.status),
                headers: response.headers,
                body: Some(response.body),
            },
            body,
            decode_error,
        }
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path)
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("Accept".to_string(), "application/json".to_string()),
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Authorization".to_string(), format!("Bearer {}", self.api_key)),
            ("User-Agent".to_string(), self.user_agent.clone()),
        ]
    }
}

impl<T> fmt::Debug for FrontClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrontClient")
            .field("api_key", &"[redacted]")
            .field("endpoint", &self.endpoint)
            .field("verify_ssl", &self.verify_ssl)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

struct Classified {
    successful: bool,
    error: Option<ApiError>,
    body: Option<Value>,
    decode_error: Option<String>,
}

fn classify(raw: &str) -> Classified {
    if raw.is_empty() {
        return Classified {
            successful: false,
            error: None,
            body: None,
            decode_error: None,
        };
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(payload) => {
            let error = api_error(&payload);
            Classified {
                successful: error.is_none(),
                error,
                body: Some(payload),
                decode_error: None,
            }
        }
        Err(e) => Classified {
            successful: true,
            error: None,
            body: None,
            decode_error: Some(e.to_string()),
        },
    }
}

fn api_error(payload: &Value) -> Option<ApiError> {
    let status = status_value(payload.get("status")?)?;
    let detail = payload.get("detail").filter(|d| !d.is_null())?;
    if status == 200.0 {
        return None;
    }
    let detail = match detail {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    Some(ApiError::Api {
        status: status.trunc() as i64,
        detail,
    })
}

/// Numeric value of a `status` field, compared untruncated so 200.5 is not
/// 200. Strings are accepted because some endpoints quote it; a non-numeric
/// string counts as 0.
fn status_value(status: &Value) -> Option<f64> {
    match status {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => Some(s.trim().parse::<f64>().unwrap_or(0.0)),
        _ => None,
    }
}

fn record_request(path: &str, request: HttpRequest) -> RequestRecord {
    RequestRecord {
        method: request.method,
        path: path.to_string(),
        url: request.url,
        body: request.body.unwrap_or_default(),
        timeout: request.timeout,
        headers: redact(request.headers),
    }
}

fn redact(mut headers: Vec<(String, String)>) -> Vec<(String, String)> {
    for (name, value) in &mut headers {
        if name.eq_ignore_ascii_case("authorization") {
            *value = REDACTED_AUTHORIZATION.to_string();
        }
    }
    headers
}

fn normalize_endpoint(raw: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let uri: Uri = trimmed
        .parse()
        .map_err(|e| ApiError::InvalidEndpoint(format!("{trimmed}: {e}")))?;
    match uri.scheme_str() {
        Some("http" | "https") if uri.host().is_some() => Ok(trimmed.to_string()),
        _ => Err(ApiError::InvalidEndpoint(trimmed.to_string())),
    }
}
