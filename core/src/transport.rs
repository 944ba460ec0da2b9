//! Executes `HttpRequest` values against the network.
//!
//! # Design
//! `Transport` is the only seam between the client and real I/O. The
//! production implementation, `UreqTransport`, builds a fresh blocking ureq
//! agent for every call with that call's timeout and TLS settings. The agent
//! is dropped when `execute` returns, whichever way it returns, so nothing is
//! pooled or shared between calls.

use tracing::{debug, warn};
use ureq::http::HeaderMap;
use ureq::tls::TlsConfig;
use ureq::{Agent, RequestBuilder};

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one HTTP exchange.
///
/// Implementations must return `Ok` for any response that arrived, whatever
/// its status code; `Err` is reserved for exchanges that produced no
/// response at all (connection, TLS, timeout).
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Blocking transport backed by ureq.
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl UreqTransport {
    pub fn new() -> Self {
        Self
    }

    fn agent(request: &HttpRequest) -> Agent {
        let tls = TlsConfig::builder()
            .disable_verification(!request.verify_ssl)
            .build();
        Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(request.timeout))
            .tls_config(tls)
            .build()
            .new_agent()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = Self::agent(request);
        let url = request.url.as_str();
        let body = request.body.as_deref().unwrap_or_default();

        debug!(method = %request.method, %url, "sending request");

        let result = match request.method {
            HttpMethod::Get => with_headers(agent.get(url), request).call(),
            HttpMethod::Post => with_headers(agent.post(url), request).send(body.as_bytes()),
            HttpMethod::Put => with_headers(agent.put(url), request).send(body.as_bytes()),
            HttpMethod::Patch => with_headers(agent.patch(url), request).send(body.as_bytes()),
            HttpMethod::Delete => with_headers(agent.delete(url), request)
                .force_send_body()
                .send(body.as_bytes()),
        };

        let mut response = result.map_err(|e| {
            warn!(method = %request.method, %url, error = %e, "transport failure");
            TransportError::new(e.to_string())
        })?;

        let status = response.status().as_u16();
        let headers = header_pairs(response.headers());
        let body = response.body_mut().read_to_string().map_err(|e| {
            warn!(method = %request.method, %url, error = %e, "failed reading response body");
            TransportError::new(e.to_string())
        })?;

        debug!(status, bytes = body.len(), "response received");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Header values are not guaranteed to be ASCII; non-UTF-8 bytes are
/// replaced rather than dropping the whole value.
fn header_pairs(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

fn with_headers<B>(mut builder: RequestBuilder<B>, request: &HttpRequest) -> RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ureq::http::HeaderValue;

    use super::*;

    #[test]
    fn non_ascii_header_values_are_kept() {
        let mut headers = HeaderMap::new();
        headers.insert("x-team", HeaderValue::from_bytes("caf\u{e9}".as_bytes()).unwrap());
        headers.insert("x-raw", HeaderValue::from_bytes(b"caf\xe9").unwrap());
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let pairs = header_pairs(&headers);
        let get = |name: &str| pairs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str());
        assert_eq!(get("x-team"), Some("caf\u{e9}"));
        assert_eq!(get("x-raw"), Some("caf\u{fffd}"));
        assert_eq!(get("content-type"), Some("application/json"));
    }

    #[test]
    fn connection_refused_is_a_transport_error() {
        // Bind then drop to get a port nobody is listening on.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: format!("http://127.0.0.1:{port}/me"),
            headers: Vec::new(),
            body: None,
            timeout: Duration::from_secs(2),
            verify_ssl: true,
        };
        let err = UreqTransport::new().execute(&request).unwrap_err();
        assert!(!err.message.is_empty());
    }
}
