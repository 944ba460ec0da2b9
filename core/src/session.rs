//! Stateful facade that remembers the last call.
//!
//! `FrontApp` wraps a `FrontClient` and keeps the most recent `Outcome` in a
//! single slot, giving callers the "make a call, then ask how it went" style:
//!
//! ```no_run
//! use frontapp_core::FrontApp;
//! use serde_json::json;
//!
//! let mut front = FrontApp::new("api-key")?;
//! let _inboxes = front.get("inboxes", None);
//! if !front.success() {
//!     eprintln!("{}", front.last_error().unwrap_or_default());
//! }
//! front.post("channels/cha_1/messages", Some(&json!({"body": "Hello"})));
//! # Ok::<(), frontapp_core::ApiError>(())
//! ```
//!
//! Calls take `&mut self`, so two calls can never race on the slot. Share a
//! `FrontClient` instead when concurrent calls are needed.

use std::time::Duration;

use serde_json::Value;

use crate::client::FrontClient;
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::outcome::{Outcome, RequestRecord, ResponseRecord};
use crate::transport::{Transport, UreqTransport};

#[derive(Debug)]
pub struct FrontApp<T = UreqTransport> {
    client: FrontClient<T>,
    last: Option<Outcome>,
}

impl FrontApp<UreqTransport> {
    pub fn new(api_key: &str) -> Result<Self, ApiError> {
        Ok(Self::from_client(FrontClient::new(api_key)?))
    }
}

impl<T: Transport> FrontApp<T> {
    pub fn from_client(client: FrontClient<T>) -> Self {
        Self { client, last: None }
    }

    pub fn client(&self) -> &FrontClient<T> {
        &self.client
    }

    pub fn into_client(self) -> FrontClient<T> {
        self.client
    }

    pub fn verify_ssl(&self) -> bool {
        self.client.verify_ssl()
    }

    pub fn set_verify_ssl(&mut self, verify: bool) {
        self.client.set_verify_ssl(verify);
    }

    pub fn get(&mut self, path: &str, args: Option<&Value>) -> Option<Value> {
        self.request(HttpMethod::Get, path, args, None)
    }

    pub fn post(&mut self, path: &str, args: Option<&Value>) -> Option<Value> {
        self.request(HttpMethod::Post, path, args, None)
    }

    pub fn put(&mut self, path: &str, args: Option<&Value>) -> Option<Value> {
        self.request(HttpMethod::Put, path, args, None)
    }

    pub fn patch(&mut self, path: &str, args: Option<&Value>) -> Option<Value> {
        self.request(HttpMethod::Patch, path, args, None)
    }

    pub fn delete(&mut self, path: &str, args: Option<&Value>) -> Option<Value> {
        self.request(HttpMethod::Delete, path, args, None)
    }

    pub fn get_with_timeout(&mut self, path: &str, args: Option<&Value>, timeout: Duration) -> Option<Value> {
        self.request(HttpMethod::Get, path, args, Some(timeout))
    }

    pub fn post_with_timeout(&mut self, path: &str, args: Option<&Value>, timeout: Duration) -> Option<Value> {
        self.request(HttpMethod::Post, path, args, Some(timeout))
    }

    pub fn put_with_timeout(&mut self, path: &str, args: Option<&Value>, timeout: Duration) -> Option<Value> {
        self.request(HttpMethod::Put, path, args, Some(timeout))
    }

    pub fn patch_with_timeout(&mut self, path: &str, args: Option<&Value>, timeout: Duration) -> Option<Value> {
        self.request(HttpMethod::Patch, path, args, Some(timeout))
    }

    pub fn delete_with_timeout(&mut self, path: &str, args: Option<&Value>, timeout: Duration) -> Option<Value> {
        self.request(HttpMethod::Delete, path, args, Some(timeout))
    }

    /// Perform a call and record it. Returns the decoded body, or `None`
    /// when there was nothing to decode.
    pub fn request(
        &mut self,
        method: HttpMethod,
        path: &str,
        args: Option<&Value>,
        timeout: Option<Duration>,
    ) -> Option<Value> {
        let outcome = self.client.request(method, path, args, timeout);
        let body = outcome.body().cloned();
        self.last = Some(outcome);
        body
    }

    pub fn success(&self) -> bool {
        self.last.as_ref().is_some_and(Outcome::success)
    }

    pub fn last_error(&self) -> Option<String> {
        self.last.as_ref().and_then(Outcome::last_error)
    }

    pub fn last_response(&self) -> Option<&ResponseRecord> {
        self.last.as_ref().map(Outcome::response)
    }

    pub fn last_request(&self) -> Option<&RequestRecord> {
        self.last.as_ref().map(Outcome::request)
    }

    pub fn last_outcome(&self) -> Option<&Outcome> {
        self.last.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::error::TransportError;
    use crate::http::{HttpRequest, HttpResponse};

    /// Hands out queued replies in order.
    struct Scripted(Mutex<VecDeque<Result<HttpResponse, TransportError>>>);

    impl Scripted {
        fn new(bodies: &[&str]) -> Self {
            Self(Mutex::new(
                bodies
                    .iter()
                    .map(|b| {
                        Ok(HttpResponse {
                            status: 200,
                            headers: Vec::new(),
                            body: b.to_string(),
                        })
                    })
                    .collect(),
            ))
        }
    }

    impl Transport for Scripted {
        fn execute(&self, _request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.0
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::new("no scripted reply left")))
        }
    }

    fn session(bodies: &[&str]) -> FrontApp<Scripted> {
        FrontApp::from_client(FrontClient::with_transport("tok", Scripted::new(bodies)).unwrap())
    }

    #[test]
    fn nothing_recorded_before_first_call() {
        let front = session(&[]);
        assert!(!front.success());
        assert_eq!(front.last_error(), None);
        assert!(front.last_request().is_none());
        assert!(front.last_response().is_none());
    }

    #[test]
    fn each_call_overwrites_the_slot() {
        let mut front = session(&[r#"{"status":401,"detail":"Unauthorized"}"#, r#"{"id":"msg_1"}"#]);

        assert!(front.get("me", None).is_some());
        assert!(!front.success());
        assert_eq!(front.last_error().as_deref(), Some("401: Unauthorized"));

        let body = front.post("channels/cha_1/messages", Some(&json!({"body": "hi"})));
        assert_eq!(body, Some(json!({"id": "msg_1"})));
        assert!(front.success());
        assert_eq!(front.last_error(), None);
        let request = front.last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.path, "channels/cha_1/messages");
        assert_eq!(request.body, r#"{"body":"hi"}"#);
    }

    #[test]
    fn introspection_is_idempotent() {
        let mut front = session(&[r#"{"id":"cnv_1"}"#]);
        front.get("conversations/cnv_1", None);

        let first = (front.last_request().cloned(), front.last_response().cloned());
        let second = (front.last_request().cloned(), front.last_response().cloned());
        assert_eq!(first, second);
        assert_eq!(front.last_response().unwrap().body.as_deref(), Some(r#"{"id":"cnv_1"}"#));
    }

    #[test]
    fn empty_body_returns_none_without_success() {
        let mut front = session(&[""]);
        assert_eq!(front.delete("tags/tag_1", None), None);
        assert!(!front.success());
        assert_eq!(front.last_error(), None);
    }

    #[test]
    fn transport_failure_returns_none_with_error() {
        let mut front = session(&[]);
        assert_eq!(front.patch("conversations/cnv_1", Some(&json!({"status": "archived"}))), None);
        assert_eq!(front.last_error().as_deref(), Some("no scripted reply left"));
    }

    #[test]
    fn timeout_variant_is_recorded() {
        let mut front = session(&[r#"{"id":"tag_1"}"#]);
        front.put_with_timeout("tags/tag_1", Some(&json!({"name": "vip"})), Duration::from_secs(2));
        let request = front.last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(request.timeout, Duration::from_secs(2));
    }

    #[test]
    fn non_json_body_still_counts_as_success() {
        let mut front = session(&["<html>oops</html>"]);
        assert_eq!(front.get("me", None), None);
        assert!(front.success());
        assert_eq!(front.last_error(), None);
    }

    #[test]
    fn verify_ssl_passes_through() {
        let mut front = session(&[]);
        assert!(front.verify_ssl());
        front.set_verify_ssl(false);
        assert!(!front.client().verify_ssl());
    }
}
