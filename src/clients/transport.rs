//! Blocking HTTP transports.
//!
//! [`HttpClient`](crate::clients::HttpClient) resolves URLs, headers and body
//! encoding into a plain-data [`WireRequest`], then hands it to a
//! [`Transport`] that performs the I/O. The default transport is
//! [`ReqwestTransport`]; [`RecordingTransport`] replays canned responses and
//! records every request, for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::clients::errors::HttpError;
use crate::clients::http_request::HttpMethod;
use crate::clients::http_response::HttpResponse;
use crate::error::ConfigError;

/// A fully resolved request, ready to be put on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WireRequest {
    /// The HTTP method.
    pub method: HttpMethod,
    /// The absolute URL, without query string.
    pub url: String,
    /// Request headers.
    pub headers: Vec<(String, String)>,
    /// Query parameters, sorted by key.
    pub query: Vec<(String, String)>,
    /// The encoded body, if any.
    pub body: Option<String>,
}

impl WireRequest {
    /// Returns the first header value with the given name, case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Executes a [`WireRequest`] and returns the raw response.
///
/// Implementations return `Ok` for every response the server sends,
/// whatever its status; status classification happens in the client.
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Sends the request and blocks until the response arrives.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] when no response could be obtained.
    fn execute(&self, request: &WireRequest) -> Result<HttpResponse, HttpError>;
}

/// [`Transport`] backed by a blocking `reqwest` client.
#[derive(Debug)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Creates a transport whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Transport`] if the TLS backend cannot be
    /// initialized.
    pub fn new(timeout: Duration) -> Result<Self, ConfigError> {
        let client = reqwest::blocking::Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::Transport {
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }

    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: &WireRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Put => self.client.put(&request.url),
            HttpMethod::Delete => self.client.delete(&request.url),
        };

        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let res = builder.send()?;
        let code = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());
        let body = res.text()?;

        Ok(HttpResponse::new(code, headers, body))
    }
}

/// [`Transport`] that records requests and replays queued responses.
///
/// When the queue is empty it answers `200` with an empty JSON object.
///
/// # Example
///
/// ```rust
/// use xplenty_api::clients::{HttpResponse, RecordingTransport};
///
/// let transport = RecordingTransport::new();
/// transport.push_json(201, r#"{"id": 1}"#);
/// assert_eq!(transport.call_count(), 0);
/// ```
#[derive(Debug, Default)]
pub struct RecordingTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<WireRequest>>,
}

impl RecordingTransport {
    /// Creates an empty transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response.
    pub fn push(&self, response: HttpResponse) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(response);
    }

    /// Queues a response with the given status and JSON body text.
    pub fn push_json(&self, code: u16, body: &str) {
        let mut headers = HashMap::new();
        headers.insert(
            "content-type".to_string(),
            vec!["application/json".to_string()],
        );
        self.push(HttpResponse::new(code, headers, body));
    }

    /// Returns every request executed so far.
    #[must_use]
    pub fn requests(&self) -> Vec<WireRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns how many requests were executed.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Transport for RecordingTransport {
    fn execute(&self, request: &WireRequest) -> Result<HttpResponse, HttpError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        let response = self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        Ok(response.unwrap_or_else(|| HttpResponse::new(200, HashMap::new(), "{}")))
    }
}

// Verify transports are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ReqwestTransport>();
    assert_send_sync::<RecordingTransport>();
};

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(method: HttpMethod, url: &str) -> WireRequest {
        WireRequest {
            method,
            url: url.to_string(),
            headers: vec![("Accept".to_string(), "application/json".to_string())],
            query: Vec::new(),
            body: None,
        }
    }

    #[test]
    fn test_recording_transport_replays_in_order() {
        let transport = RecordingTransport::new();
        transport.push_json(201, r#"{"id":1}"#);
        transport.push_json(404, r#"{"message":"gone"}"#);

        let first = transport.execute(&wire(HttpMethod::Post, "http://x/a")).unwrap();
        let second = transport.execute(&wire(HttpMethod::Get, "http://x/b")).unwrap();
        let third = transport.execute(&wire(HttpMethod::Get, "http://x/c")).unwrap();

        assert_eq!(first.code, 201);
        assert_eq!(second.code, 404);
        assert_eq!(third.code, 200);
        assert_eq!(third.body, "{}");
    }

    #[test]
    fn test_recording_transport_records_requests() {
        let transport = RecordingTransport::new();
        transport
            .execute(&wire(HttpMethod::Delete, "http://x/clusters/42"))
            .unwrap();

        let requests = transport.requests();
        assert_eq!(transport.call_count(), 1);
        assert_eq!(requests[0].method, HttpMethod::Delete);
        assert_eq!(requests[0].url, "http://x/clusters/42");
    }

    #[test]
    fn test_wire_request_header_lookup() {
        let request = wire(HttpMethod::Get, "http://x");
        assert_eq!(request.header("accept"), Some("application/json"));
        assert_eq!(request.header("authorization"), None);
    }

    #[test]
    fn test_reqwest_transport_builds() {
        assert!(ReqwestTransport::new(Duration::from_secs(1)).is_ok());
    }
}
