//! HTTP client for Xplenty API communication.
//!
//! This module provides the [`HttpClient`] type for making authenticated
//! requests to the Xplenty API.

use std::collections::HashMap;
use std::sync::Arc;

use base64::prelude::*;

use crate::clients::errors::{HttpError, InvalidHttpRequestError};
use crate::clients::form::encode_form;
use crate::clients::http_request::{ApiBase, DataType, HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::clients::transport::{ReqwestTransport, Transport, WireRequest};
use crate::config::{BodyEncoding, XplentyConfig};
use crate::error::ConfigError;

/// Client version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to the Xplenty API.
///
/// The client handles:
/// - URL construction against the account-scoped or the short base URL
/// - Default headers: `Authorization: Basic`, `Accept`, `User-Agent`
/// - Body encoding (JSON or bracketed form pairs)
/// - Status classification (422, 403, other non-2xx)
///
/// All state is fixed at construction.
///
/// # Example
///
/// ```rust,ignore
/// use xplenty_api::clients::{HttpClient, HttpMethod, HttpRequest};
///
/// let client = HttpClient::new(&config)?;
/// let request = HttpRequest::builder(HttpMethod::Get, "clusters").build()?;
/// let response = client.request(request)?;
/// println!("{}", response.body);
/// ```
#[derive(Debug)]
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    account_base: String,
    short_base: String,
    default_headers: HashMap<String, String>,
    body_encoding: BodyEncoding,
    allowed_methods: Vec<HttpMethod>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a client that talks to the network through `reqwest`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Transport`] if the HTTP backend cannot be
    /// initialized.
    pub fn new(config: &XplentyConfig) -> Result<Self, ConfigError> {
        let transport = ReqwestTransport::new(config.timeout())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Creates a client that sends requests through `transport`.
    #[must_use]
    pub fn with_transport(config: &XplentyConfig, transport: Arc<dyn Transport>) -> Self {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}Xplenty API Rust Client v{SDK_VERSION}");

        let credential = BASE64_STANDARD.encode(config.api_key().as_ref());

        let mut default_headers = HashMap::new();
        default_headers.insert("Authorization".to_string(), format!("Basic {credential}"));
        default_headers.insert(
            "Accept".to_string(),
            config.protocol_version().accept_header().to_string(),
        );
        default_headers.insert("User-Agent".to_string(), user_agent);

        Self {
            transport,
            account_base: config.account_base_url().as_ref().to_string(),
            short_base: config.short_url().as_ref().to_string(),
            default_headers,
            body_encoding: config.body_encoding(),
            allowed_methods: config.allowed_methods().to_vec(),
        }
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns the body type request bodies should be sent as.
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        match self.body_encoding {
            BodyEncoding::Json => DataType::Json,
            BodyEncoding::Form => DataType::Form,
        }
    }

    /// Resolves a path against one of the base URLs.
    #[must_use]
    pub fn url_for(&self, base: ApiBase, path: &str) -> String {
        let root = match base {
            ApiBase::Account => &self.account_base,
            ApiBase::Short => &self.short_base,
        };
        format!("{root}/{}", path.trim_start_matches('/'))
    }

    /// Resolves an [`HttpRequest`] into the [`WireRequest`] that would be sent.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::InvalidRequest`] if the request fails validation
    /// or uses a method outside the configured allowed list.
    pub fn prepare(&self, request: &HttpRequest) -> Result<WireRequest, HttpError> {
        request.verify()?;

        if !self.allowed_methods.contains(&request.http_method) {
            return Err(InvalidHttpRequestError::InvalidMethod {
                method: request.http_method.to_string(),
            }
            .into());
        }

        let mut headers = self.default_headers.clone();
        let body = match (&request.body, request.body_type) {
            (Some(body), Some(DataType::Json)) => Some(body.to_string()),
            (Some(body), Some(DataType::Form)) => {
                Some(encode_form(request.form_root.as_deref(), body))
            }
            _ => None,
        };
        if let (Some(_), Some(body_type)) = (&body, request.body_type) {
            headers.insert(
                "Content-Type".to_string(),
                body_type.as_content_type().to_string(),
            );
        }
        if let Some(extra) = &request.extra_headers {
            for (key, value) in extra {
                headers.insert(key.clone(), value.clone());
            }
        }

        let mut headers: Vec<(String, String)> = headers.into_iter().collect();
        headers.sort();
        let mut query: Vec<(String, String)> = request
            .query
            .as_ref()
            .map(|q| q.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();
        query.sort();

        Ok(WireRequest {
            method: request.http_method,
            url: self.url_for(request.base, &request.path),
            headers,
            query,
            body,
        })
    }

    /// Sends an HTTP request to the Xplenty API.
    ///
    /// Exactly one round trip is made; nothing is retried.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - Network error occurs (`Network`)
    /// - The server answers 422 (`Validation`), 403 (`Forbidden`) or any
    ///   other non-2xx status (`Response`)
    pub fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let wire = self.prepare(&request)?;
        tracing::debug!("{} {}", wire.method, wire.url);

        let response = self.transport.execute(&wire)?;
        if response.is_ok() {
            return Ok(response);
        }

        tracing::debug!(
            "{} {} failed with status {}",
            wire.method,
            wire.url,
            response.code
        );
        Err(HttpError::from_status(response.code, response.body))
    }
}
