//! HTTP-specific error types for the Xplenty API client.
//!
//! This module contains error types for HTTP operations: status-classified
//! response errors, request validation failures and transport failures.
//!
//! # Status Mapping
//!
//! - **422**: [`HttpError::Validation`], message decoded from the JSON body
//! - **403**: [`HttpError::Forbidden`]
//! - **Other non-2xx**: [`HttpError::Response`]
//!
//! # Example
//!
//! ```rust,ignore
//! use xplenty_api::clients::HttpError;
//!
//! match client.request(request) {
//!     Ok(response) => println!("Success: {}", response.body),
//!     Err(HttpError::Validation(e)) => println!("Rejected: {}", e.message),
//!     Err(HttpError::Forbidden(e)) => println!("Not allowed: {}", e.message),
//!     Err(HttpError::Response(e)) => println!("API error {}: {}", e.code, e.message),
//!     Err(e) => println!("Request failed: {e}"),
//! }
//! ```

use thiserror::Error;

/// Error returned when an HTTP request receives a non-successful response.
///
/// `message` is the `message` field of a JSON error body when one is present,
/// otherwise a generic `"<code> Client Error: <body>"` text. `body` always
/// holds the raw response text.
///
/// # Example
///
/// ```rust
/// use xplenty_api::clients::HttpResponseError;
///
/// let error = HttpResponseError::from_body(422, r#"{"message":"nodes must be positive"}"#);
/// assert_eq!(error.message, "nodes must be positive");
///
/// let error = HttpResponseError::from_body(500, "upstream timeout");
/// assert_eq!(error.message, "500 Server Error: upstream timeout");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Human-readable error message.
    pub message: String,
    /// The raw response body.
    pub body: String,
}

impl HttpResponseError {
    /// Builds an error from a status code and raw body, extracting the
    /// JSON `message` field when possible.
    #[must_use]
    pub fn from_body(code: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .and_then(serde_json::Value::as_str)
                    .map(ToString::to_string)
            })
            .unwrap_or_else(|| {
                let class = if code >= 500 { "Server" } else { "Client" };
                format!("{code} {class} Error: {body}")
            });
        Self {
            code,
            message,
            body,
        }
    }
}

/// Error returned when an HTTP request fails validation.
///
/// This error is raised before a request is sent.
///
/// # Example
///
/// ```rust
/// use xplenty_api::clients::InvalidHttpRequestError;
///
/// let error = InvalidHttpRequestError::InvalidMethod {
///     method: "PUT".to_string(),
/// };
///
/// assert_eq!(error.to_string(), "Invalid Http method PUT.");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// The HTTP method is not in the configured allowed list.
    #[error("Invalid Http method {method}.")]
    InvalidMethod {
        /// The method that was rejected.
        method: String,
    },

    /// A request body was provided without specifying the body type.
    #[error("Cannot set a body without also setting body_type.")]
    MissingBodyType,

    /// The request path is empty.
    #[error("Cannot send a request without a resource path.")]
    EmptyPath,

    /// The body cannot be encoded with the requested body type.
    #[error("Cannot encode request body: {reason}")]
    UnencodableBody {
        /// Why encoding failed.
        reason: String,
    },
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The server rejected the request as invalid (HTTP 422).
    #[error("Validation failed: {}", .0.message)]
    Validation(HttpResponseError),

    /// The credential is not allowed to perform the request (HTTP 403).
    #[error("Forbidden: {}", .0.message)]
    Forbidden(HttpResponseError),

    /// Any other non-2xx response.
    #[error(transparent)]
    Response(HttpResponseError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl HttpError {
    /// Classifies a non-2xx response by status code.
    #[must_use]
    pub fn from_status(code: u16, body: impl Into<String>) -> Self {
        let error = HttpResponseError::from_body(code, body);
        match code {
            422 => Self::Validation(error),
            403 => Self::Forbidden(error),
            _ => Self::Response(error),
        }
    }

    /// Returns the HTTP status code for response errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Validation(e) | Self::Forbidden(e) | Self::Response(e) => Some(e.code),
            Self::InvalidRequest(_) | Self::Network(_) => None,
        }
    }
}
