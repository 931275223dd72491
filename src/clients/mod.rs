//! HTTP client types for Xplenty API communication.
//!
//! This module provides the foundational HTTP layer: authenticated request
//! construction, body encoding, transport execution and status
//! classification. Resource-level operations live in [`crate::rest`].
//!
//! # Overview
//!
//! - [`HttpClient`]: The blocking HTTP client for API communication
//! - [`HttpRequest`]: A request to be sent to the API
//! - [`HttpResponse`]: A raw response from the API
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PUT, DELETE)
//! - [`DataType`]: Content types for request bodies
//! - [`ApiBase`]: Account-scoped or short base URL
//! - [`Transport`]: The I/O seam, with [`ReqwestTransport`] and
//!   [`RecordingTransport`] implementations
//!
//! # Example
//!
//! ```rust,ignore
//! use xplenty_api::clients::{HttpClient, HttpMethod, HttpRequest};
//!
//! let client = HttpClient::new(&config)?;
//! let request = HttpRequest::builder(HttpMethod::Get, "clusters")
//!     .query_param("status", "available")
//!     .build()?;
//!
//! let response = client.request(request)?;
//! ```
//!
//! # Retry Behavior
//!
//! None. Every call is a single round trip and errors propagate to the caller.

mod errors;
mod form;
mod http_client;
mod http_request;
mod http_response;
mod transport;

pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
pub use form::{encode_form, form_pairs};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{ApiBase, DataType, HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;
pub use transport::{RecordingTransport, ReqwestTransport, Transport, WireRequest};
