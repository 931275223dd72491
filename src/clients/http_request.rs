//! HTTP request types for the Xplenty API client.
//!
//! [`HttpRequest`] describes one call relative to a base URL; the
//! [`HttpClient`](crate::clients::HttpClient) resolves and sends it.

use std::collections::HashMap;
use std::fmt;

use crate::clients::errors::InvalidHttpRequestError;

/// HTTP methods supported by the Xplenty API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// Reads a resource or a listing.
    Get,
    /// Creates a resource or triggers an action.
    Post,
    /// Updates a resource.
    Put,
    /// Deletes a resource, or terminates/stops it.
    Delete,
}

impl HttpMethod {
    /// Returns the method name as sent on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire format of a request body, mirrored in the `Content-Type` header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataType {
    /// `application/json`.
    Json,
    /// `application/x-www-form-urlencoded`, keys bracketed under a root.
    Form,
}

impl DataType {
    /// Returns the `Content-Type` header value.
    #[must_use]
    pub const fn as_content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Form => "application/x-www-form-urlencoded",
        }
    }
}

/// Which base URL a request path is resolved against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ApiBase {
    /// The account-scoped base (`https://api.xplenty.com/{account_id}/api`).
    #[default]
    Account,
    /// The account-agnostic base used for user and account management.
    Short,
}

/// An HTTP request to be sent to the Xplenty API.
///
/// Built with [`HttpRequest::builder`], which validates on `build`.
///
/// # Example
///
/// ```rust
/// use xplenty_api::clients::{ApiBase, DataType, HttpMethod, HttpRequest};
/// use serde_json::json;
///
/// let get_request = HttpRequest::builder(HttpMethod::Get, "clusters")
///     .query_param("status", "available")
///     .build()
///     .unwrap();
///
/// let post_request = HttpRequest::builder(HttpMethod::Post, "user/keys")
///     .base(ApiBase::Short)
///     .body(json!({"name": "laptop", "public_key": "ssh-rsa AAAA"}))
///     .body_type(DataType::Json)
///     .build()
///     .unwrap();
/// assert_eq!(post_request.base, ApiBase::Short);
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The method.
    pub http_method: HttpMethod,
    /// The path (relative to the base URL) for this request.
    pub path: String,
    /// The base URL the path is resolved against.
    pub base: ApiBase,
    /// JSON body, encoded per `body_type` when sent.
    pub body: Option<serde_json::Value>,
    /// Body encoding; required whenever `body` is set.
    pub body_type: Option<DataType>,
    /// Key that form-encoded bodies are nested under (`cluster[nodes]=1`).
    pub form_root: Option<String>,
    /// Query string parameters.
    pub query: Option<HashMap<String, String>>,
    /// Headers added on top of the client defaults.
    pub extra_headers: Option<HashMap<String, String>>,
}

impl HttpRequest {
    /// Starts a request for `path` under the account base.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }

    /// Checks the request can be sent.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if:
    /// - the path is empty
    /// - `body` is `Some` but `body_type` is `None`
    /// - the body is form-encoded but is not a JSON object
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if self.path.trim_matches('/').is_empty() {
            return Err(InvalidHttpRequestError::EmptyPath);
        }

        if self.body.is_some() && self.body_type.is_none() {
            return Err(InvalidHttpRequestError::MissingBodyType);
        }

        if self.body_type == Some(DataType::Form)
            && !matches!(self.body, None | Some(serde_json::Value::Object(_)))
        {
            return Err(InvalidHttpRequestError::UnencodableBody {
                reason: "form bodies must be JSON objects".to_string(),
            });
        }

        Ok(())
    }
}

/// Builder for [`HttpRequest`].
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    path: String,
    base: ApiBase,
    body: Option<serde_json::Value>,
    body_type: Option<DataType>,
    form_root: Option<String>,
    query: Option<HashMap<String, String>>,
    extra_headers: Option<HashMap<String, String>>,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            http_method: method,
            path: path.into(),
            base: ApiBase::Account,
            body: None,
            body_type: None,
            form_root: None,
            query: None,
            extra_headers: None,
        }
    }

    /// Sets the base URL the path is resolved against.
    #[must_use]
    pub const fn base(mut self, base: ApiBase) -> Self {
        self.base = base;
        self
    }

    /// Sets the body. Pair it with [`body_type`](Self::body_type).
    #[must_use]
    pub fn body(mut self, body: impl Into<serde_json::Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the body encoding.
    #[must_use]
    pub const fn body_type(mut self, body_type: DataType) -> Self {
        self.body_type = Some(body_type);
        self
    }

    /// Sets the key form-encoded bodies are nested under.
    #[must_use]
    pub fn form_root(mut self, root: impl Into<String>) -> Self {
        self.form_root = Some(root.into());
        self
    }

    /// Replaces the query parameters.
    #[must_use]
    pub fn query(mut self, query: HashMap<String, String>) -> Self {
        self.query = Some(query);
        self
    }

    /// Adds one query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Adds one header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Validates and returns the request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the request fails validation.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        let request = HttpRequest {
            http_method: self.http_method,
            path: self.path,
            base: self.base,
            body: self.body,
            body_type: self.body_type,
            form_root: self.form_root,
            query: self.query,
            extra_headers: self.extra_headers,
        };
        request.verify()?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_method_display_is_uppercase() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Post.to_string(), "POST");
        assert_eq!(HttpMethod::Put.to_string(), "PUT");
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_data_type_content_types() {
        assert_eq!(DataType::Json.as_content_type(), "application/json");
        assert_eq!(
            DataType::Form.as_content_type(),
            "application/x-www-form-urlencoded"
        );
    }

    #[test]
    fn test_builder_defaults_to_account_base() {
        let request = HttpRequest::builder(HttpMethod::Get, "clusters")
            .build()
            .unwrap();
        assert_eq!(request.base, ApiBase::Account);
        assert!(request.body.is_none());
        assert!(request.query.is_none());
    }

    #[test]
    fn test_post_without_body_is_valid() {
        let request = HttpRequest::builder(HttpMethod::Post, "schedules/7/clone").build();
        assert!(request.is_ok());
    }

    #[test]
    fn test_body_without_body_type_fails() {
        let result = HttpRequest::builder(HttpMethod::Post, "clusters")
            .body(json!({"nodes": 1}))
            .build();
        assert!(matches!(
            result,
            Err(InvalidHttpRequestError::MissingBodyType)
        ));
    }

    #[test]
    fn test_empty_path_fails() {
        let result = HttpRequest::builder(HttpMethod::Get, "/").build();
        assert!(matches!(result, Err(InvalidHttpRequestError::EmptyPath)));
    }

    #[test]
    fn test_form_body_must_be_object() {
        let result = HttpRequest::builder(HttpMethod::Post, "jobs")
            .body(json!([1, 2]))
            .body_type(DataType::Form)
            .build();
        assert!(matches!(
            result,
            Err(InvalidHttpRequestError::UnencodableBody { .. })
        ));
    }

    #[test]
    fn test_query_params_accumulate() {
        let request = HttpRequest::builder(HttpMethod::Get, "jobs")
            .query_param("offset", "20")
            .query_param("limit", "10")
            .build()
            .unwrap();
        let query = request.query.unwrap();
        assert_eq!(query.get("offset"), Some(&"20".to_string()));
        assert_eq!(query.get("limit"), Some(&"10".to_string()));
    }
}
