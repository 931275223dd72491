//! Resource-level error types.
//!
//! [`ResourceError`] wraps the HTTP layer's [`HttpError`] and adds the
//! failures that only make sense once a response is interpreted as entities:
//! rejected keyword arguments, unexpected body shapes and missing keys.
//!
//! # Example
//!
//! ```rust,ignore
//! use xplenty_api::rest::ResourceError;
//! use xplenty_api::clients::HttpError;
//!
//! match client.cluster(42) {
//!     Ok(cluster) => println!("{:?}", cluster.status),
//!     Err(ResourceError::Http(HttpError::Validation(e))) => println!("rejected: {}", e.message),
//!     Err(e) => println!("other error: {e}"),
//! }
//! ```

use crate::clients::HttpError;
use crate::rest::mapper::CoercionError;
use thiserror::Error;

/// Error type for resource operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// An HTTP-level error occurred (non-2xx status, network failure or
    /// invalid request).
    #[error(transparent)]
    Http(#[from] HttpError),

    /// A keyword argument is neither a declared field nor an allowed extra.
    ///
    /// Raised before any network call is made.
    #[error("unexpected argument '{argument}' for {resource}")]
    UnexpectedArgument {
        /// The entity type the arguments were checked against.
        resource: &'static str,
        /// The offending argument name.
        argument: String,
    },

    /// The response body was not valid JSON.
    #[error("Invalid JSON response: {0}")]
    InvalidResponse(#[source] serde_json::Error),

    /// The response body was JSON of the wrong shape.
    #[error("Expected {expected} for {resource}, got {found}")]
    UnexpectedShape {
        /// The entity type being decoded.
        resource: &'static str,
        /// The expected JSON shape (e.g., "array").
        expected: &'static str,
        /// The shape actually received.
        found: &'static str,
    },

    /// No entity with the given key exists in a collection.
    #[error("{resource} with key {key} not found")]
    NotFound {
        /// The entity type name.
        resource: &'static str,
        /// The key that was requested.
        key: String,
    },

    /// An entity-level action needs the primary key, which is not set.
    #[error("{resource} has no primary key value")]
    MissingId {
        /// The entity type name.
        resource: &'static str,
    },

    /// Strict coercion rejected one or more response fields.
    #[error(transparent)]
    Coercion(#[from] CoercionError),
}

impl ResourceError {
    /// Returns the HTTP status code if the error came from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status(),
            _ => None,
        }
    }
}

/// Names the JSON shape of a value for error messages.
pub(crate) const fn shape_of(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::HttpResponseError;
    use serde_json::json;

    #[test]
    fn test_unexpected_argument_message() {
        let error = ResourceError::UnexpectedArgument {
            resource: "Cluster",
            argument: "colour".to_string(),
        };
        assert_eq!(error.to_string(), "unexpected argument 'colour' for Cluster");
    }

    #[test]
    fn test_http_error_is_transparent() {
        let http = HttpError::Validation(HttpResponseError {
            code: 422,
            message: "name is required".to_string(),
            body: String::new(),
        });
        let error: ResourceError = http.into();
        assert_eq!(error.status(), Some(422));
        assert!(error.to_string().contains("name is required"));
    }

    #[test]
    fn test_status_is_none_for_local_errors() {
        let error = ResourceError::MissingId { resource: "Job" };
        assert_eq!(error.status(), None);
    }

    #[test]
    fn test_shape_of() {
        assert_eq!(shape_of(&json!([])), "array");
        assert_eq!(shape_of(&json!({})), "object");
        assert_eq!(shape_of(&json!(null)), "null");
    }

    #[test]
    fn test_resource_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ResourceError>();
    }
}
