//! Error types for the Xplenty API client.
//!
//! This module contains error types used throughout the client for
//! configuration and validation errors.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use xplenty_api::{ApiKey, ConfigError};
//!
//! let result = ApiKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiKey)));
//! ```

use thiserror::Error;

/// Errors that can occur during client configuration.
///
/// Each variant provides a clear, actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API key cannot be empty.
    #[error("API key cannot be empty. Please provide a valid Xplenty API key.")]
    EmptyApiKey,

    /// Account ID is invalid.
    #[error("Invalid account id '{account_id}'. Expected a non-empty identifier without '/' or whitespace.")]
    InvalidAccountId {
        /// The invalid account id that was provided.
        account_id: String,
    },

    /// A base URL is invalid.
    #[error("Invalid base URL '{url}'. Please provide a valid URL with scheme (e.g., 'https://api.xplenty.com').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// The account URL template has no account placeholder.
    #[error("Account URL template '{template}' must contain the '{{account_id}}' placeholder.")]
    MissingAccountPlaceholder {
        /// The template that was provided.
        template: String,
    },

    /// Protocol version is invalid.
    #[error("Invalid protocol version '{version}'. Expected '1' or '2'.")]
    InvalidProtocolVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// A required environment variable is not set.
    #[error("Missing environment variable '{name}'.")]
    MissingEnvVar {
        /// The name of the variable.
        name: &'static str,
    },

    /// The HTTP transport could not be initialized.
    #[error("Failed to initialize HTTP transport: {reason}")]
    Transport {
        /// Why initialization failed.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_api_key_error_message() {
        let error = ConfigError::EmptyApiKey;
        let message = error.to_string();
        assert!(message.contains("API key cannot be empty"));
        assert!(message.contains("valid Xplenty API key"));
    }

    #[test]
    fn test_invalid_account_id_error_message() {
        let error = ConfigError::InvalidAccountId {
            account_id: "bad id".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("bad id"));
        assert!(message.contains("Expected"));
    }

    #[test]
    fn test_missing_placeholder_error_mentions_placeholder() {
        let error = ConfigError::MissingAccountPlaceholder {
            template: "https://api.xplenty.com/api".to_string(),
        };
        assert!(error.to_string().contains("{account_id}"));
    }

    #[test]
    fn test_missing_required_field_error_message() {
        let error = ConfigError::MissingRequiredField { field: "api_key" };
        let message = error.to_string();
        assert!(message.contains("api_key"));
        assert!(message.contains("must be set"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::EmptyApiKey;
        let _: &dyn std::error::Error = &error;
    }
}
