//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated Xplenty API key.
///
/// The key is the only credential the API needs; it is sent base64-encoded in
/// the `Authorization: Basic` header of every request.
///
/// # Security
///
/// The `Debug` implementation masks the key, displaying only
/// `ApiKey(*****)` instead of the actual value.
///
/// # Example
///
/// ```rust
/// use xplenty_api::ApiKey;
///
/// let key = ApiKey::new("my-api-key").unwrap();
/// assert_eq!(key.as_ref(), "my-api-key");
/// assert_eq!(format!("{:?}", key), "ApiKey(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a new validated API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for ApiKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(*****)")
    }
}

/// A validated Xplenty account identifier.
///
/// The account id is the path segment that scopes most API resources
/// (`https://api.xplenty.com/{account_id}/api/...`). It must be non-empty
/// and must not contain `/` or whitespace.
///
/// # Serialization
///
/// `AccountId` serializes to and deserializes from a plain string:
///
/// ```rust
/// use xplenty_api::AccountId;
///
/// let account = AccountId::new("acme").unwrap();
/// let json = serde_json::to_string(&account).unwrap();
/// assert_eq!(json, r#""acme""#);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AccountId(String);

impl AccountId {
    /// Creates a new validated account id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAccountId`] if the id is empty or
    /// contains `/` or whitespace.
    pub fn new(account_id: impl Into<String>) -> Result<Self, ConfigError> {
        let account_id = account_id.into();
        let trimmed = account_id.trim();

        if trimmed.is_empty() || trimmed.contains('/') || trimmed.chars().any(char::is_whitespace)
        {
            return Err(ConfigError::InvalidAccountId { account_id });
        }

        Ok(Self(trimmed.to_string()))
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for AccountId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

/// A validated base URL (scheme + host + optional path).
///
/// Trailing slashes are stripped so paths can be appended with a single `/`.
///
/// # Example
///
/// ```rust
/// use xplenty_api::BaseUrl;
///
/// let url = BaseUrl::new("https://api.xplenty.com/").unwrap();
/// assert_eq!(url.as_ref(), "https://api.xplenty.com");
/// assert_eq!(url.scheme(), "https");
/// assert_eq!(url.host_name(), "api.xplenty.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    url: String,
    scheme_end: usize,
    host_end: usize,
}

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL has no scheme or
    /// no host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();
        let invalid = || ConfigError::InvalidBaseUrl { url: url.clone() };

        let scheme_end = url.find("://").ok_or_else(invalid)?;
        let scheme = &url[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }

        let host_start = scheme_end + 3;
        let remainder = url.get(host_start..).unwrap_or_default();
        let host_end = remainder
            .find([':', '/', '?', '#'])
            .map_or(url.len(), |i| host_start + i);
        if host_end <= host_start {
            return Err(invalid());
        }

        Ok(Self {
            url,
            scheme_end,
            host_end,
        })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.url[self.scheme_end + 3..self.host_end]
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// A base URL template with an `{account_id}` placeholder.
///
/// Resolved once per client against the configured [`AccountId`].
///
/// # Example
///
/// ```rust
/// use xplenty_api::{AccountId, AccountUrlTemplate};
///
/// let template = AccountUrlTemplate::new("https://api.xplenty.com/{account_id}/api/").unwrap();
/// let account = AccountId::new("acme").unwrap();
/// assert_eq!(template.resolve(&account).as_ref(), "https://api.xplenty.com/acme/api");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountUrlTemplate(String);

impl AccountUrlTemplate {
    /// The placeholder substituted with the account id.
    pub const PLACEHOLDER: &'static str = "{account_id}";

    /// Creates a new validated template.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingAccountPlaceholder`] if the template
    /// lacks the placeholder, or [`ConfigError::InvalidBaseUrl`] if the
    /// template does not resolve to a valid URL.
    pub fn new(template: impl Into<String>) -> Result<Self, ConfigError> {
        let template = template.into().trim().to_string();
        if !template.contains(Self::PLACEHOLDER) {
            return Err(ConfigError::MissingAccountPlaceholder { template });
        }
        BaseUrl::new(template.replace(Self::PLACEHOLDER, "account"))?;
        Ok(Self(template))
    }

    /// Substitutes the account id into the template.
    #[must_use]
    pub fn resolve(&self, account_id: &AccountId) -> BaseUrl {
        let url = self
            .0
            .replace(Self::PLACEHOLDER, account_id.as_ref())
            .trim_end_matches('/')
            .to_string();
        let scheme_end = url.find("://").unwrap_or_default();
        let host_start = scheme_end + 3;
        let host_end = url
            .get(host_start..)
            .and_then(|rest| rest.find([':', '/', '?', '#']))
            .map_or(url.len(), |i| host_start + i);
        BaseUrl {
            url,
            scheme_end,
            host_end,
        }
    }
}

impl AsRef<str> for AccountUrlTemplate {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_rejects_empty_string() {
        assert!(matches!(ApiKey::new(""), Err(ConfigError::EmptyApiKey)));
        assert!(matches!(ApiKey::new("   "), Err(ConfigError::EmptyApiKey)));
    }

    #[test]
    fn test_api_key_masks_value_in_debug() {
        let key = ApiKey::new("super-secret-key").unwrap();
        let debug_output = format!("{:?}", key);
        assert_eq!(debug_output, "ApiKey(*****)");
        assert!(!debug_output.contains("super-secret-key"));
    }

    #[test]
    fn test_account_id_trims_and_validates() {
        assert_eq!(AccountId::new(" acme ").unwrap().as_ref(), "acme");
        assert!(AccountId::new("").is_err());
        assert!(AccountId::new("ac me").is_err());
        assert!(AccountId::new("acme/api").is_err());
    }

    #[test]
    fn test_account_id_round_trip_serialization() {
        let original = AccountId::new("my-account").unwrap();
        let json = serde_json::to_string(&original).unwrap();
        let restored: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(original, restored);
        assert!(serde_json::from_str::<AccountId>(r#""a/b""#).is_err());
    }

    #[test]
    fn test_base_url_validates_format() {
        let url = BaseUrl::new("https://api.xplenty.com").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_name(), "api.xplenty.com");

        let url = BaseUrl::new("http://localhost:3000/").unwrap();
        assert_eq!(url.as_ref(), "http://localhost:3000");
        assert_eq!(url.host_name(), "localhost");

        let url = BaseUrl::new("https://api.xplenty.com/acme/api/").unwrap();
        assert_eq!(url.as_ref(), "https://api.xplenty.com/acme/api");
        assert_eq!(url.host_name(), "api.xplenty.com");
    }

    #[test]
    fn test_base_url_rejects_invalid() {
        assert!(BaseUrl::new("api.xplenty.com").is_err());
        assert!(BaseUrl::new("https://").is_err());
        assert!(BaseUrl::new("://api.xplenty.com").is_err());
    }

    #[test]
    fn test_account_url_template_requires_placeholder() {
        assert!(matches!(
            AccountUrlTemplate::new("https://api.xplenty.com/api"),
            Err(ConfigError::MissingAccountPlaceholder { .. })
        ));
        assert!(matches!(
            AccountUrlTemplate::new("{account_id}/api"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_account_url_template_resolves_account() {
        let template = AccountUrlTemplate::new("http://127.0.0.1:8080/{account_id}/api").unwrap();
        let url = template.resolve(&AccountId::new("acme").unwrap());
        assert_eq!(url.as_ref(), "http://127.0.0.1:8080/acme/api");
        assert_eq!(url.host_name(), "127.0.0.1");
        assert_eq!(url.scheme(), "http");
    }
}
