//! Configuration types for the Xplenty API client.
//!
//! This module provides the configuration used to construct an
//! [`XplentyClient`](crate::XplentyClient). Everything that varied between
//! protocol revisions (base URLs, negotiation headers, body encoding, allowed
//! methods) lives in one immutable [`XplentyConfig`] value.
//!
//! # Overview
//!
//! - [`XplentyConfig`]: The main configuration struct
//! - [`XplentyConfigBuilder`]: A builder for constructing [`XplentyConfig`] instances
//! - [`ApiKey`]: A validated API key with masked debug output
//! - [`AccountId`]: A validated account identifier
//! - [`BaseUrl`] / [`AccountUrlTemplate`]: Validated base URLs
//! - [`ProtocolVersion`] / [`BodyEncoding`]: Wire protocol selection
//!
//! # Example
//!
//! ```rust
//! use xplenty_api::{AccountId, ApiKey, XplentyConfig};
//!
//! let config = XplentyConfig::builder()
//!     .account_id(AccountId::new("acme").unwrap())
//!     .api_key(ApiKey::new("my-api-key").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.account_base_url().as_ref(), "https://api.xplenty.com/acme/api");
//! ```

mod newtypes;
mod version;

pub use newtypes::{AccountId, AccountUrlTemplate, ApiKey, BaseUrl};
pub use version::{BodyEncoding, ProtocolVersion, VENDOR_MEDIA_TYPE};

use std::time::Duration;

use crate::clients::HttpMethod;
use crate::error::ConfigError;
use crate::rest::CoercionMode;

/// Default account-scoped base URL template.
pub const DEFAULT_ACCOUNT_URL: &str = "https://api.xplenty.com/{account_id}/api";

/// Default account-agnostic base URL for user and account management.
pub const DEFAULT_SHORT_URL: &str = "https://api.xplenty.com";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the account id.
pub const ENV_ACCOUNT_ID: &str = "XPLENTY_ACCOUNT_ID";

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "XPLENTY_API_KEY";

/// Optional environment variable overriding the account URL template.
pub const ENV_API_URL: &str = "XPLENTY_API_URL";

/// Configuration for the Xplenty API client.
///
/// # Thread Safety
///
/// `XplentyConfig` is `Clone`, `Send`, and `Sync`.
///
/// # Example
///
/// ```rust
/// use xplenty_api::{AccountId, ApiKey, BodyEncoding, ProtocolVersion, XplentyConfig};
///
/// let config = XplentyConfig::builder()
///     .account_id(AccountId::new("acme").unwrap())
///     .api_key(ApiKey::new("key").unwrap())
///     .protocol_version(ProtocolVersion::V1)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.body_encoding(), BodyEncoding::Form);
/// ```
#[derive(Clone, Debug)]
pub struct XplentyConfig {
    account_id: AccountId,
    api_key: ApiKey,
    account_url: AccountUrlTemplate,
    short_url: BaseUrl,
    protocol_version: ProtocolVersion,
    body_encoding: BodyEncoding,
    allowed_methods: Vec<HttpMethod>,
    timeout: Duration,
    coercion: CoercionMode,
    user_agent_prefix: Option<String>,
}

impl XplentyConfig {
    /// Creates a new builder for constructing an `XplentyConfig`.
    #[must_use]
    pub fn builder() -> XplentyConfigBuilder {
        XplentyConfigBuilder::new()
    }

    /// Builds a configuration from `XPLENTY_ACCOUNT_ID`, `XPLENTY_API_KEY`
    /// and the optional `XPLENTY_API_URL` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when a required variable is
    /// unset, or the validation error of the offending value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let account_id = lookup(ENV_ACCOUNT_ID).ok_or(ConfigError::MissingEnvVar {
            name: ENV_ACCOUNT_ID,
        })?;
        let api_key = lookup(ENV_API_KEY).ok_or(ConfigError::MissingEnvVar { name: ENV_API_KEY })?;

        let mut builder = Self::builder()
            .account_id(AccountId::new(account_id)?)
            .api_key(ApiKey::new(api_key)?);
        if let Some(template) = lookup(ENV_API_URL) {
            builder = builder.account_url(AccountUrlTemplate::new(template)?);
        }
        builder.build()
    }

    /// Returns the account id.
    #[must_use]
    pub const fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    /// Returns the API key.
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Returns the account URL template.
    #[must_use]
    pub const fn account_url(&self) -> &AccountUrlTemplate {
        &self.account_url
    }

    /// Returns the account-scoped base URL with the account id substituted.
    #[must_use]
    pub fn account_base_url(&self) -> BaseUrl {
        self.account_url.resolve(&self.account_id)
    }

    /// Returns the account-agnostic base URL.
    #[must_use]
    pub const fn short_url(&self) -> &BaseUrl {
        &self.short_url
    }

    /// Returns the protocol version.
    #[must_use]
    pub const fn protocol_version(&self) -> ProtocolVersion {
        self.protocol_version
    }

    /// Returns the request body encoding.
    #[must_use]
    pub const fn body_encoding(&self) -> BodyEncoding {
        self.body_encoding
    }

    /// Returns the HTTP methods the client is allowed to send.
    #[must_use]
    pub fn allowed_methods(&self) -> &[HttpMethod] {
        &self.allowed_methods
    }

    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns how response fields that fail conversion are handled.
    #[must_use]
    pub const fn coercion(&self) -> CoercionMode {
        self.coercion
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify XplentyConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<XplentyConfig>();
};

/// Builder for constructing [`XplentyConfig`] instances.
///
/// Required fields are `account_id` and `api_key`.
///
/// # Defaults
///
/// - `account_url`: [`DEFAULT_ACCOUNT_URL`]
/// - `short_url`: [`DEFAULT_SHORT_URL`]
/// - `protocol_version`: [`ProtocolVersion::latest()`]
/// - `body_encoding`: the protocol version's default
/// - `allowed_methods`: GET, POST, PUT, DELETE
/// - `timeout`: [`DEFAULT_TIMEOUT`]
/// - `coercion`: [`CoercionMode::Lenient`]
#[derive(Debug, Default)]
pub struct XplentyConfigBuilder {
    account_id: Option<AccountId>,
    api_key: Option<ApiKey>,
    account_url: Option<AccountUrlTemplate>,
    short_url: Option<BaseUrl>,
    protocol_version: Option<ProtocolVersion>,
    body_encoding: Option<BodyEncoding>,
    allowed_methods: Option<Vec<HttpMethod>>,
    timeout: Option<Duration>,
    coercion: Option<CoercionMode>,
    user_agent_prefix: Option<String>,
}

impl XplentyConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the account id (required).
    #[must_use]
    pub fn account_id(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Sets the account-scoped base URL template.
    #[must_use]
    pub fn account_url(mut self, template: AccountUrlTemplate) -> Self {
        self.account_url = Some(template);
        self
    }

    /// Sets the account-agnostic base URL.
    #[must_use]
    pub fn short_url(mut self, url: BaseUrl) -> Self {
        self.short_url = Some(url);
        self
    }

    /// Sets the protocol version.
    #[must_use]
    pub const fn protocol_version(mut self, version: ProtocolVersion) -> Self {
        self.protocol_version = Some(version);
        self
    }

    /// Overrides the body encoding implied by the protocol version.
    #[must_use]
    pub const fn body_encoding(mut self, encoding: BodyEncoding) -> Self {
        self.body_encoding = Some(encoding);
        self
    }

    /// Restricts the HTTP methods the client may send.
    #[must_use]
    pub fn allowed_methods(mut self, methods: impl Into<Vec<HttpMethod>>) -> Self {
        self.allowed_methods = Some(methods.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets how response fields that fail conversion are handled.
    #[must_use]
    pub const fn coercion(mut self, mode: CoercionMode) -> Self {
        self.coercion = Some(mode);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`XplentyConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `account_id` or
    /// `api_key` are not set.
    pub fn build(self) -> Result<XplentyConfig, ConfigError> {
        let account_id = self.account_id.ok_or(ConfigError::MissingRequiredField {
            field: "account_id",
        })?;
        let api_key = self
            .api_key
            .ok_or(ConfigError::MissingRequiredField { field: "api_key" })?;

        let account_url = match self.account_url {
            Some(template) => template,
            None => AccountUrlTemplate::new(DEFAULT_ACCOUNT_URL)?,
        };
        let short_url = match self.short_url {
            Some(url) => url,
            None => BaseUrl::new(DEFAULT_SHORT_URL)?,
        };
        let protocol_version = self.protocol_version.unwrap_or_default();

        Ok(XplentyConfig {
            account_id,
            api_key,
            account_url,
            short_url,
            protocol_version,
            body_encoding: self
                .body_encoding
                .unwrap_or_else(|| protocol_version.default_body_encoding()),
            allowed_methods: self.allowed_methods.unwrap_or_else(|| {
                vec![
                    HttpMethod::Get,
                    HttpMethod::Post,
                    HttpMethod::Put,
                    HttpMethod::Delete,
                ]
            }),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            coercion: self.coercion.unwrap_or_default(),
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn minimal() -> XplentyConfigBuilder {
        XplentyConfig::builder()
            .account_id(AccountId::new("acme").unwrap())
            .api_key(ApiKey::new("key").unwrap())
    }

    #[test]
    fn test_builder_requires_account_id() {
        let result = XplentyConfigBuilder::new()
            .api_key(ApiKey::new("key").unwrap())
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField {
                field: "account_id"
            })
        ));
    }

    #[test]
    fn test_builder_requires_api_key() {
        let result = XplentyConfigBuilder::new()
            .account_id(AccountId::new("acme").unwrap())
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "api_key" })
        ));
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = minimal().build().unwrap();

        assert_eq!(config.protocol_version(), ProtocolVersion::V2);
        assert_eq!(config.body_encoding(), BodyEncoding::Json);
        assert_eq!(config.short_url().as_ref(), DEFAULT_SHORT_URL);
        assert_eq!(
            config.account_base_url().as_ref(),
            "https://api.xplenty.com/acme/api"
        );
        assert_eq!(config.allowed_methods().len(), 4);
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(config.coercion(), CoercionMode::Lenient);
        assert!(config.user_agent_prefix().is_none());
    }

    #[test]
    fn test_v1_defaults_to_form_encoding_unless_overridden() {
        let config = minimal()
            .protocol_version(ProtocolVersion::V1)
            .build()
            .unwrap();
        assert_eq!(config.body_encoding(), BodyEncoding::Form);

        let config = minimal()
            .protocol_version(ProtocolVersion::V1)
            .body_encoding(BodyEncoding::Json)
            .build()
            .unwrap();
        assert_eq!(config.body_encoding(), BodyEncoding::Json);
    }

    #[test]
    fn test_builder_with_all_optional_fields() {
        let config = minimal()
            .account_url(AccountUrlTemplate::new("http://localhost:9000/{account_id}/api").unwrap())
            .short_url(BaseUrl::new("http://localhost:9000").unwrap())
            .allowed_methods([HttpMethod::Get])
            .timeout(Duration::from_secs(5))
            .coercion(CoercionMode::Strict)
            .user_agent_prefix("MyApp/1.0")
            .build()
            .unwrap();

        assert_eq!(
            config.account_base_url().as_ref(),
            "http://localhost:9000/acme/api"
        );
        assert_eq!(config.allowed_methods(), &[HttpMethod::Get]);
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.coercion(), CoercionMode::Strict);
        assert_eq!(config.user_agent_prefix(), Some("MyApp/1.0"));
    }

    #[test]
    fn test_config_debug_masks_api_key() {
        let config = XplentyConfig::builder()
            .account_id(AccountId::new("acme").unwrap())
            .api_key(ApiKey::new("very-secret").unwrap())
            .build()
            .unwrap();

        let debug_str = format!("{:?}", config.clone());
        assert!(debug_str.contains("XplentyConfig"));
        assert!(!debug_str.contains("very-secret"));
    }

    #[test]
    fn test_from_lookup_reads_variables() {
        let vars: HashMap<&str, &str> = [
            (ENV_ACCOUNT_ID, "acme"),
            (ENV_API_KEY, "key"),
            (ENV_API_URL, "http://localhost:1234/{account_id}/api"),
        ]
        .into_iter()
        .collect();

        let config = XplentyConfig::from_lookup(|name| vars.get(name).map(ToString::to_string))
            .unwrap();

        assert_eq!(config.account_id().as_ref(), "acme");
        assert_eq!(
            config.account_base_url().as_ref(),
            "http://localhost:1234/acme/api"
        );
    }

    #[test]
    fn test_from_lookup_reports_missing_variable() {
        let result = XplentyConfig::from_lookup(|name| {
            (name == ENV_ACCOUNT_ID).then(|| "acme".to_string())
        });
        assert!(matches!(
            result,
            Err(ConfigError::MissingEnvVar { name: ENV_API_KEY })
        ));
    }
}
