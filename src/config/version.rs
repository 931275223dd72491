//! Xplenty API protocol version definitions.
//!
//! The API negotiates its protocol revision through the `Accept` header. The
//! revisions also differ in how request bodies are encoded, so the version
//! selects a default [`BodyEncoding`].

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Vendor media type used for content negotiation.
pub const VENDOR_MEDIA_TYPE: &str = "application/vnd.xplenty+json";

/// Xplenty API protocol version.
///
/// # Example
///
/// ```rust
/// use xplenty_api::{BodyEncoding, ProtocolVersion};
///
/// let version = ProtocolVersion::latest();
/// assert_eq!(version.accept_header(), "application/vnd.xplenty+json; version=2");
/// assert_eq!(version.default_body_encoding(), BodyEncoding::Json);
///
/// let version: ProtocolVersion = "1".parse().unwrap();
/// assert_eq!(version.accept_header(), "application/vnd.xplenty+json");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProtocolVersion {
    /// The original, version-less protocol with form-encoded bodies.
    V1,
    /// The current protocol with JSON bodies.
    V2,
}

impl ProtocolVersion {
    /// Returns the latest protocol version.
    #[must_use]
    pub const fn latest() -> Self {
        Self::V2
    }

    /// Returns the `Accept` header value for this version.
    #[must_use]
    pub const fn accept_header(self) -> &'static str {
        match self {
            Self::V1 => VENDOR_MEDIA_TYPE,
            Self::V2 => "application/vnd.xplenty+json; version=2",
        }
    }

    /// Returns the request body encoding the server expects for this version.
    #[must_use]
    pub const fn default_body_encoding(self) -> BodyEncoding {
        match self {
            Self::V1 => BodyEncoding::Form,
            Self::V2 => BodyEncoding::Json,
        }
    }
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        Self::latest()
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => f.write_str("1"),
            Self::V2 => f.write_str("2"),
        }
    }
}

impl FromStr for ProtocolVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        match s.trim_start_matches('v') {
            "1" => Ok(Self::V1),
            "2" => Ok(Self::V2),
            _ => Err(ConfigError::InvalidProtocolVersion { version: s }),
        }
    }
}

/// How request bodies are serialized on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BodyEncoding {
    /// `application/json` bodies.
    Json,
    /// `application/x-www-form-urlencoded` bodies with bracketed nested keys
    /// under the entity's resource key, e.g. `job[variables][date]=...`.
    Form,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_version_parses_known_versions() {
        assert_eq!("1".parse::<ProtocolVersion>().unwrap(), ProtocolVersion::V1);
        assert_eq!("2".parse::<ProtocolVersion>().unwrap(), ProtocolVersion::V2);
        assert_eq!(" v2 ".parse::<ProtocolVersion>().unwrap(), ProtocolVersion::V2);
    }

    #[test]
    fn test_protocol_version_rejects_invalid() {
        assert!(matches!(
            "3".parse::<ProtocolVersion>(),
            Err(ConfigError::InvalidProtocolVersion { .. })
        ));
        assert!("".parse::<ProtocolVersion>().is_err());
    }

    #[test]
    fn test_protocol_version_display_round_trips() {
        for version in [ProtocolVersion::V1, ProtocolVersion::V2] {
            assert_eq!(version.to_string().parse::<ProtocolVersion>().unwrap(), version);
        }
    }

    #[test]
    fn test_accept_header_is_versionless_for_v1() {
        assert_eq!(ProtocolVersion::V1.accept_header(), VENDOR_MEDIA_TYPE);
        assert!(ProtocolVersion::V2.accept_header().ends_with("version=2"));
    }

    #[test]
    fn test_default_body_encoding_follows_version() {
        assert_eq!(ProtocolVersion::V1.default_body_encoding(), BodyEncoding::Form);
        assert_eq!(ProtocolVersion::V2.default_body_encoding(), BodyEncoding::Json);
        assert_eq!(ProtocolVersion::default(), ProtocolVersion::V2);
    }

    #[test]
    fn test_version_ordering() {
        assert!(ProtocolVersion::V1 < ProtocolVersion::V2);
    }
}
