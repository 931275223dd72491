//! Caller-supplied keyword arguments for resource operations.
//!
//! [`Params`] is an ordered map from argument name to JSON value. Convenience
//! methods check it against the target entity's [`Schema`] with
//! [`filtered`](Params::filtered) before any request is built, so a
//! misspelled argument fails fast instead of being silently ignored by the
//! server.
//!
//! # Example
//!
//! ```rust
//! use xplenty_api::rest::Params;
//!
//! let params = Params::new()
//!     .set("status", "available")
//!     .offset(40)
//!     .limit(20);
//!
//! let query = params.to_query();
//! assert_eq!(query.get("status").map(String::as_str), Some("available"));
//! assert_eq!(query.get("limit").map(String::as_str), Some("20"));
//! ```

use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::rest::errors::ResourceError;
use crate::rest::schema::Schema;

/// Query keys accepted by every listing in addition to schema fields.
pub const PAGINATION_KEYS: &[&str] = &["offset", "limit"];

/// The page size the server applies when no `limit` is given.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Keyword arguments for a resource operation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Params(Map<String, Value>);

impl Params {
    /// Creates an empty argument set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an argument.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Sets a timestamp argument, serialized as RFC 3339.
    #[must_use]
    pub fn set_timestamp(self, key: impl Into<String>, value: DateTime<Utc>) -> Self {
        self.set(key, value.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    /// Sets an argument in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns an argument by name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Sets the number of records to skip.
    #[must_use]
    pub fn offset(self, offset: u32) -> Self {
        self.set("offset", offset)
    }

    /// Sets the maximum number of records to return.
    #[must_use]
    pub fn limit(self, limit: u32) -> Self {
        self.set("limit", limit)
    }

    /// Iterates over the arguments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Returns `true` if no argument is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the underlying map.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Checks every argument against `schema` and `allowed_extra`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedArgument`] naming the first key
    /// that is neither a declared field nor in `allowed_extra`.
    pub fn filtered(
        &self,
        schema: &Schema,
        allowed_extra: &[&str],
    ) -> Result<Map<String, Value>, ResourceError> {
        if let Some(key) = self
            .0
            .keys()
            .find(|key| !schema.contains(key) && !allowed_extra.contains(&key.as_str()))
        {
            return Err(ResourceError::UnexpectedArgument {
                resource: schema.name,
                argument: key.clone(),
            });
        }
        Ok(self.0.clone())
    }

    /// Renders the arguments as query parameters.
    ///
    /// Strings are sent as-is; booleans become `1`/`0` and nulls are
    /// skipped.
    #[must_use]
    pub fn to_query(&self) -> HashMap<String, String> {
        self.0
            .iter()
            .filter_map(|(key, value)| {
                let text = match value {
                    Value::Null => return None,
                    Value::String(s) => s.clone(),
                    Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
                    other => other.to_string(),
                };
                Some((key.clone(), text))
            })
            .collect()
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
