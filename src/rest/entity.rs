//! Typed entities generated from field tables.
//!
//! An [`Entity`] is a struct with one `Option` field per schema field. The
//! [`entity!`](crate::entity) macro writes both from a single declaration, so
//! the struct and its [`Schema`] cannot drift apart:
//!
//! ```rust
//! use xplenty_api::entity;
//! use xplenty_api::rest::Entity;
//!
//! entity! {
//!     #[entity(key = "stack", path = "stacks", primary_key = "id")]
//!     /// A software stack clusters can run.
//!     pub struct Stack {
//!         id: Str,
//!         name: Str,
//!     }
//! }
//!
//! let stack = Stack::from_raw(Some(&serde_json::json!({"id": "pinot"})), &Default::default());
//! assert_eq!(stack.id.as_deref(), Some("pinot"));
//! assert!(stack.name.is_none());
//! ```
//!
//! Field kinds are `Str`, `Int`, `Float`, `Bool`, `Timestamp`, `Object`,
//! `List`, `Nested<T>` and `NestedList<T>`. A field whose wire name is not a
//! Rust identifier is declared as `kind as "type": Str`. `base = Short`
//! places the entity under the account-agnostic base URL.
//!
//! Typed population goes raw → [`Record`] → struct, so the lenient
//! conversion rules of [`populate`] apply unchanged.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::clients::ApiBase;
use crate::rest::client::XplentyClient;
use crate::rest::errors::ResourceError;
use crate::rest::mapper::{populate, populate_with, CoercionError, CoercionMode, Record};
use crate::rest::params::Params;
use crate::rest::path::ResourcePath;
use crate::rest::schema::Schema;

/// A typed, schema-populated API entity.
pub trait Entity:
    Serialize + DeserializeOwned + Default + Clone + fmt::Debug + Send + Sync + Sized
{
    /// The collection path of the resource (e.g., "clusters").
    const PATH: &'static str;

    /// The base URL the resource lives under.
    const BASE: ApiBase;

    /// Returns the entity's field table.
    fn schema() -> &'static Schema;

    /// Builds the typed entity from a populated record.
    ///
    /// Record values always match the declared kinds, so this only falls
    /// back to `Default` if the struct and schema disagree.
    #[must_use]
    fn from_record(record: &Record) -> Self {
        serde_json::from_value(record.to_json()).unwrap_or_else(|e| {
            tracing::warn!(
                "Cannot build {} from populated record: {}",
                Self::schema().name,
                e
            );
            Self::default()
        })
    }

    /// Populates the entity from a raw JSON value, leniently.
    #[must_use]
    fn from_raw(raw: Option<&Value>, overrides: &Map<String, Value>) -> Self {
        Self::from_record(&populate(Self::schema(), raw, overrides))
    }

    /// Populates the entity using the given coercion mode.
    ///
    /// # Errors
    ///
    /// Returns [`CoercionError`] in [`CoercionMode::Strict`] when any field
    /// fails conversion.
    fn try_from_raw(
        raw: Option<&Value>,
        overrides: &Map<String, Value>,
        mode: CoercionMode,
    ) -> Result<Self, CoercionError> {
        populate_with(mode, Self::schema(), raw, overrides).map(|record| Self::from_record(&record))
    }

    /// Converts the entity back into a record.
    #[must_use]
    fn to_record(&self) -> Record {
        let raw = serde_json::to_value(self).ok();
        populate(Self::schema(), raw.as_ref(), &Map::new())
    }

    /// Returns the primary key value, if the entity has one and it is set.
    #[must_use]
    fn primary_key(&self) -> Option<Value> {
        let pk = Self::schema().primary_key?;
        let value = serde_json::to_value(self).ok()?;
        value.get(pk).filter(|v| !v.is_null()).cloned()
    }

    /// Returns `PATH/{primary key}`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] when the primary key is unset.
    fn member_path(&self) -> Result<ResourcePath, ResourceError> {
        let id = self.primary_key().ok_or(ResourceError::MissingId {
            resource: Self::schema().name,
        })?;
        Ok(ResourcePath::new(Self::PATH).join(key_segment(&id)))
    }
}

/// An entity that can be deleted through the API.
pub trait Removable: Entity {
    /// Deletes the entity, returning `true` when the server answered 2xx.
    ///
    /// The default sends `DELETE PATH/{primary key}`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] without a primary key, or the
    /// HTTP error of a failed call.
    fn delete(&self, client: &XplentyClient) -> Result<bool, ResourceError> {
        client.remove(Self::BASE, self.member_path()?)
    }
}

/// An entity that can be created through the API from keyword arguments.
pub trait Creatable: Entity {
    /// Creates a new entity.
    ///
    /// `context` carries arguments inherited from the collection the entity
    /// is added to (e.g., the parent `package_id` of a validation).
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedArgument`] for unknown keys, or the
    /// HTTP error of a failed call.
    fn create(
        client: &XplentyClient,
        context: &Map<String, Value>,
        params: Params,
    ) -> Result<Self, ResourceError>;
}

/// Renders a primary key value as a path segment.
#[must_use]
pub fn key_segment(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Declares an [`Entity`] struct and its [`Schema`] from one field list.
///
/// See the [module documentation](crate::rest::entity) for the syntax. The
/// invoking crate must depend on `serde` with the `derive` feature.
#[macro_export]
macro_rules! entity {
    (
        #[entity(key = $key:literal, path = $path:literal $(, base = $base:ident)? $(, primary_key = $pk:literal)? $(,)?)]
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $field:ident $(as $wire:literal)? : $kind:ident $(<$nested:ty>)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $(#[serde(rename = $wire)])?
                pub $field: ::core::option::Option<$crate::entity_field_type!($kind $(<$nested>)?)>,
            )*
        }

        impl $crate::rest::Entity for $name {
            const PATH: &'static str = $path;
            const BASE: $crate::clients::ApiBase = $crate::entity_base!($($base)?);

            fn schema() -> &'static $crate::rest::Schema {
                static SCHEMA: $crate::rest::Schema = $crate::rest::Schema {
                    name: ::core::stringify!($name),
                    key: $key,
                    primary_key: $crate::entity_primary_key!($($pk)?),
                    fields: &[
                        $(
                            $crate::rest::Field {
                                name: $crate::entity_wire_name!($field $($wire)?),
                                kind: $crate::entity_field_kind!($kind $(<$nested>)?),
                            },
                        )*
                    ],
                };
                &SCHEMA
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! entity_field_type {
    (Str) => { ::std::string::String };
    (Int) => { i64 };
    (Float) => { f64 };
    (Bool) => { bool };
    (Timestamp) => { ::chrono::DateTime<::chrono::Utc> };
    (Object) => { ::serde_json::Map<::std::string::String, ::serde_json::Value> };
    (List) => { ::std::vec::Vec<::serde_json::Value> };
    (Nested<$t:ty>) => { $t };
    (NestedList<$t:ty>) => { ::std::vec::Vec<$t> };
}

#[doc(hidden)]
#[macro_export]
macro_rules! entity_field_kind {
    (Str) => { $crate::rest::FieldKind::Str };
    (Int) => { $crate::rest::FieldKind::Int };
    (Float) => { $crate::rest::FieldKind::Float };
    (Bool) => { $crate::rest::FieldKind::Bool };
    (Timestamp) => { $crate::rest::FieldKind::Timestamp };
    (Object) => { $crate::rest::FieldKind::Object };
    (List) => { $crate::rest::FieldKind::List };
    (Nested<$t:ty>) => {
        $crate::rest::FieldKind::Nested(<$t as $crate::rest::Entity>::schema)
    };
    (NestedList<$t:ty>) => {
        $crate::rest::FieldKind::NestedList(<$t as $crate::rest::Entity>::schema)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! entity_wire_name {
    ($field:ident) => { ::core::stringify!($field) };
    ($field:ident $wire:literal) => { $wire };
}

#[doc(hidden)]
#[macro_export]
macro_rules! entity_primary_key {
    () => { ::core::option::Option::None };
    ($pk:literal) => { ::core::option::Option::Some($pk) };
}

#[doc(hidden)]
#[macro_export]
macro_rules! entity_base {
    () => { $crate::clients::ApiBase::Account };
    ($base:ident) => { $crate::clients::ApiBase::$base };
}
