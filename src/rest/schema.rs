//! Static field tables describing how raw API objects map onto entities.
//!
//! Every entity type owns one [`Schema`]: its wire field names, the
//! [`FieldKind`] each one converts to, and the optional primary key. The
//! table is data; [`populate`](crate::rest::populate) is the single routine
//! that interprets it.
//!
//! Schemas are normally generated by the [`entity!`](crate::entity) macro,
//! but can be written by hand:
//!
//! ```rust
//! use xplenty_api::rest::{Field, FieldKind, Schema};
//!
//! static REGION: Schema = Schema {
//!     name: "Region",
//!     key: "region",
//!     primary_key: Some("id"),
//!     fields: &[
//!         Field { name: "id", kind: FieldKind::Str },
//!         Field { name: "name", kind: FieldKind::Str },
//!     ],
//! };
//!
//! assert!(REGION.contains("name"));
//! assert_eq!(REGION.field("id").map(|f| f.kind.label()), Some("string"));
//! ```

use std::fmt;

/// Conversion applied to a raw value for one declared field.
#[derive(Clone, Copy)]
pub enum FieldKind {
    /// Text, copied as-is. Scalar non-strings are rendered as text.
    Str,
    /// Signed integer.
    Int,
    /// Floating point number.
    Float,
    /// Boolean following the truthiness of the raw value.
    Bool,
    /// Date and time, parsed from any common textual format.
    Timestamp,
    /// Free-form JSON object, copied without transformation.
    Object,
    /// JSON array, copied without transformation.
    List,
    /// A single sub-entity mapped with the nested schema.
    Nested(fn() -> &'static Schema),
    /// A list of sub-entities, each mapped with the nested schema.
    NestedList(fn() -> &'static Schema),
}

impl FieldKind {
    /// Returns a short human-readable name for the kind.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Str => "string",
            Self::Int => "integer",
            Self::Float => "float",
            Self::Bool => "boolean",
            Self::Timestamp => "timestamp",
            Self::Object => "object",
            Self::List => "list",
            Self::Nested(_) => "nested",
            Self::NestedList(_) => "nested list",
        }
    }
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nested(schema) => write!(f, "Nested({})", schema().name),
            Self::NestedList(schema) => write!(f, "NestedList({})", schema().name),
            other => f.write_str(other.label()),
        }
    }
}

/// One declared field.
#[derive(Clone, Copy, Debug)]
pub struct Field {
    /// The field name as it appears on the wire.
    pub name: &'static str,
    /// How the raw value is converted.
    pub kind: FieldKind,
}

/// The field table of one entity type.
#[derive(Debug)]
pub struct Schema {
    /// The entity type name (e.g., "Cluster").
    pub name: &'static str,
    /// The singular resource key used to nest form bodies (e.g., "cluster").
    pub key: &'static str,
    /// The primary key field, if the entity has one.
    pub primary_key: Option<&'static str>,
    /// All declared fields, in declaration order.
    pub fields: &'static [Field],
}

impl Schema {
    /// Looks up a declared field by wire name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Returns the position of a declared field.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    /// Returns `true` if `name` is a declared field.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Iterates over the declared field names.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static CHILD: Schema = Schema {
        name: "Child",
        key: "child",
        primary_key: None,
        fields: &[Field {
            name: "i",
            kind: FieldKind::Int,
        }],
    };

    fn child() -> &'static Schema {
        &CHILD
    }

    static PARENT: Schema = Schema {
        name: "Parent",
        key: "parent",
        primary_key: Some("id"),
        fields: &[
            Field {
                name: "id",
                kind: FieldKind::Int,
            },
            Field {
                name: "children",
                kind: FieldKind::NestedList(child),
            },
        ],
    };

    #[test]
    fn test_field_lookup() {
        assert_eq!(PARENT.index_of("children"), Some(1));
        assert!(PARENT.contains("id"));
        assert!(!PARENT.contains("missing"));
        assert!(PARENT.field("missing").is_none());
    }

    #[test]
    fn test_field_names_in_declaration_order() {
        let names: Vec<_> = PARENT.field_names().collect();
        assert_eq!(names, vec!["id", "children"]);
    }

    #[test]
    fn test_nested_kind_debug_names_sub_schema() {
        let kind = PARENT.field("children").unwrap().kind;
        assert_eq!(format!("{kind:?}"), "NestedList(Child)");
        assert_eq!(kind.label(), "nested list");
    }
}
