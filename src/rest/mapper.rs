//! Schema-driven mapping from raw JSON objects to entities.
//!
//! [`populate`] is a total function: for any schema and any raw value it
//! returns a [`Record`] in which every declared field exists, either holding
//! a converted value or absent. Values that fail conversion (a malformed
//! date, a non-numeric string in an integer field) become absent and are
//! logged at `debug` level.
//!
//! [`populate_strict`] runs the same conversion but reports every failed
//! field as a [`CoercionError`] instead of dropping it.
//!
//! # Example
//!
//! ```rust
//! use serde_json::{json, Map};
//! use xplenty_api::rest::{populate, Field, FieldKind, Schema};
//!
//! static SAMPLE: Schema = Schema {
//!     name: "Sample",
//!     key: "sample",
//!     primary_key: None,
//!     fields: &[
//!         Field { name: "i", kind: FieldKind::Int },
//!         Field { name: "d", kind: FieldKind::Timestamp },
//!     ],
//! };
//!
//! let record = populate(&SAMPLE, Some(&json!({"i": "12", "d": "not-a-date"})), &Map::new());
//! assert_eq!(record.get("i").and_then(|v| v.as_i64()), Some(12));
//! assert!(record.is_absent("d"));
//! ```

use chrono::{DateTime, Utc};
use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::rest::schema::{FieldKind, Schema};

/// How field conversion failures are handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CoercionMode {
    /// Failed conversions become absent values.
    #[default]
    Lenient,
    /// Failed conversions are reported as a [`CoercionError`].
    Strict,
}

/// A field whose raw value could not be converted.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldFailure {
    /// Dotted path to the field (`instances[1].instance_id`).
    pub field: String,
    /// The kind the value should have converted to.
    pub expected: &'static str,
    /// The raw value that was rejected.
    pub raw: Value,
}

/// Returned by [`populate_strict`] when at least one field failed conversion.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("{} field(s) of {entity} could not be converted: {}", failures.len(), field_list(failures))]
pub struct CoercionError {
    /// The entity type being populated.
    pub entity: &'static str,
    /// Every failed field.
    pub failures: Vec<FieldFailure>,
}

fn field_list(failures: &[FieldFailure]) -> String {
    failures
        .iter()
        .map(|failure| failure.field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A converted field value.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// A string field.
    Str(String),
    /// An integer field.
    Int(i64),
    /// A float field.
    Float(f64),
    /// A boolean field.
    Bool(bool),
    /// A timestamp field.
    Timestamp(DateTime<Utc>),
    /// A free-form object field.
    Object(Map<String, Value>),
    /// A list field.
    List(Vec<Value>),
    /// A nested sub-entity.
    Nested(Box<Record>),
    /// A list of nested sub-entities.
    NestedList(Vec<Record>),
}

impl FieldValue {
    /// Returns the string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer value.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the float value.
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the timestamp value.
    #[must_use]
    pub const fn as_timestamp(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::Timestamp(t) => Some(t),
            _ => None,
        }
    }

    /// Returns the nested record.
    #[must_use]
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Nested(record) => Some(record),
            _ => None,
        }
    }

    /// Returns the nested records.
    #[must_use]
    pub fn as_records(&self) -> Option<&[Record]> {
        match self {
            Self::NestedList(records) => Some(records),
            _ => None,
        }
    }

    /// Renders the value back to JSON. Timestamps become RFC 3339 strings.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Str(s) => Value::String(s.clone()),
            Self::Int(i) => Value::from(*i),
            Self::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            Self::Bool(b) => Value::Bool(*b),
            Self::Timestamp(t) => Value::String(t.to_rfc3339()),
            Self::Object(map) => Value::Object(map.clone()),
            Self::List(items) => Value::Array(items.clone()),
            Self::Nested(record) => record.to_json(),
            Self::NestedList(records) => Value::Array(records.iter().map(Record::to_json).collect()),
        }
    }

    /// Renders the value as the text used for primary key comparison.
    #[must_use]
    pub fn key_text(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            other => other.to_json().to_string(),
        }
    }
}

/// A schema-bound attribute bag.
///
/// Every declared field exists from construction and starts absent.
/// Overrides naming undeclared fields are kept as extras.
#[derive(Clone, Debug)]
pub struct Record {
    schema: &'static Schema,
    values: Vec<Option<FieldValue>>,
    extras: Map<String, Value>,
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.schema, other.schema)
            && self.values == other.values
            && self.extras == other.extras
    }
}

impl Record {
    /// Creates a record with every declared field absent.
    #[must_use]
    pub fn new(schema: &'static Schema) -> Self {
        Self {
            schema,
            values: vec![None; schema.fields.len()],
            extras: Map::new(),
        }
    }

    /// Returns the record's schema.
    #[must_use]
    pub const fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// Returns the value of a declared field, or `None` when it is absent
    /// or not declared.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.schema
            .index_of(name)
            .and_then(|index| self.values[index].as_ref())
    }

    /// Returns `true` when `name` is declared and holds no value.
    #[must_use]
    pub fn is_absent(&self, name: &str) -> bool {
        self.schema
            .index_of(name)
            .is_some_and(|index| self.values[index].is_none())
    }

    /// Returns the value of the primary key field.
    #[must_use]
    pub fn primary_key(&self) -> Option<&FieldValue> {
        self.schema.primary_key.and_then(|pk| self.get(pk))
    }

    /// Returns override values for names the schema does not declare.
    #[must_use]
    pub const fn extras(&self) -> &Map<String, Value> {
        &self.extras
    }

    /// Iterates over `(field name, value)` in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Option<&FieldValue>)> + '_ {
        self.schema
            .fields
            .iter()
            .zip(&self.values)
            .map(|(field, value)| (field.name, value.as_ref()))
    }

    /// Assigns a raw value, converting it with the field's kind.
    ///
    /// Undeclared names are stored as extras. Returns `false` when the value
    /// failed conversion and the field was left absent.
    pub fn set(&mut self, name: &str, raw: &Value) -> bool {
        let Some(index) = self.schema.index_of(name) else {
            self.extras.insert(name.to_string(), raw.clone());
            return true;
        };
        let kind = self.schema.fields[index].kind;
        let mut failures = Vec::new();
        self.values[index] = convert(kind, raw, name, &mut failures);
        failures.is_empty()
    }

    /// Renders the declared fields as a JSON object; absent fields are `null`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(name, value)| {
                    (
                        name.to_string(),
                        value.map_or(Value::Null, FieldValue::to_json),
                    )
                })
                .collect(),
        )
    }
}

/// Populates a record from a raw value, dropping fields that fail conversion.
///
/// `raw` may be `None` or a non-object; the result then has every field
/// absent. `overrides` are applied last and always win.
#[must_use]
pub fn populate(schema: &'static Schema, raw: Option<&Value>, overrides: &Map<String, Value>) -> Record {
    let mut failures = Vec::new();
    let record = populate_into(schema, raw, overrides, "", &mut failures);
    for failure in &failures {
        tracing::debug!(
            "Dropping {}.{}: cannot convert {} to {}",
            schema.name,
            failure.field,
            failure.raw,
            failure.expected
        );
    }
    record
}

/// Populates a record, reporting every field that fails conversion.
///
/// # Errors
///
/// Returns [`CoercionError`] listing each present value that could not be
/// converted to its declared kind.
pub fn populate_strict(
    schema: &'static Schema,
    raw: Option<&Value>,
    overrides: &Map<String, Value>,
) -> Result<Record, CoercionError> {
    let mut failures = Vec::new();
    let record = populate_into(schema, raw, overrides, "", &mut failures);
    if failures.is_empty() {
        Ok(record)
    } else {
        Err(CoercionError {
            entity: schema.name,
            failures,
        })
    }
}

/// Populates with the given mode.
///
/// # Errors
///
/// Returns [`CoercionError`] only in [`CoercionMode::Strict`].
pub fn populate_with(
    mode: CoercionMode,
    schema: &'static Schema,
    raw: Option<&Value>,
    overrides: &Map<String, Value>,
) -> Result<Record, CoercionError> {
    match mode {
        CoercionMode::Lenient => Ok(populate(schema, raw, overrides)),
        CoercionMode::Strict => populate_strict(schema, raw, overrides),
    }
}

fn populate_into(
    schema: &'static Schema,
    raw: Option<&Value>,
    overrides: &Map<String, Value>,
    prefix: &str,
    failures: &mut Vec<FieldFailure>,
) -> Record {
    let mut record = Record::new(schema);

    if let Some(Value::Object(map)) = raw {
        for (index, field) in schema.fields.iter().enumerate() {
            if let Some(value) = map.get(field.name) {
                let path = join_path(prefix, field.name);
                record.values[index] = convert(field.kind, value, &path, failures);
            }
        }
    }

    for (name, value) in overrides {
        match schema.index_of(name) {
            Some(index) => {
                let path = join_path(prefix, name);
                record.values[index] = convert(schema.fields[index].kind, value, &path, failures);
            }
            None => {
                record.extras.insert(name.clone(), value.clone());
            }
        }
    }

    record
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn convert(
    kind: FieldKind,
    raw: &Value,
    path: &str,
    failures: &mut Vec<FieldFailure>,
) -> Option<FieldValue> {
    if raw.is_null() {
        return None;
    }

    let converted = match kind {
        FieldKind::Str => Some(FieldValue::Str(to_text(raw))),
        FieldKind::Int => to_int(raw).map(FieldValue::Int),
        FieldKind::Float => to_float(raw).map(FieldValue::Float),
        FieldKind::Bool => Some(FieldValue::Bool(truthy(raw))),
        FieldKind::Timestamp => to_timestamp(raw).map(FieldValue::Timestamp),
        FieldKind::Object => raw.as_object().cloned().map(FieldValue::Object),
        FieldKind::List => raw.as_array().cloned().map(FieldValue::List),
        FieldKind::Nested(schema) => match raw {
            Value::Object(_) => Some(FieldValue::Nested(Box::new(populate_into(
                schema(),
                Some(raw),
                &Map::new(),
                path,
                failures,
            )))),
            _ => None,
        },
        FieldKind::NestedList(schema) => raw.as_array().map(|items| {
            let records = items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let item_path = format!("{path}[{i}]");
                    if !item.is_object() {
                        failures.push(FieldFailure {
                            field: item_path.clone(),
                            expected: "object",
                            raw: item.clone(),
                        });
                    }
                    populate_into(schema(), Some(item), &Map::new(), &item_path, failures)
                })
                .collect();
            FieldValue::NestedList(records)
        }),
    };

    if converted.is_none() {
        failures.push(FieldFailure {
            field: path.to_string(),
            expected: kind.label(),
            raw: raw.clone(),
        });
    }
    converted
}

fn to_text(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn to_int(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < 9.2e18)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn to_float(raw: &Value) -> Option<f64> {
    let value = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    value.filter(|f: &f64| f.is_finite())
}

fn truthy(raw: &Value) -> bool {
    match raw {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn to_timestamp(raw: &Value) -> Option<DateTime<Utc>> {
    match raw {
        Value::String(s) => dateparser::parse_with_timezone(s.trim(), &Utc).ok(),
        Value::Number(n) => dateparser::parse_with_timezone(&n.to_string(), &Utc).ok(),
        _ => None,
    }
}
