//! `application/x-www-form-urlencoded` body encoding with bracketed keys.
//!
//! The first protocol revision took request bodies as flat form pairs, with
//! nesting expressed through brackets under the entity's resource key:
//!
//! ```text
//! job[cluster_id]=7&job[variables][date]=2024-01-01
//! ```

use serde_json::Value;

/// Encodes a JSON object body as form pairs.
///
/// Objects nest as `key[child]`, arrays as repeated `key[]`, booleans as
/// `1`/`0` and nulls as empty values. When `root` is set every top-level key
/// is nested under it.
///
/// # Example
///
/// ```rust
/// use xplenty_api::clients::encode_form;
/// use serde_json::json;
///
/// let body = json!({"nodes": 1, "terminate_on_idle": false});
/// assert_eq!(
///     encode_form(Some("cluster"), &body),
///     "cluster%5Bnodes%5D=1&cluster%5Bterminate_on_idle%5D=0"
/// );
/// ```
#[must_use]
pub fn encode_form(root: Option<&str>, body: &Value) -> String {
    form_pairs(root, body)
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Flattens a JSON object body into ordered `(key, value)` form pairs.
#[must_use]
pub fn form_pairs(root: Option<&str>, body: &Value) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    match (root, body) {
        (Some(root), value) => flatten(root.to_string(), value, &mut pairs),
        (None, Value::Object(map)) => {
            for (key, value) in map {
                flatten(key.clone(), value, &mut pairs);
            }
        }
        (None, Value::Null) => {}
        (None, other) => pairs.push((String::new(), scalar(other))),
    }
    pairs
}

fn flatten(prefix: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten(format!("{prefix}[{key}]"), child, pairs);
            }
        }
        Value::Array(items) => {
            for item in items {
                flatten(format!("{prefix}[]"), item, pairs);
            }
        }
        other => pairs.push((prefix, scalar(other))),
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
