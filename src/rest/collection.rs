//! Keyed collections of entities returned by list operations.
//!
//! A [`Collection`] dereferences to a slice of entities, so it iterates and
//! indexes like a `Vec`. It also remembers the context it was fetched with
//! (for instance the parent package of a list of validations) so further
//! entities can be added to it or removed from it through the client.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut keys = client.public_keys(Params::new())?;
//! for key in keys.iter() {
//!     println!("{:?}", key.fingerprint);
//! }
//!
//! if let Some(key) = keys.get(17) {
//!     println!("found {:?}", key.name);
//! }
//! keys.remove(&client, 17)?;
//! ```

use std::fmt;
use std::ops::Deref;

use serde_json::{Map, Value};

use crate::rest::client::XplentyClient;
use crate::rest::entity::{key_segment, Creatable, Entity, Removable};
use crate::rest::errors::ResourceError;
use crate::rest::params::Params;

/// A primary key used to look entities up in a [`Collection`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntityKey {
    /// A numeric key.
    Int(i64),
    /// A textual key.
    Str(String),
}

impl EntityKey {
    /// Returns `true` if the key equals `value` in native or string form.
    ///
    /// `EntityKey::Int(2)` and `EntityKey::Str("2")` both match the JSON
    /// value `2` and the JSON value `"2"`.
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Int(key), Value::Number(n)) if n.as_i64() == Some(*key) => true,
            (Self::Str(key), Value::String(s)) if s == key => true,
            _ => self.to_string() == key_segment(value),
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(key) => write!(f, "{key}"),
            Self::Str(key) => f.write_str(key),
        }
    }
}

impl From<i64> for EntityKey {
    fn from(key: i64) -> Self {
        Self::Int(key)
    }
}

impl From<i32> for EntityKey {
    fn from(key: i32) -> Self {
        Self::Int(i64::from(key))
    }
}

impl From<u32> for EntityKey {
    fn from(key: u32) -> Self {
        Self::Int(i64::from(key))
    }
}

impl From<&str> for EntityKey {
    fn from(key: &str) -> Self {
        Self::Str(key.to_string())
    }
}

impl From<String> for EntityKey {
    fn from(key: String) -> Self {
        Self::Str(key)
    }
}

/// An ordered list of entities plus the context it was fetched with.
#[derive(Clone, Debug, PartialEq)]
pub struct Collection<T> {
    items: Vec<T>,
    context: Map<String, Value>,
}

impl<T: Entity> Collection<T> {
    /// Wraps already-populated entities.
    #[must_use]
    pub fn new(items: Vec<T>, context: Map<String, Value>) -> Self {
        Self { items, context }
    }

    /// Returns the first entity whose primary key matches `key`.
    pub fn get(&self, key: impl Into<EntityKey>) -> Option<&T> {
        let key = key.into();
        self.items
            .iter()
            .find(|item| item.primary_key().is_some_and(|pk| key.matches(&pk)))
    }

    /// Returns the context applied to every entity of the collection.
    #[must_use]
    pub const fn context(&self) -> &Map<String, Value> {
        &self.context
    }

    /// Consumes the collection, returning the entities.
    #[must_use]
    pub fn into_inner(self) -> Vec<T> {
        self.items
    }

    fn position(&self, key: &EntityKey) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.primary_key().is_some_and(|pk| key.matches(&pk)))
    }
}

impl<T: Creatable> Collection<T> {
    /// Creates another entity of this type and appends it.
    ///
    /// # Errors
    ///
    /// Propagates the error of the create call.
    pub fn add(&mut self, client: &XplentyClient, params: Params) -> Result<T, ResourceError> {
        let created = T::create(client, &self.context, params)?;
        self.items.push(created.clone());
        Ok(created)
    }
}

impl<T: Removable> Collection<T> {
    /// Deletes the entity with the given key and drops it from the list.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] if no entity has the key, or the
    /// error of the delete call.
    pub fn remove(
        &mut self,
        client: &XplentyClient,
        key: impl Into<EntityKey>,
    ) -> Result<bool, ResourceError> {
        let key = key.into();
        let index = self.position(&key).ok_or_else(|| ResourceError::NotFound {
            resource: T::schema().name,
            key: key.to_string(),
        })?;

        let deleted = self.items[index].delete(client)?;
        if deleted {
            self.items.remove(index);
        }
        Ok(deleted)
    }
}

impl<T> Deref for Collection<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    crate::entity! {
        #[entity(key = "thing", path = "things", primary_key = "id")]
        pub struct Thing {
            id: Int,
            name: Str,
        }
    }

    crate::entity! {
        #[entity(key = "region", path = "regions", primary_key = "id")]
        pub struct Named {
            id: Str,
        }
    }

    fn things() -> Collection<Thing> {
        let items = vec![
            Thing::from_raw(Some(&json!({"id": 1, "name": "one"})), &Map::new()),
            Thing::from_raw(Some(&json!({"id": 2, "name": "two"})), &Map::new()),
        ];
        Collection::new(items, Map::new())
    }

    #[test]
    fn test_get_matches_native_and_string_keys() {
        let collection = things();
        assert_eq!(collection.get(2).unwrap().name.as_deref(), Some("two"));
        assert_eq!(collection.get("2").unwrap().name.as_deref(), Some("two"));
        assert!(collection.get(3).is_none());
    }

    #[test]
    fn test_get_with_string_primary_key() {
        let collection = Collection::new(
            vec![Named::from_raw(Some(&json!({"id": "us-east-1"})), &Map::new())],
            Map::new(),
        );
        assert!(collection.get("us-east-1").is_some());
        assert!(collection.get(1).is_none());
    }

    #[test]
    fn test_deref_and_iteration() {
        let collection = things();
        assert_eq!(collection.len(), 2);
        assert_eq!(collection[0].id, Some(1));
        let ids: Vec<_> = (&collection).into_iter().filter_map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(collection.into_inner().len(), 2);
    }

    #[test]
    fn test_entity_key_matches() {
        assert!(EntityKey::from(7).matches(&json!(7)));
        assert!(EntityKey::from(7).matches(&json!("7")));
        assert!(EntityKey::from("7").matches(&json!(7)));
        assert!(!EntityKey::from("x").matches(&json!(7)));
    }

    #[test]
    fn test_context_is_kept() {
        let mut context = Map::new();
        context.insert("package_id".to_string(), json!(9));
        let collection: Collection<Thing> = Collection::new(Vec::new(), context);
        assert_eq!(collection.context()["package_id"], json!(9));
        assert!(collection.is_empty());
    }
}
