//! Schema-driven resource layer for the Xplenty API.
//!
//! This module turns loosely typed JSON responses into typed entities:
//!
//! - **[`Schema`]**: The field table of one entity type (name and kind per field)
//! - **[`populate`]**: Lenient JSON → [`Record`] conversion driven by a schema
//! - **[`Entity`] trait**: Typed structs generated by [`entity!`](crate::entity)
//! - **[`Collection<T>`]**: A list result with keyed lookup, add and remove
//! - **[`XplentyClient`]**: Fetch, create, update and delete entities over HTTP
//! - **[`ResourceError`]**: Semantic error types for resource operations
//!
//! # Example: Populating a Record
//!
//! ```rust
//! use serde_json::{json, Map};
//! use xplenty_api::rest::{populate, Field, FieldKind, FieldValue, Schema};
//!
//! static NODE: Schema = Schema {
//!     name: "Node",
//!     key: "node",
//!     primary_key: Some("id"),
//!     fields: &[
//!         Field { name: "id", kind: FieldKind::Int },
//!         Field { name: "ready", kind: FieldKind::Bool },
//!     ],
//! };
//!
//! let record = populate(&NODE, Some(&json!({"id": "7", "ready": 1})), &Map::new());
//! assert_eq!(record.get("id"), Some(&FieldValue::Int(7)));
//! assert_eq!(record.get("ready"), Some(&FieldValue::Bool(true)));
//! ```
//!
//! # Example: Using the Client
//!
//! ```rust,ignore
//! use xplenty_api::{XplentyClient, XplentyConfig};
//! use xplenty_api::rest::Params;
//! use xplenty_api::rest::resources::NewCluster;
//!
//! let client = XplentyClient::new(&XplentyConfig::from_env()?)?;
//!
//! let cluster = client.create_cluster(&NewCluster::new("production", 2).name("etl"))?;
//! let jobs = client.jobs(Params::new().set("status", "running").set("limit", 10))?;
//! client.terminate_cluster(cluster.id.unwrap_or_default())?;
//! ```

mod client;
mod collection;
pub mod entity;
mod errors;
mod mapper;
mod params;
mod path;
mod schema;

pub mod resources;

// Public exports
pub use client::XplentyClient;
pub use collection::{Collection, EntityKey};
pub use entity::{key_segment, Creatable, Entity, Removable};
pub use errors::ResourceError;
pub use mapper::{
    populate, populate_strict, populate_with, CoercionError, CoercionMode, FieldFailure,
    FieldValue, Record,
};
pub use params::{Params, DEFAULT_PAGE_LIMIT, PAGINATION_KEYS};
pub use path::ResourcePath;
pub use resources::Watchable;
pub use schema::{Field, FieldKind, Schema};
