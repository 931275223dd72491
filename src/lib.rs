//! # Xplenty API Rust Client
//!
//! A Rust client for the Xplenty data-integration REST API, providing
//! type-safe configuration, a schema-driven response mapper and typed
//! resource operations for clusters, jobs, packages, schedules and the rest
//! of the account.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`XplentyConfig`] and [`XplentyConfigBuilder`]
//! - Validated newtypes for the account id, API key and base URLs
//! - A blocking HTTP client with Basic authentication and versioned media types
//! - Lenient, schema-driven conversion of JSON responses via [`rest::populate`]
//! - Typed entities and per-resource operations on [`XplentyClient`]
//!
//! ## Quick Start
//!
//! ```rust
//! use xplenty_api::{AccountId, ApiKey, ProtocolVersion, XplentyConfig};
//!
//! // Create configuration using the builder pattern
//! let config = XplentyConfig::builder()
//!     .account_id(AccountId::new("my-account").unwrap())
//!     .api_key(ApiKey::new("your-api-key").unwrap())
//!     .protocol_version(ProtocolVersion::V2)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     config.account_base_url().to_string(),
//!     "https://api.xplenty.com/my-account/api"
//! );
//! ```
//!
//! ## Working With Resources
//!
//! ```rust,ignore
//! use xplenty_api::{XplentyClient, XplentyConfig};
//! use xplenty_api::rest::{Params, Removable};
//! use xplenty_api::rest::resources::NewCluster;
//!
//! let client = XplentyClient::new(&XplentyConfig::from_env()?)?;
//!
//! // Create a cluster and run a package on it
//! let cluster = client.create_cluster(&NewCluster::new("sandbox", 1).name("dev"))?;
//! let cluster_id = cluster.id.unwrap_or_default();
//! let job = client.run_job(cluster_id, 42, Default::default(), Default::default())?;
//! println!("job {:?} is {:?}", job.id, job.status);
//!
//! // Lists are keyed collections
//! let mut members = client.members(Params::new())?;
//! members.remove(&client, 7)?;
//! ```
//!
//! ## Testing Without a Network
//!
//! Every client can be built over a [`clients::Transport`]. The bundled
//! [`clients::RecordingTransport`] replays canned responses and records the
//! requests it receives:
//!
//! ```rust
//! use std::sync::Arc;
//! use xplenty_api::clients::RecordingTransport;
//! use xplenty_api::rest::Params;
//! use xplenty_api::{AccountId, ApiKey, XplentyClient, XplentyConfig};
//!
//! let config = XplentyConfig::builder()
//!     .account_id(AccountId::new("acme").unwrap())
//!     .api_key(ApiKey::new("key").unwrap())
//!     .build()
//!     .unwrap();
//! let transport = Arc::new(RecordingTransport::new());
//! transport.push_json(200, r#"[{"id": 1, "status": "available"}]"#);
//!
//! let client = XplentyClient::with_transport(&config, transport.clone());
//! let clusters = client.clusters(Params::new()).unwrap();
//!
//! assert_eq!(clusters[0].id, Some(1));
//! assert_eq!(
//!     transport.requests()[0].url,
//!     "https://api.xplenty.com/acme/api/clusters"
//! );
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: All types are `Send + Sync`
//! - **Total mapping**: Malformed response fields become absent, never panics

pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

// Re-export public types at crate root for convenience
pub use config::{
    AccountId, AccountUrlTemplate, ApiKey, BaseUrl, BodyEncoding, ProtocolVersion, XplentyConfig,
    XplentyConfigBuilder,
};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    ApiBase, DataType, HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder,
    HttpResponse, HttpResponseError, InvalidHttpRequestError,
};

// Re-export resource types
pub use rest::{CoercionMode, ResourceError, XplentyClient};
