//! Xplenty API resources.
//!
//! Each module declares the entities of one resource family with
//! [`entity!`](crate::entity) and adds the family's convenience methods to
//! [`XplentyClient`]. Convenience methods check caller arguments against the
//! entity schema before any request is made:
//!
//! ```rust,ignore
//! use xplenty_api::rest::Params;
//!
//! // Rejected locally with ResourceError::UnexpectedArgument
//! let err = client.clusters(Params::new().set("colour", "red")).unwrap_err();
//! ```
//!
//! # Resource Families
//!
//! | Module | Entities | Base |
//! |--------|----------|------|
//! | [`cluster`] | [`Cluster`], [`ClusterInstance`] | account |
//! | [`job`] | [`Job`] | account |
//! | [`package`] | [`Package`], [`PackageValidation`], [`PackageTemplate`] | account |
//! | [`schedule`] | [`Schedule`] | account |
//! | [`member`] | [`Member`] | account |
//! | [`hook`] | [`Hook`], [`HookType`], [`HookEvent`] | account, short |
//! | [`connection`] | [`Connection`], [`ConnectionType`] | account |
//! | [`billing`] | [`Subscription`], [`Plan`], [`PaymentMethod`], [`AccountLimits`] | account |
//! | [`account`] | [`Account`], [`ProductUpdate`] | short |
//! | [`user`] | [`User`], [`PublicKey`], [`Notification`] | short |
//! | [`reference`] | [`Stack`], [`Region`], [`Timezone`], [`SysVariable`] | account, short |

use serde_json::{Map, Value};

use crate::clients::HttpMethod;
use crate::rest::{Collection, Entity, Params, ResourceError, XplentyClient, PAGINATION_KEYS};

pub mod account;
pub mod billing;
pub mod cluster;
pub mod connection;
pub mod hook;
pub mod job;
pub mod member;
pub mod package;
pub mod reference;
pub mod schedule;
pub mod user;

pub use account::{Account, ProductUpdate};
pub use billing::{AccountLimits, PaymentMethod, Plan, Subscription};
pub use cluster::{Cluster, ClusterInstance, ClusterStatus, NewCluster};
pub use connection::{Connection, ConnectionType};
pub use hook::{Hook, HookEvent, HookType};
pub use job::Job;
pub use member::Member;
pub use package::{Package, PackageTemplate, PackageValidation};
pub use reference::{Region, Stack, SysVariable, Timezone};
pub use schedule::Schedule;
pub use user::{Notification, PublicKey, User};

/// Entities whose watchers can be listed, added and removed.
///
/// Watching an entity subscribes the authenticated user to its
/// notifications. The watcher endpoints answer with free-form JSON.
pub trait Watchable: Entity {
    /// Lists the watchers of the entity.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] without a primary key, or the
    /// error of the call.
    fn watchers(&self, client: &XplentyClient) -> Result<Value, ResourceError> {
        let path = self.member_path()?.join("watchers");
        client.send_json(HttpMethod::Get, Self::BASE, path, None, None)
    }

    /// Adds the authenticated user as a watcher.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] without a primary key, or the
    /// error of the call.
    fn watch(&self, client: &XplentyClient) -> Result<Value, ResourceError> {
        let path = self.member_path()?.join("watchers");
        client.send_json(HttpMethod::Post, Self::BASE, path, None, None)
    }

    /// Removes the authenticated user from the watchers.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] without a primary key, or the
    /// error of the call.
    fn unwatch(&self, client: &XplentyClient) -> Result<bool, ResourceError> {
        let path = self.member_path()?.join("watchers");
        client.remove(Self::BASE, path)
    }
}

/// Lists `T` at its collection path with schema-checked filters.
pub(crate) fn list<T: Entity>(
    client: &XplentyClient,
    params: &Params,
) -> Result<Collection<T>, ResourceError> {
    let query = Params::from(params.filtered(T::schema(), PAGINATION_KEYS)?);
    client.fetch_collection(T::PATH, Some(&query), Map::new())
}

/// Checks `params` against `T`'s schema and returns the request payload.
pub(crate) fn payload<T: Entity>(params: Params) -> Result<Map<String, Value>, ResourceError> {
    params.filtered(T::schema(), &[])
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use crate::clients::RecordingTransport;
    use crate::config::{AccountId, ApiKey, XplentyConfig};
    use crate::rest::XplentyClient;

    pub fn client() -> (XplentyClient, Arc<RecordingTransport>) {
        let config = XplentyConfig::builder()
            .account_id(AccountId::new("acme").unwrap())
            .api_key(ApiKey::new("key").unwrap())
            .build()
            .unwrap();
        let transport = Arc::new(RecordingTransport::new());
        (
            XplentyClient::with_transport(&config, transport.clone()),
            transport,
        )
    }

    pub const ACCOUNT: &str = "https://api.xplenty.com/acme/api";
    pub const SHORT: &str = "https://api.xplenty.com";
}
