//! Cluster resource.
//!
//! Clusters are the compute that jobs run on. A cluster moves through the
//! lifecycle described by [`ClusterStatus`]; terminating it is a `DELETE`
//! that answers with the cluster in its new state.
//!
//! # Example
//!
//! ```rust,ignore
//! use xplenty_api::rest::resources::{ClusterStatus, NewCluster};
//!
//! let cluster = client.create_cluster(
//!     &NewCluster::new("sandbox", 1)
//!         .name("SDK Test")
//!         .terminate_on_idle(true),
//! )?;
//!
//! if cluster.lifecycle() == Some(ClusterStatus::Available) {
//!     let cluster = client.terminate_cluster(cluster.id.unwrap_or_default())?;
//!     println!("{:?}", cluster.status);
//! }
//! ```

use std::fmt;
use std::str::FromStr;

use serde_json::{json, Map, Value};

use crate::clients::HttpMethod;
use crate::entity;
use crate::rest::resources::{list, payload, Watchable};
use crate::rest::{
    Collection, Creatable, Entity, Params, Removable, ResourceError, ResourcePath, XplentyClient,
};

entity! {
    #[entity(key = "cluster", path = "clusters", primary_key = "id")]
    /// An Xplenty cluster.
    pub struct Cluster {
        id: Int,
        name: Str,
        description: Str,
        status: Str,
        kind as "type": Str,
        url: Str,
        html_url: Str,
        region: Str,
        stack: Str,
        master_instance_type: Str,
        slave_instance_type: Str,
        creator: Object,
        bootstrap_actions: List,
        owner_id: Int,
        plan_id: Int,
        nodes: Int,
        running_jobs_count: Int,
        time_to_idle: Int,
        terminate_on_idle: Bool,
        terminated_on_idle: Bool,
        allow_fallback: Bool,
        master_spot_price: Float,
        slave_spot_price: Float,
        master_spot_percentage: Float,
        slave_spot_percentage: Float,
        created_at: Timestamp,
        updated_at: Timestamp,
        available_since: Timestamp,
        idle_since: Timestamp,
        terminated_at: Timestamp,
    }
}

entity! {
    #[entity(key = "instance", path = "instances", primary_key = "instance_id")]
    /// A machine belonging to a cluster.
    pub struct ClusterInstance {
        instance_id: Str,
        instance_type: Str,
        private_dns: Str,
        public_dns: Str,
        status: Str,
        zone: Str,
        master: Bool,
        spot: Bool,
        vpc: Bool,
    }
}

/// Lifecycle state of a cluster.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClusterStatus {
    /// Requested, not yet provisioning.
    Pending,
    /// Machines are being provisioned.
    Creating,
    /// Ready to run jobs.
    Available,
    /// Running no jobs, may terminate on idle.
    Idle,
    /// Termination requested.
    PendingTerminate,
    /// Machines are being released.
    Terminating,
    /// Gone.
    Terminated,
    /// Provisioning or termination failed.
    Error,
    /// A state this client does not know about.
    Unknown(String),
}

impl ClusterStatus {
    /// Returns the wire name of the status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Creating => "creating",
            Self::Available => "available",
            Self::Idle => "idle",
            Self::PendingTerminate => "pending_terminate",
            Self::Terminating => "terminating",
            Self::Terminated => "terminated",
            Self::Error => "error",
            Self::Unknown(other) => other,
        }
    }

    /// Returns `true` for states a cluster never leaves.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated | Self::Error)
    }

    /// Returns `true` if the lifecycle allows moving to `next`.
    ///
    /// Unknown states allow every transition.
    #[must_use]
    pub fn can_transition_to(&self, next: &Self) -> bool {
        use ClusterStatus::{
            Available, Creating, Error, Idle, Pending, PendingTerminate, Terminated, Terminating,
            Unknown,
        };

        match (self, next) {
            (Unknown(_), _) | (_, Unknown(_)) => true,
            (Terminated | Error, _) => false,
            (_, Error) => true,
            (Pending, Creating | PendingTerminate)
            | (Creating, Available | PendingTerminate)
            | (Available, Idle | PendingTerminate)
            | (Idle, Available | PendingTerminate)
            | (PendingTerminate, Terminating)
            | (Terminating, Terminated) => true,
            _ => false,
        }
    }
}

impl FromStr for ClusterStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "pending" => Self::Pending,
            "creating" => Self::Creating,
            "available" => Self::Available,
            "idle" => Self::Idle,
            "pending_terminate" => Self::PendingTerminate,
            "terminating" => Self::Terminating,
            "terminated" => Self::Terminated,
            "error" => Self::Error,
            other => Self::Unknown(other.to_string()),
        })
    }
}

impl fmt::Display for ClusterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Cluster {
    /// Returns the parsed lifecycle state, if the status is set.
    #[must_use]
    pub fn lifecycle(&self) -> Option<ClusterStatus> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }

    /// Terminates the cluster and returns it in its new state.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] without an id, or the error of
    /// the call. A cluster that cannot be terminated yields the server's
    /// validation error.
    pub fn terminate(&self, client: &XplentyClient) -> Result<Self, ResourceError> {
        let body = client.send_json(
            HttpMethod::Delete,
            Self::BASE,
            self.member_path()?,
            None,
            None,
        )?;
        client.entity_from(&body, &Map::new())
    }

    /// Lists the machines of the cluster.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] without an id, or the error of
    /// the call.
    pub fn instances(
        &self,
        client: &XplentyClient,
    ) -> Result<Collection<ClusterInstance>, ResourceError> {
        client.fetch_collection(self.member_path()?.join("instances"), None, Map::new())
    }
}

impl Removable for Cluster {}

impl Watchable for Cluster {}

impl Creatable for Cluster {
    fn create(
        client: &XplentyClient,
        context: &Map<String, Value>,
        params: Params,
    ) -> Result<Self, ResourceError> {
        let mut body = context.clone();
        body.extend(payload::<Self>(params)?);
        client.create(Self::PATH, body)
    }
}

/// Arguments for creating a cluster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCluster {
    kind: String,
    nodes: i64,
    name: String,
    description: String,
    terminate_on_idle: bool,
    time_to_idle: i64,
}

impl NewCluster {
    /// Seconds of idleness before an idle cluster terminates, unless set.
    pub const DEFAULT_TIME_TO_IDLE: i64 = 3600;

    /// Creates arguments for a cluster of `kind` ("sandbox" or
    /// "production") with `nodes` nodes.
    #[must_use]
    pub fn new(kind: impl Into<String>, nodes: i64) -> Self {
        Self {
            kind: kind.into(),
            nodes,
            name: String::new(),
            description: String::new(),
            terminate_on_idle: false,
            time_to_idle: Self::DEFAULT_TIME_TO_IDLE,
        }
    }

    /// Sets the cluster name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the cluster description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets whether the cluster terminates once idle.
    #[must_use]
    pub const fn terminate_on_idle(mut self, terminate: bool) -> Self {
        self.terminate_on_idle = terminate;
        self
    }

    /// Sets how many idle seconds pass before termination.
    #[must_use]
    pub const fn time_to_idle(mut self, seconds: i64) -> Self {
        self.time_to_idle = seconds;
        self
    }

    fn to_payload(&self) -> Map<String, Value> {
        let body = json!({
            "type": self.kind,
            "nodes": self.nodes,
            "name": self.name,
            "description": self.description,
            "terminate_on_idle": self.terminate_on_idle,
            "time_to_idle": self.time_to_idle,
        });
        match body {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

fn cluster_path(id: i64) -> ResourcePath {
    ResourcePath::new(Cluster::PATH).join(id)
}

impl XplentyClient {
    /// Lists clusters, filtered by any [`Cluster`] field plus
    /// `offset`/`limit`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedArgument`] for unknown filters, or
    /// the error of the call.
    pub fn clusters(&self, params: Params) -> Result<Collection<Cluster>, ResourceError> {
        list(self, &params)
    }

    /// Fetches one cluster.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn cluster(&self, id: i64) -> Result<Cluster, ResourceError> {
        self.fetch_one(cluster_path(id), None)
    }

    /// Creates a cluster with one POST.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn create_cluster(&self, cluster: &NewCluster) -> Result<Cluster, ResourceError> {
        self.create(Cluster::PATH, cluster.to_payload())
    }

    /// Updates a cluster and returns its refreshed state.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedArgument`] for unknown fields, or
    /// the error of the call.
    pub fn update_cluster(&self, id: i64, params: Params) -> Result<Cluster, ResourceError> {
        let body = payload::<Cluster>(params)?;
        self.update(cluster_path(id), body)
    }

    /// Terminates a cluster and returns it in its new state.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn terminate_cluster(&self, id: i64) -> Result<Cluster, ResourceError> {
        Cluster {
            id: Some(id),
            ..Cluster::default()
        }
        .terminate(self)
    }

    /// Deletes a cluster, returning `true` on success.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn delete_cluster(&self, id: i64) -> Result<bool, ResourceError> {
        self.remove(Cluster::BASE, cluster_path(id))
    }

    /// Lists the machines of a cluster.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn cluster_instances(
        &self,
        cluster_id: i64,
    ) -> Result<Collection<ClusterInstance>, ResourceError> {
        self.fetch_collection(cluster_path(cluster_id).join("instances"), None, Map::new())
    }
}
