//! Schedule resource.
//!
//! Schedules run a task (a package on a cluster) at a fixed interval. A new
//! schedule defaults to an interval of one hour starting now.

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::clients::HttpMethod;
use crate::entity;
use crate::rest::resources::{list, payload, Watchable};
use crate::rest::{
    Collection, Creatable, Entity, Params, Removable, ResourceError, ResourcePath, XplentyClient,
};

entity! {
    #[entity(key = "schedule", path = "schedules", primary_key = "id")]
    /// A recurring task.
    pub struct Schedule {
        id: Int,
        name: Str,
        description: Str,
        url: Str,
        html_url: Str,
        status: Str,
        interval_unit: Str,
        last_run_status: Str,
        reuse_cluster_strategy: Str,
        owner_id: Int,
        interval_amount: Int,
        execution_count: Int,
        overlap: Bool,
        task: Object,
        start_at: Timestamp,
        next_run_at: Timestamp,
        last_run_at: Timestamp,
        created_at: Timestamp,
        updated_at: Timestamp,
    }
}

impl Schedule {
    /// Interval amount used when none is given.
    pub const DEFAULT_INTERVAL_AMOUNT: i64 = 1;

    /// Interval unit used when none is given.
    pub const DEFAULT_INTERVAL_UNIT: &'static str = "hours";

    /// Copies the schedule and returns the copy.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] without an id, or the error of
    /// the call.
    pub fn clone_schedule(&self, client: &XplentyClient) -> Result<Self, ResourceError> {
        self.post_action(client, "clone")
    }

    /// Triggers one run of the schedule now.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] without an id, or the error of
    /// the call.
    pub fn run(&self, client: &XplentyClient) -> Result<Self, ResourceError> {
        self.post_action(client, "run")
    }

    fn post_action(&self, client: &XplentyClient, action: &str) -> Result<Self, ResourceError> {
        let path = self.member_path()?.join(action);
        let body = client.send_json(HttpMethod::Post, Self::BASE, path, None, None)?;
        let result: Self = client.entity_from(&body, &Map::new())?;
        client.reload(result)
    }
}

impl Removable for Schedule {}

impl Watchable for Schedule {}

impl Creatable for Schedule {
    /// Creates a schedule. `name` is required; `start_at`, `interval_amount`
    /// and `interval_unit` default to now, 1 and "hours".
    fn create(
        client: &XplentyClient,
        context: &Map<String, Value>,
        params: Params,
    ) -> Result<Self, ResourceError> {
        let mut body = context.clone();
        body.extend(payload::<Self>(params)?);
        body.entry("start_at").or_insert_with(|| {
            Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true))
        });
        body.entry("interval_amount")
            .or_insert_with(|| Value::from(Self::DEFAULT_INTERVAL_AMOUNT));
        body.entry("interval_unit")
            .or_insert_with(|| Value::from(Self::DEFAULT_INTERVAL_UNIT));

        let schedule: Self = client.create(Self::PATH, body)?;
        client.reload(schedule)
    }
}

fn schedule(id: i64) -> Schedule {
    Schedule {
        id: Some(id),
        ..Schedule::default()
    }
}

impl XplentyClient {
    /// Lists schedules, filtered by any [`Schedule`] field plus
    /// `offset`/`limit`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedArgument`] for unknown filters, or
    /// the error of the call.
    pub fn schedules(&self, params: Params) -> Result<Collection<Schedule>, ResourceError> {
        list(self, &params)
    }

    /// Fetches one schedule.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn schedule(&self, id: i64) -> Result<Schedule, ResourceError> {
        self.fetch_one(ResourcePath::new(Schedule::PATH).join(id), None)
    }

    /// Creates a schedule named `name`; see [`Schedule`]'s defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedArgument`] for unknown fields, or
    /// the error of the call.
    pub fn create_schedule(&self, name: &str, params: Params) -> Result<Schedule, ResourceError> {
        Schedule::create(self, &Map::new(), params.set("name", name))
    }

    /// Updates a schedule and returns its refreshed state.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedArgument`] for unknown fields, or
    /// the error of the call.
    pub fn update_schedule(&self, id: i64, params: Params) -> Result<Schedule, ResourceError> {
        let body = payload::<Schedule>(params)?;
        self.update(ResourcePath::new(Schedule::PATH).join(id), body)
    }

    /// Deletes a schedule, returning `true` on success.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn delete_schedule(&self, id: i64) -> Result<bool, ResourceError> {
        schedule(id).delete(self)
    }

    /// Copies a schedule and returns the copy.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn clone_schedule(&self, id: i64) -> Result<Schedule, ResourceError> {
        schedule(id).clone_schedule(self)
    }

    /// Triggers one run of a schedule now.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn run_schedule(&self, id: i64) -> Result<Schedule, ResourceError> {
        schedule(id).run(self)
    }
}
