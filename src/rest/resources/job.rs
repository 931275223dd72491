//! Job resource.
//!
//! A job is one run of a package on a cluster. Running a job is a `POST`
//! followed by a fetch of the new job, so the returned entity carries the
//! server-side defaults. Stopping is a `DELETE` that answers with the job.

use serde_json::{Map, Value};

use crate::clients::HttpMethod;
use crate::entity;
use crate::rest::resources::{list, payload, Watchable};
use crate::rest::{Collection, Creatable, Entity, Params, ResourceError, ResourcePath, XplentyClient};

entity! {
    #[entity(key = "job", path = "jobs", primary_key = "id")]
    /// A package run on a cluster.
    pub struct Job {
        id: Int,
        status: Str,
        errors: Str,
        url: Str,
        html_url: Str,
        log_url: Str,
        sort: Str,
        direction: Str,
        creator: Object,
        cluster_id: Int,
        package_id: Int,
        owner_id: Int,
        outputs_count: Int,
        runtime_in_seconds: Int,
        progress: Float,
        variables: Object,
        dynamic_variables: Object,
        outputs: List,
        cluster: Object,
        package: Object,
        created_at: Timestamp,
        started_at: Timestamp,
        updated_at: Timestamp,
        failed_at: Timestamp,
        completed_at: Timestamp,
        since: Timestamp,
    }
}

impl Job {
    /// Stops the job and returns it in its new state.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] without an id, or the error of
    /// the call.
    pub fn stop(&self, client: &XplentyClient) -> Result<Self, ResourceError> {
        let body = client.send_json(HttpMethod::Delete, Self::BASE, self.member_path()?, None, None)?;
        client.entity_from(&body, &Map::new())
    }

    /// Fetches the job log.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] without an id, or the error of
    /// the call.
    pub fn log(&self, client: &XplentyClient) -> Result<Value, ResourceError> {
        get_json(client, self.member_path()?.join("log"))
    }

    /// Fetches the variables the job ran with.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] without an id, or the error of
    /// the call.
    pub fn variables(&self, client: &XplentyClient) -> Result<Value, ResourceError> {
        get_json(client, self.member_path()?.join("variables"))
    }

    /// Fetches a preview of one job output.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] without an id, or the error of
    /// the call.
    pub fn preview_output(
        &self,
        client: &XplentyClient,
        output_id: i64,
    ) -> Result<Value, ResourceError> {
        let path = self
            .member_path()?
            .join("outputs")
            .join(output_id)
            .join("preview");
        get_json(client, path)
    }
}

impl Watchable for Job {}

impl Creatable for Job {
    /// Runs a job. `params` must name `cluster_id` and `package_id` and may
    /// carry `variables` and `dynamic_variables`.
    fn create(
        client: &XplentyClient,
        context: &Map<String, Value>,
        params: Params,
    ) -> Result<Self, ResourceError> {
        let mut body = context.clone();
        body.extend(payload::<Self>(params)?);
        let job: Self = client.create(Self::PATH, body)?;
        client.reload(job)
    }
}

fn get_json(client: &XplentyClient, path: ResourcePath) -> Result<Value, ResourceError> {
    client.send_json(HttpMethod::Get, Job::BASE, path, None, None)
}

fn job(id: i64) -> Job {
    Job {
        id: Some(id),
        ..Job::default()
    }
}

impl XplentyClient {
    /// Lists jobs, filtered by any [`Job`] field plus `offset`/`limit`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedArgument`] for unknown filters, or
    /// the error of the call.
    pub fn jobs(&self, params: Params) -> Result<Collection<Job>, ResourceError> {
        list(self, &params)
    }

    /// Fetches one job.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn job(&self, id: i64) -> Result<Job, ResourceError> {
        self.fetch_one(ResourcePath::new(Job::PATH).join(id), None)
    }

    /// Runs `package_id` on `cluster_id` and returns the new job.
    ///
    /// `variables` and `dynamic_variables` are sent only when non-empty.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn run_job(
        &self,
        cluster_id: i64,
        package_id: i64,
        variables: Map<String, Value>,
        dynamic_variables: Map<String, Value>,
    ) -> Result<Job, ResourceError> {
        let mut params = Params::new()
            .set("cluster_id", cluster_id)
            .set("package_id", package_id);
        if !variables.is_empty() {
            params.insert("variables", variables);
        }
        if !dynamic_variables.is_empty() {
            params.insert("dynamic_variables", dynamic_variables);
        }
        Job::create(self, &Map::new(), params)
    }

    /// Stops a job and returns it in its new state.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn stop_job(&self, id: i64) -> Result<Job, ResourceError> {
        job(id).stop(self)
    }

    /// Fetches the log of a job.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn job_log(&self, id: i64) -> Result<Value, ResourceError> {
        job(id).log(self)
    }

    /// Fetches the variables a job ran with.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn job_variables(&self, id: i64) -> Result<Value, ResourceError> {
        job(id).variables(self)
    }

    /// Fetches a preview of one output of a job.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn preview_job_output(&self, id: i64, output_id: i64) -> Result<Value, ResourceError> {
        job(id).preview_output(self, output_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::resources::testing::{client, ACCOUNT};
    use serde_json::json;

    #[test]
    fn test_run_job_posts_then_refetches() {
        let (client, transport) = client();
        transport.push_json(201, r#"{"id": 12, "status": "idle"}"#);
        transport.push_json(200, r#"{"id": 12, "status": "running", "progress": "0.25"}"#);

        let mut variables = Map::new();
        variables.insert("date".to_string(), json!("ClockTime()"));
        let job = client.run_job(3, 4, variables, Map::new()).unwrap();

        assert_eq!(job.status.as_deref(), Some("running"));
        assert_eq!(job.progress, Some(0.25));

        let requests = transport.requests();
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[0].url, format!("{ACCOUNT}/jobs"));
        let body: Value = serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"cluster_id": 3, "package_id": 4, "variables": {"date": "ClockTime()"}})
        );
        assert_eq!(requests[1].method, HttpMethod::Get);
        assert_eq!(requests[1].url, format!("{ACCOUNT}/jobs/12"));
    }

    #[test]
    fn test_stop_job_returns_entity() {
        let (client, transport) = client();
        transport.push_json(200, r#"{"id": 12, "status": "pending_stoppage"}"#);

        let job = client.stop_job(12).unwrap();
        assert_eq!(job.status.as_deref(), Some("pending_stoppage"));
        assert_eq!(transport.requests()[0].method, HttpMethod::Delete);
    }

    #[test]
    fn test_job_side_resources() {
        let (client, transport) = client();
        transport.push_json(200, r#"{"body": "log line", "url": "x"}"#);
        transport.push_json(200, r#"{"_ACCOUNT_ID": "1"}"#);
        transport.push_json(200, r#"{"preview": [["a", "b"]]}"#);

        assert_eq!(client.job_log(9).unwrap()["body"], json!("log line"));
        assert_eq!(client.job_variables(9).unwrap()["_ACCOUNT_ID"], json!("1"));
        assert!(client.preview_job_output(9, 2).unwrap()["preview"].is_array());

        let urls: Vec<_> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                format!("{ACCOUNT}/jobs/9/log"),
                format!("{ACCOUNT}/jobs/9/variables"),
                format!("{ACCOUNT}/jobs/9/outputs/2/preview"),
            ]
        );
    }

    #[test]
    fn test_jobs_accepts_pagination() {
        let (client, transport) = client();
        transport.push_json(200, r#"[{"id": 1}, {"id": 2}]"#);

        let jobs = client
            .jobs(Params::new().set("status", "completed").limit(2))
            .unwrap();
        assert_eq!(jobs.len(), 2);
        assert!(jobs.get(2).is_some());
        assert!(transport.requests()[0]
            .query
            .contains(&("status".to_string(), "completed".to_string())));
    }
}
