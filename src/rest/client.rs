//! Resource client for the Xplenty API.
//!
//! [`XplentyClient`] turns HTTP responses into typed entities. It owns an
//! [`HttpClient`] and offers one generic primitive per operation shape:
//!
//! | Operation | Method | Response |
//! |-----------|--------|----------|
//! | [`fetch_collection`](XplentyClient::fetch_collection) | GET | JSON array → [`Collection`] |
//! | [`fetch_one`](XplentyClient::fetch_one) | GET | JSON object → entity |
//! | [`create`](XplentyClient::create) | POST | JSON object → entity |
//! | [`update`](XplentyClient::update) | PUT (+ GET) | JSON object → entity |
//! | [`remove`](XplentyClient::remove) | DELETE | `true` on 2xx |
//!
//! The per-resource convenience methods in [`resources`](crate::rest::resources)
//! are thin callers over these.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::clients::{ApiBase, HttpClient, HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::config::XplentyConfig;
use crate::error::ConfigError;
use crate::rest::collection::Collection;
use crate::rest::entity::Entity;
use crate::rest::errors::{shape_of, ResourceError};
use crate::rest::mapper::CoercionMode;
use crate::rest::params::Params;
use crate::rest::path::ResourcePath;

/// Client for Xplenty API resources.
///
/// All state is fixed at construction, so one client can be shared across
/// threads.
///
/// # Example
///
/// ```rust,ignore
/// use xplenty_api::{XplentyClient, XplentyConfig};
/// use xplenty_api::rest::Params;
///
/// let config = XplentyConfig::from_env()?;
/// let client = XplentyClient::new(&config)?;
///
/// let clusters = client.clusters(Params::new().set("status", "available"))?;
/// for cluster in &clusters {
///     println!("{:?} {:?}", cluster.id, cluster.name);
/// }
/// ```
#[derive(Debug)]
pub struct XplentyClient {
    http: HttpClient,
    coercion: CoercionMode,
}

// Verify XplentyClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<XplentyClient>();
};

impl XplentyClient {
    /// Creates a client that talks to the network.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Transport`] if the HTTP backend cannot be
    /// initialized.
    pub fn new(config: &XplentyConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            http: HttpClient::new(config)?,
            coercion: config.coercion(),
        })
    }

    /// Creates a client that sends requests through `transport`.
    #[must_use]
    pub fn with_transport(config: &XplentyConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            http: HttpClient::with_transport(config, transport),
            coercion: config.coercion(),
        }
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn http_client(&self) -> &HttpClient {
        &self.http
    }

    /// Returns how response fields that fail conversion are handled.
    #[must_use]
    pub const fn coercion(&self) -> CoercionMode {
        self.coercion
    }

    /// Sends one request and returns the raw response.
    ///
    /// `body`, when present, is encoded with the configured body encoding.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] for invalid requests, network
    /// failures and non-2xx statuses.
    pub fn send(
        &self,
        method: HttpMethod,
        base: ApiBase,
        path: impl Into<ResourcePath>,
        query: Option<&Params>,
        body: Option<Value>,
    ) -> Result<HttpResponse, ResourceError> {
        self.dispatch(method, base, &path.into(), query, body, None)
    }

    /// Sends one request and decodes the response body as JSON.
    ///
    /// An empty body decodes to `Value::Null`.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`send`](Self::send), or
    /// [`ResourceError::InvalidResponse`] if the body is not JSON.
    pub fn send_json(
        &self,
        method: HttpMethod,
        base: ApiBase,
        path: impl Into<ResourcePath>,
        query: Option<&Params>,
        body: Option<Value>,
    ) -> Result<Value, ResourceError> {
        let response = self.send(method, base, path, query, body)?;
        response.json().map_err(ResourceError::InvalidResponse)
    }

    /// Lists entities.
    ///
    /// Every element of the response array is populated with `T`'s schema;
    /// `context` is applied to each element as overrides and kept on the
    /// returned collection.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedShape`] if the body is not an
    /// array, plus the errors of [`send_json`](Self::send_json).
    pub fn fetch_collection<T: Entity>(
        &self,
        path: impl Into<ResourcePath>,
        query: Option<&Params>,
        context: Map<String, Value>,
    ) -> Result<Collection<T>, ResourceError> {
        let body = self.send_json(HttpMethod::Get, T::BASE, path, query, None)?;
        let Value::Array(elements) = body else {
            return Err(ResourceError::UnexpectedShape {
                resource: T::schema().name,
                expected: "array",
                found: shape_of(&body),
            });
        };

        let items = elements
            .iter()
            .map(|element| self.entity_from::<T>(element, &context))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Collection::new(items, context))
    }

    /// Fetches a single entity.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedShape`] if the body is not an
    /// object, plus the errors of [`send_json`](Self::send_json).
    pub fn fetch_one<T: Entity>(
        &self,
        path: impl Into<ResourcePath>,
        query: Option<&Params>,
    ) -> Result<T, ResourceError> {
        let body = self.send_json(HttpMethod::Get, T::BASE, path, query, None)?;
        self.entity_from::<T>(&body, &Map::new())
    }

    /// Creates an entity with a POST of `payload`.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`send_json`](Self::send_json) and
    /// [`ResourceError::UnexpectedShape`] for a non-object body.
    pub fn create<T: Entity>(
        &self,
        path: impl Into<ResourcePath>,
        payload: Map<String, Value>,
    ) -> Result<T, ResourceError> {
        self.write::<T>(HttpMethod::Post, &path.into(), payload)
    }

    /// Updates an entity with a PUT of `payload`.
    ///
    /// When the response carries the entity's primary key, the entity is
    /// fetched again from the same path so the result reflects server-side
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`send_json`](Self::send_json) and
    /// [`ResourceError::UnexpectedShape`] for a non-object body.
    pub fn update<T: Entity>(
        &self,
        path: impl Into<ResourcePath>,
        payload: Map<String, Value>,
    ) -> Result<T, ResourceError> {
        let path = path.into();
        let written = self.write::<T>(HttpMethod::Put, &path, payload)?;
        if written.primary_key().is_some() {
            return self.fetch_one::<T>(path, None);
        }
        Ok(written)
    }

    /// Fetches `entity` again from its member path.
    ///
    /// Entities without a primary key value are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`fetch_one`](Self::fetch_one).
    pub fn reload<T: Entity>(&self, entity: T) -> Result<T, ResourceError> {
        match entity.member_path() {
            Ok(path) => self.fetch_one::<T>(path, None),
            Err(_) => Ok(entity),
        }
    }

    /// Deletes the resource at `path`.
    ///
    /// Returns `true` when the server answered 2xx; any other status is an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`send`](Self::send).
    pub fn remove(
        &self,
        base: ApiBase,
        path: impl Into<ResourcePath>,
    ) -> Result<bool, ResourceError> {
        let response = self.send(HttpMethod::Delete, base, path, None, None)?;
        Ok(response.is_ok())
    }

    /// Populates `T` from one JSON value using the configured coercion mode.
    ///
    /// A null value yields an entity with every field absent.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedShape`] for values that are not
    /// objects, or [`ResourceError::Coercion`] in strict mode.
    pub fn entity_from<T: Entity>(
        &self,
        value: &Value,
        overrides: &Map<String, Value>,
    ) -> Result<T, ResourceError> {
        match value {
            Value::Object(_) => Ok(T::try_from_raw(Some(value), overrides, self.coercion)?),
            Value::Null => Ok(T::try_from_raw(None, overrides, self.coercion)?),
            other => Err(ResourceError::UnexpectedShape {
                resource: T::schema().name,
                expected: "object",
                found: shape_of(other),
            }),
        }
    }

    fn write<T: Entity>(
        &self,
        method: HttpMethod,
        path: &ResourcePath,
        payload: Map<String, Value>,
    ) -> Result<T, ResourceError> {
        let response = self.dispatch(
            method,
            T::BASE,
            path,
            None,
            Some(Value::Object(payload)),
            Some(T::schema().key),
        )?;
        let body = response.json().map_err(ResourceError::InvalidResponse)?;
        self.entity_from::<T>(&body, &Map::new())
    }

    fn dispatch(
        &self,
        method: HttpMethod,
        base: ApiBase,
        path: &ResourcePath,
        query: Option<&Params>,
        body: Option<Value>,
        form_root: Option<&str>,
    ) -> Result<HttpResponse, ResourceError> {
        let mut builder = HttpRequest::builder(method, path.to_string()).base(base);
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            builder = builder.query(query.to_query());
        }
        if let Some(body) = body {
            builder = builder.body(body).body_type(self.http.data_type());
            if let Some(root) = form_root {
                builder = builder.form_root(root);
            }
        }

        let request = builder.build().map_err(crate::clients::HttpError::from)?;
        Ok(self.http.request(request)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{HttpError, RecordingTransport};
    use crate::config::{AccountId, ApiKey, BodyEncoding};
    use serde_json::json;

    crate::entity! {
        #[entity(key = "widget", path = "widgets", primary_key = "id")]
        pub struct Widget {
            id: Int,
            name: Str,
            size: Int,
        }
    }

    fn config() -> XplentyConfig {
        XplentyConfig::builder()
            .account_id(AccountId::new("acme").unwrap())
            .api_key(ApiKey::new("key").unwrap())
            .build()
            .unwrap()
    }

    fn client(transport: &Arc<RecordingTransport>) -> XplentyClient {
        XplentyClient::with_transport(&config(), transport.clone())
    }

    #[test]
    fn test_fetch_collection_maps_every_element() {
        let transport = Arc::new(RecordingTransport::new());
        transport.push_json(200, r#"[{"id": 1, "name": "a"}, {"id": "2", "size": "x"}]"#);

        let widgets: Collection<Widget> = client(&transport)
            .fetch_collection("widgets", None, Map::new())
            .unwrap();

        assert_eq!(widgets.len(), 2);
        assert_eq!(widgets[1].id, Some(2));
        assert_eq!(widgets[1].size, None);
        let request = &transport.requests()[0];
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.url, "https://api.xplenty.com/acme/api/widgets");
    }

    #[test]
    fn test_fetch_collection_applies_context_as_overrides() {
        let transport = Arc::new(RecordingTransport::new());
        transport.push_json(200, r#"[{"id": 1, "name": "a"}]"#);

        let mut context = Map::new();
        context.insert("name".to_string(), json!("pinned"));
        let widgets: Collection<Widget> = client(&transport)
            .fetch_collection("widgets", None, context)
            .unwrap();

        assert_eq!(widgets[0].name.as_deref(), Some("pinned"));
        assert_eq!(widgets.context()["name"], json!("pinned"));
    }

    #[test]
    fn test_fetch_collection_rejects_object_body() {
        let transport = Arc::new(RecordingTransport::new());
        transport.push_json(200, r#"{"id": 1}"#);

        let result = client(&transport).fetch_collection::<Widget>("widgets", None, Map::new());
        assert!(matches!(
            result,
            Err(ResourceError::UnexpectedShape {
                expected: "array",
                found: "object",
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_json_is_invalid_response() {
        let transport = Arc::new(RecordingTransport::new());
        transport.push_json(200, "not json");

        let result = client(&transport).fetch_one::<Widget>("widgets/1", None);
        assert!(matches!(result, Err(ResourceError::InvalidResponse(_))));
    }

    #[test]
    fn test_query_params_are_sent() {
        let transport = Arc::new(RecordingTransport::new());
        transport.push_json(200, "[]");

        let params = Params::new().offset(20).limit(10);
        client(&transport)
            .fetch_collection::<Widget>("widgets", Some(&params), Map::new())
            .unwrap();

        let request = &transport.requests()[0];
        assert_eq!(
            request.query,
            vec![
                ("limit".to_string(), "10".to_string()),
                ("offset".to_string(), "20".to_string()),
            ]
        );
    }

    #[test]
    fn test_update_refetches_when_response_has_primary_key() {
        let transport = Arc::new(RecordingTransport::new());
        transport.push_json(200, r#"{"id": 5, "name": "written"}"#);
        transport.push_json(200, r#"{"id": 5, "name": "fresh", "size": 3}"#);

        let mut payload = Map::new();
        payload.insert("name".to_string(), json!("written"));
        let widget: Widget = client(&transport).update("widgets/5", payload).unwrap();

        assert_eq!(widget.name.as_deref(), Some("fresh"));
        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].method, HttpMethod::Put);
        assert_eq!(requests[0].body.as_deref(), Some(r#"{"name":"written"}"#));
        assert_eq!(requests[1].method, HttpMethod::Get);
        assert_eq!(requests[1].url, requests[0].url);
    }

    #[test]
    fn test_update_without_primary_key_skips_refetch() {
        let transport = Arc::new(RecordingTransport::new());
        transport.push_json(200, r#"{"name": "written"}"#);

        let widget: Widget = client(&transport).update("widgets/5", Map::new()).unwrap();
        assert_eq!(widget.name.as_deref(), Some("written"));
        assert_eq!(transport.call_count(), 1);
    }

    #[test]
    fn test_create_posts_payload() {
        let transport = Arc::new(RecordingTransport::new());
        transport.push_json(201, r#"{"id": 9}"#);

        let mut payload = Map::new();
        payload.insert("size".to_string(), json!(4));
        let widget: Widget = client(&transport).create("widgets", payload).unwrap();

        assert_eq!(widget.id, Some(9));
        let request = &transport.requests()[0];
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.header("Content-Type"), Some("application/json"));
    }

    #[test]
    fn test_form_encoding_nests_under_schema_key() {
        let config = XplentyConfig::builder()
            .account_id(AccountId::new("acme").unwrap())
            .api_key(ApiKey::new("key").unwrap())
            .body_encoding(BodyEncoding::Form)
            .build()
            .unwrap();
        let transport = Arc::new(RecordingTransport::new());
        transport.push_json(201, r#"{"id": 9}"#);

        let mut payload = Map::new();
        payload.insert("size".to_string(), json!(4));
        XplentyClient::with_transport(&config, transport.clone())
            .create::<Widget>("widgets", payload)
            .unwrap();

        assert_eq!(
            transport.requests()[0].body.as_deref(),
            Some("widget%5Bsize%5D=4")
        );
    }

    #[test]
    fn test_remove_returns_true_on_success() {
        let transport = Arc::new(RecordingTransport::new());
        transport.push_json(204, "");

        assert!(client(&transport)
            .remove(ApiBase::Short, "user/keys/3")
            .unwrap());
        let request = &transport.requests()[0];
        assert_eq!(request.method, HttpMethod::Delete);
        assert_eq!(request.url, "https://api.xplenty.com/user/keys/3");
    }

    #[test]
    fn test_validation_error_propagates() {
        let transport = Arc::new(RecordingTransport::new());
        transport.push_json(422, r#"{"message": "nodes is invalid"}"#);

        let error = client(&transport)
            .create::<Widget>("widgets", Map::new())
            .unwrap_err();
        match error {
            ResourceError::Http(HttpError::Validation(e)) => assert_eq!(e.message, "nodes is invalid"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_strict_mode_reports_coercion_failures() {
        let config = XplentyConfig::builder()
            .account_id(AccountId::new("acme").unwrap())
            .api_key(ApiKey::new("key").unwrap())
            .coercion(CoercionMode::Strict)
            .build()
            .unwrap();
        let transport = Arc::new(RecordingTransport::new());
        transport.push_json(200, r#"{"id": "nope"}"#);

        let result = XplentyClient::with_transport(&config, transport.clone())
            .fetch_one::<Widget>("widgets/1", None);
        assert!(matches!(result, Err(ResourceError::Coercion(_))));
    }

    #[test]
    fn test_reload_fetches_member_path() {
        let transport = Arc::new(RecordingTransport::new());
        transport.push_json(200, r#"{"id": 3, "name": "again"}"#);

        let stale = Widget {
            id: Some(3),
            ..Widget::default()
        };
        let fresh = client(&transport).reload(stale).unwrap();
        assert_eq!(fresh.name.as_deref(), Some("again"));
        assert!(transport.requests()[0].url.ends_with("/widgets/3"));

        let keyless = client(&transport).reload(Widget::default()).unwrap();
        assert_eq!(keyless, Widget::default());
        assert_eq!(transport.call_count(), 1);
    }
}
