//! Hook resource: notifications delivered to external services when
//! account events happen.

use serde_json::{Map, Value};

use crate::clients::HttpMethod;
use crate::entity;
use crate::rest::resources::{list, payload};
use crate::rest::{
    Collection, Creatable, Entity, Params, Removable, ResourceError, ResourcePath, XplentyClient,
};

entity! {
    #[entity(key = "hook", path = "hooks", primary_key = "id")]
    /// An event hook.
    pub struct Hook {
        id: Str,
        name: Str,
        kind as "type": Str,
        url: Str,
        salt: Str,
        sort: Str,
        direction: Str,
        active: Bool,
        settings: Object,
        events: List,
        since: Timestamp,
    }
}

entity! {
    #[entity(key = "hook_type", path = "types", primary_key = "type")]
    /// A kind of hook target (web, email, slack...).
    pub struct HookType {
        name: Str,
        kind as "type": Str,
        description: Str,
        icon_url: Str,
        groups: List,
    }
}

entity! {
    #[entity(key = "hook_event", path = "hook_events", base = Short, primary_key = "id")]
    /// An event a hook can subscribe to.
    pub struct HookEvent {
        id: Str,
        name: Str,
        group_name: Str,
    }
}

impl Hook {
    /// Asks the server to deliver a test notification, then returns the
    /// refreshed hook.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] without an id, or the error of
    /// the call.
    pub fn ping(&self, client: &XplentyClient) -> Result<Self, ResourceError> {
        let path = self.member_path()?.join("ping");
        let body = client.send_json(HttpMethod::Get, Self::BASE, path, None, None)?;
        let hook: Self = client.entity_from(&body, &Map::new())?;
        client.reload(hook)
    }

    /// Generates a new signing salt and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] without an id, or the error of
    /// the call.
    pub fn reset_salt(&self, client: &XplentyClient) -> Result<Option<String>, ResourceError> {
        let path = self.member_path()?.join("reset_salt");
        let body = client.send_json(HttpMethod::Put, Self::BASE, path, None, None)?;
        Ok(body.get("salt").and_then(Value::as_str).map(String::from))
    }
}

impl Removable for Hook {}

impl Creatable for Hook {
    /// Creates a hook. Accepts any [`Hook`] field; `type`, `events` and
    /// `settings` are expected by the server.
    fn create(
        client: &XplentyClient,
        context: &Map<String, Value>,
        params: Params,
    ) -> Result<Self, ResourceError> {
        let mut body = context.clone();
        body.extend(payload::<Self>(params)?);
        let hook: Self = client.create(Self::PATH, body)?;
        client.reload(hook)
    }
}

fn hook(id: &str) -> Hook {
    Hook {
        id: Some(id.to_string()),
        ..Hook::default()
    }
}

impl XplentyClient {
    /// Lists hooks, filtered by any [`Hook`] field plus `offset`/`limit`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedArgument`] for unknown filters, or
    /// the error of the call.
    pub fn hooks(&self, params: Params) -> Result<Collection<Hook>, ResourceError> {
        list(self, &params)
    }

    /// Fetches one hook.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn hook(&self, id: &str) -> Result<Hook, ResourceError> {
        self.fetch_one(ResourcePath::new(Hook::PATH).join(id), None)
    }

    /// Creates a hook of `kind` subscribed to `events`.
    ///
    /// `params` may add any other [`Hook`] field, such as `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedArgument`] for unknown fields, or
    /// the error of the call.
    pub fn create_hook(
        &self,
        kind: &str,
        events: &[&str],
        settings: Map<String, Value>,
        params: Params,
    ) -> Result<Hook, ResourceError> {
        let params = params
            .set("type", kind)
            .set("events", events.to_vec())
            .set("settings", settings);
        Hook::create(self, &Map::new(), params)
    }

    /// Updates a hook and returns its refreshed state.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedArgument`] for unknown fields, or
    /// the error of the call.
    pub fn update_hook(&self, id: &str, params: Params) -> Result<Hook, ResourceError> {
        let body = payload::<Hook>(params)?;
        self.update(ResourcePath::new(Hook::PATH).join(id), body)
    }

    /// Deletes a hook, returning `true` on success.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn delete_hook(&self, id: &str) -> Result<bool, ResourceError> {
        hook(id).delete(self)
    }

    /// Sends a test notification through a hook.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn ping_hook(&self, id: &str) -> Result<Hook, ResourceError> {
        hook(id).ping(self)
    }

    /// Generates a new signing salt for a hook and returns it.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn reset_hook_salt(&self, id: &str) -> Result<Option<String>, ResourceError> {
        hook(id).reset_salt(self)
    }

    /// Lists the available hook types.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn hook_types(&self) -> Result<Collection<HookType>, ResourceError> {
        self.fetch_collection(
            ResourcePath::new(Hook::PATH).join(HookType::PATH),
            None,
            Map::new(),
        )
    }

    /// Lists the events hooks can subscribe to.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn hook_events(&self) -> Result<Collection<HookEvent>, ResourceError> {
        self.fetch_collection(HookEvent::PATH, None, Map::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::resources::testing::{client, ACCOUNT, SHORT};
    use serde_json::json;

    #[test]
    fn test_create_hook_body() {
        let (client, transport) = client();
        transport.push_json(201, r#"{"id": "h1"}"#);
        transport.push_json(200, r#"{"id": "h1", "active": 1, "events": ["job"]}"#);

        let mut settings = Map::new();
        settings.insert("url".to_string(), json!("https://example.com/hook"));
        let hook = client
            .create_hook("web", &["job"], settings, Params::new().set("name", "ci"))
            .unwrap();

        assert_eq!(hook.active, Some(true));
        assert_eq!(hook.events, Some(vec![json!("job")]));

        let body: Value =
            serde_json::from_str(transport.requests()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "type": "web",
                "events": ["job"],
                "settings": {"url": "https://example.com/hook"},
                "name": "ci",
            })
        );
    }

    #[test]
    fn test_reset_salt_returns_new_salt() {
        let (client, transport) = client();
        transport.push_json(200, r#"{"salt": "s3cr3t"}"#);

        assert_eq!(client.reset_hook_salt("h1").unwrap().as_deref(), Some("s3cr3t"));
        let request = &transport.requests()[0];
        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(request.url, format!("{ACCOUNT}/hooks/h1/reset_salt"));
    }

    #[test]
    fn test_ping_refetches() {
        let (client, transport) = client();
        transport.push_json(200, r#"{"id": "h1"}"#);
        transport.push_json(200, r#"{"id": "h1", "name": "ci"}"#);

        assert_eq!(client.ping_hook("h1").unwrap().name.as_deref(), Some("ci"));
        assert_eq!(transport.requests()[0].url, format!("{ACCOUNT}/hooks/h1/ping"));
        assert_eq!(transport.requests()[1].url, format!("{ACCOUNT}/hooks/h1"));
    }

    #[test]
    fn test_hook_types_and_events_bases() {
        let (client, transport) = client();
        transport.push_json(200, r#"[{"type": "web", "name": "Web"}]"#);
        transport.push_json(200, r#"[{"id": "job", "group_name": "Job"}]"#);

        assert!(client.hook_types().unwrap().get("web").is_some());
        assert_eq!(
            client.hook_events().unwrap()[0].group_name.as_deref(),
            Some("Job")
        );

        let urls: Vec<_> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![format!("{ACCOUNT}/hooks/types"), format!("{SHORT}/hook_events")]
        );
    }
}
