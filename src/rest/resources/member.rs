//! Account member resource.

use serde_json::{Map, Value};

use crate::entity;
use crate::rest::resources::list;
use crate::rest::{
    Collection, Creatable, Entity, Params, Removable, ResourceError, ResourcePath, XplentyClient,
};

entity! {
    #[entity(key = "member", path = "members", primary_key = "id")]
    /// A user with access to the account.
    pub struct Member {
        id: Int,
        name: Str,
        email: Str,
        gravatar_email: Str,
        avatar_url: Str,
        role: Str,
        url: Str,
        html_url: Str,
        location: Str,
        confirmed: Bool,
        owner: Bool,
        confirmed_at: Timestamp,
        created_at: Timestamp,
        updated_at: Timestamp,
    }
}

impl Member {
    /// Role given to members added without one.
    pub const DEFAULT_ROLE: &'static str = "member";

    /// Changes the member's role and returns the refreshed member.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] without an id, or the error of
    /// the call.
    pub fn set_role(&self, client: &XplentyClient, role: &str) -> Result<Self, ResourceError> {
        let mut body = Map::new();
        body.insert("role".to_string(), Value::from(role));
        client.update(self.member_path()?, body)
    }
}

impl Removable for Member {}

impl Creatable for Member {
    /// Invites a member. Accepts `email` (required), `name` and `role`.
    fn create(
        client: &XplentyClient,
        context: &Map<String, Value>,
        params: Params,
    ) -> Result<Self, ResourceError> {
        let mut body = context.clone();
        body.extend(params.filtered(Self::schema(), &[])?);
        if let Some(extra) = body
            .keys()
            .find(|k| !matches!(k.as_str(), "email" | "name" | "role"))
        {
            return Err(ResourceError::UnexpectedArgument {
                resource: Self::schema().name,
                argument: extra.clone(),
            });
        }
        body.entry("role")
            .or_insert_with(|| Value::from(Self::DEFAULT_ROLE));

        let member: Self = client.create(Self::PATH, body)?;
        client.reload(member)
    }
}

impl XplentyClient {
    /// Lists account members, filtered by any [`Member`] field plus
    /// `offset`/`limit`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedArgument`] for unknown filters, or
    /// the error of the call.
    pub fn members(&self, params: Params) -> Result<Collection<Member>, ResourceError> {
        list(self, &params)
    }

    /// Adds a member by email. `role` defaults to
    /// [`Member::DEFAULT_ROLE`].
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn add_member(
        &self,
        email: &str,
        name: Option<&str>,
        role: Option<&str>,
    ) -> Result<Member, ResourceError> {
        let mut params = Params::new().set("email", email);
        if let Some(name) = name {
            params.insert("name", name);
        }
        params.insert("role", role.unwrap_or(Member::DEFAULT_ROLE));
        Member::create(self, &Map::new(), params)
    }

    /// Changes the role of a member.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn set_member_role(&self, id: i64, role: &str) -> Result<Member, ResourceError> {
        member(id).set_role(self, role)
    }

    /// Removes a member from the account.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn delete_member(&self, id: i64) -> Result<bool, ResourceError> {
        self.remove(Member::BASE, ResourcePath::new(Member::PATH).join(id))
    }
}

fn member(id: i64) -> Member {
    Member {
        id: Some(id),
        ..Member::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::HttpMethod;
    use crate::rest::resources::testing::{client, ACCOUNT};
    use serde_json::json;

    #[test]
    fn test_add_member_defaults_role() {
        let (client, transport) = client();
        transport.push_json(201, r#"{"id": 41}"#);
        transport.push_json(200, r#"{"id": 41, "email": "a@b.c", "role": "member"}"#);

        let member = client.add_member("a@b.c", None, None).unwrap();
        assert_eq!(member.role.as_deref(), Some("member"));

        let requests = transport.requests();
        let body: Value = serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"email": "a@b.c", "role": "member"}));
        assert_eq!(requests[1].url, format!("{ACCOUNT}/members/41"));
    }

    #[test]
    fn test_set_member_role_puts_role() {
        let (client, transport) = client();
        transport.push_json(200, r#"{"id": 41, "role": "admin"}"#);
        transport.push_json(200, r#"{"id": 41, "role": "admin", "name": "Ann"}"#);

        let member = client.set_member_role(41, "admin").unwrap();
        assert_eq!(member.name.as_deref(), Some("Ann"));

        let request = &transport.requests()[0];
        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(request.body.as_deref(), Some(r#"{"role":"admin"}"#));
    }

    #[test]
    fn test_member_collection_remove() {
        let (client, transport) = client();
        transport.push_json(200, r#"[{"id": 1}, {"id": 2}]"#);
        transport.push_json(204, "");

        let mut members = client.members(Params::new()).unwrap();
        assert!(members.remove(&client, "2").unwrap());
        assert_eq!(members.len(), 1);
        assert_eq!(transport.requests()[1].url, format!("{ACCOUNT}/members/2"));

        assert!(matches!(
            members.remove(&client, 9),
            Err(ResourceError::NotFound { resource: "Member", .. })
        ));
    }

    #[test]
    fn test_member_rejects_fields_outside_invite() {
        let (client, transport) = client();
        let result = Member::create(&client, &Map::new(), Params::new().set("owner", true));
        assert!(result.is_err());
        assert_eq!(transport.call_count(), 0);
    }
}
