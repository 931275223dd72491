//! The authenticated user, their SSH public keys and notifications.
//!
//! All of these live under the short base URL.

use serde_json::{Map, Value};

use crate::clients::{ApiBase, HttpMethod};
use crate::entity;
use crate::rest::resources::{list, payload};
use crate::rest::{
    Collection, Creatable, Entity, Params, Removable, ResourceError, ResourcePath, XplentyClient,
};

entity! {
    #[entity(key = "user", path = "user", base = Short, primary_key = "id")]
    /// The authenticated user.
    pub struct User {
        id: Int,
        name: Str,
        email: Str,
        gravatar_email: Str,
        avatar_url: Str,
        time_zone: Str,
        location: Str,
        api_key: Str,
        url: Str,
        notifications_count: Int,
        unread_notifications_count: Int,
        confirmed: Bool,
        receive_newsletter: Bool,
        notification_settings: Object,
        confirmed_at: Timestamp,
        created_at: Timestamp,
        updated_at: Timestamp,
    }
}

entity! {
    #[entity(key = "public_key", path = "user/keys", base = Short, primary_key = "id")]
    /// An SSH public key of the authenticated user.
    pub struct PublicKey {
        id: Int,
        name: Str,
        comment: Str,
        fingerprint: Str,
        url: Str,
        sort: Str,
        direction: Str,
        created_at: Timestamp,
        updated_at: Timestamp,
    }
}

entity! {
    #[entity(key = "notification", path = "user/notifications", base = Short, primary_key = "id")]
    /// A notification addressed to the authenticated user.
    pub struct Notification {
        id: Int,
        title: Str,
        message: Str,
        all: Str,
        sort: Str,
        direction: Str,
        last_read_at: Timestamp,
        since: Timestamp,
    }
}

impl Removable for PublicKey {}

impl Creatable for PublicKey {
    /// Uploads a key. Accepts `public_key` (required) and `name`.
    fn create(
        client: &XplentyClient,
        context: &Map<String, Value>,
        params: Params,
    ) -> Result<Self, ResourceError> {
        let mut body = context.clone();
        body.extend(params.filtered(Self::schema(), &["public_key"])?);
        let key: Self = client.create(Self::PATH, body)?;
        client.reload(key)
    }
}

impl XplentyClient {
    /// Fetches the authenticated user.
    ///
    /// The API key is only included in the response when `current_password`
    /// is given.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn user(&self, current_password: Option<&str>) -> Result<User, ResourceError> {
        let query = current_password.map(|password| Params::new().set("current_password", password));
        self.fetch_one(User::PATH, query.as_ref())
    }

    /// Updates the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedArgument`] for unknown fields, or
    /// the error of the call.
    pub fn update_user(
        &self,
        current_password: &str,
        params: Params,
    ) -> Result<User, ResourceError> {
        let mut body = payload::<User>(params)?;
        body.insert(
            "current_password".to_string(),
            Value::from(current_password),
        );
        self.update(User::PATH, body)
    }

    /// Requests a password reset email for `email`.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn reset_user_password(&self, email: &str) -> Result<bool, ResourceError> {
        let mut body = Map::new();
        body.insert("email".to_string(), Value::from(email));
        let response = self.send(
            HttpMethod::Post,
            ApiBase::Short,
            "user_password",
            None,
            Some(Value::Object(body)),
        )?;
        Ok(response.is_ok())
    }

    /// Lists the public keys of the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedArgument`] for unknown filters, or
    /// the error of the call.
    pub fn public_keys(&self, params: Params) -> Result<Collection<PublicKey>, ResourceError> {
        list(self, &params)
    }

    /// Uploads a public key.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn create_public_key(
        &self,
        public_key: &str,
        name: Option<&str>,
    ) -> Result<PublicKey, ResourceError> {
        let mut params = Params::new().set("public_key", public_key);
        if let Some(name) = name {
            params.insert("name", name);
        }
        PublicKey::create(self, &Map::new(), params)
    }

    /// Deletes a public key, returning `true` on success.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn delete_public_key(&self, id: i64) -> Result<bool, ResourceError> {
        self.remove(PublicKey::BASE, ResourcePath::new(PublicKey::PATH).join(id))
    }

    /// Lists the notifications of the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedArgument`] for unknown filters, or
    /// the error of the call.
    pub fn notifications(&self, params: Params) -> Result<Collection<Notification>, ResourceError> {
        list(self, &params)
    }

    /// Marks every notification as read.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn mark_notifications_read(&self) -> Result<bool, ResourceError> {
        let path = ResourcePath::new(Notification::PATH).join("mark");
        let response = self.send(HttpMethod::Post, Notification::BASE, path, None, None)?;
        Ok(response.is_ok())
    }
}
