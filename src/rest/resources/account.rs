//! Accounts of the authenticated user and product announcements.
//!
//! Both live under the short base URL, outside any single account.

use serde_json::{Map, Value};

use crate::clients::HttpMethod;
use crate::entity;
use crate::rest::resources::{list, payload};
use crate::rest::{
    Collection, Creatable, Entity, Params, Removable, ResourceError, ResourcePath, XplentyClient,
};

entity! {
    #[entity(key = "account", path = "accounts", base = Short, primary_key = "id")]
    /// An account the authenticated user belongs to.
    pub struct Account {
        id: Int,
        account_id: Str,
        uname: Str,
        name: Str,
        region: Str,
        location: Str,
        billing_email: Str,
        gravatar_email: Str,
        avatar_url: Str,
        role: Str,
        url: Str,
        public_key: Str,
        owner_id: Int,
        members_count: Int,
        packages_count: Int,
        jobs_count: Int,
        running_jobs_count: Int,
        schedules_count: Int,
        connections_count: Int,
        hooks_count: Int,
        created_at: Timestamp,
        updated_at: Timestamp,
    }
}

entity! {
    #[entity(key = "product_update", path = "product_updates", base = Short, primary_key = "id")]
    /// A product announcement.
    pub struct ProductUpdate {
        id: Int,
        title: Str,
        body: Str,
        body_html: Str,
        body_text: Str,
        likes: Int,
        liked: Bool,
        created_at: Timestamp,
    }
}

/// Accounts are addressed by their textual `account_id`, not `id`.
fn account_path(account_id: &str) -> ResourcePath {
    ResourcePath::new(Account::PATH).join(account_id)
}

impl Account {
    fn path(&self) -> Result<ResourcePath, ResourceError> {
        self.account_id
            .as_deref()
            .map(account_path)
            .ok_or(ResourceError::MissingId {
                resource: Self::schema().name,
            })
    }
}

impl Removable for Account {
    fn delete(&self, client: &XplentyClient) -> Result<bool, ResourceError> {
        client.remove(Self::BASE, self.path()?)
    }
}

impl Creatable for Account {
    /// Creates an account. `name` and `region` are required by the server;
    /// `account_id` picks the textual id.
    fn create(
        client: &XplentyClient,
        context: &Map<String, Value>,
        params: Params,
    ) -> Result<Self, ResourceError> {
        let mut body = context.clone();
        body.extend(payload::<Self>(params)?);
        let account: Self = client.create(Self::PATH, body)?;
        match account.path() {
            Ok(path) => client.fetch_one(path, None),
            Err(_) => Ok(account),
        }
    }
}

impl ProductUpdate {
    /// Likes the announcement and returns it refreshed.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] without an id, or the error of
    /// the call.
    pub fn like(&self, client: &XplentyClient) -> Result<Self, ResourceError> {
        let path = self.member_path()?.join("like");
        let body = client.send_json(HttpMethod::Post, Self::BASE, path, None, None)?;
        let update: Self = client.entity_from(&body, &Map::new())?;
        client.reload(update)
    }
}

impl XplentyClient {
    /// Lists the accounts of the authenticated user.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedArgument`] for unknown filters, or
    /// the error of the call.
    pub fn accounts(&self, params: Params) -> Result<Collection<Account>, ResourceError> {
        list(self, &params)
    }

    /// Creates an account in `region`.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn create_account(
        &self,
        name: &str,
        region: &str,
        account_id: Option<&str>,
    ) -> Result<Account, ResourceError> {
        let mut params = Params::new().set("name", name).set("region", region);
        if let Some(account_id) = account_id {
            params.insert("account_id", account_id);
        }
        Account::create(self, &Map::new(), params)
    }

    /// Updates an account and returns its refreshed state.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedArgument`] for unknown fields, or
    /// the error of the call.
    pub fn update_account(&self, account_id: &str, params: Params) -> Result<Account, ResourceError> {
        let mut body = payload::<Account>(params)?;
        body.insert("account_id".to_string(), Value::from(account_id));
        self.update(account_path(account_id), body)
    }

    /// Deletes an account, returning `true` on success.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn delete_account(&self, account_id: &str) -> Result<bool, ResourceError> {
        self.remove(Account::BASE, account_path(account_id))
    }

    /// Lists product announcements.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn product_updates(&self) -> Result<Collection<ProductUpdate>, ResourceError> {
        self.fetch_collection(ProductUpdate::PATH, None, Map::new())
    }

    /// Likes a product announcement.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn like_product_update(&self, id: i64) -> Result<ProductUpdate, ResourceError> {
        ProductUpdate {
            id: Some(id),
            ..ProductUpdate::default()
        }
        .like(self)
    }
}
