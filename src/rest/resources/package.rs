//! Package resource: data-flow definitions, their validations and the
//! templates new packages can start from.

use serde_json::{Map, Value};

use crate::clients::HttpMethod;
use crate::entity;
use crate::rest::resources::{list, payload};
use crate::rest::{
    key_segment, Collection, Creatable, Entity, Params, Removable, ResourceError, ResourcePath,
    XplentyClient,
};

entity! {
    #[entity(key = "package", path = "packages", primary_key = "id")]
    /// A data-flow definition that jobs run.
    pub struct Package {
        id: Int,
        name: Str,
        description: Str,
        url: Str,
        html_url: Str,
        status: Str,
        status_message: Str,
        flow_type: Str,
        sort: Str,
        direction: Str,
        owner_id: Int,
        package_id: Int,
        account_id: Int,
        variables: Object,
        errors: List,
        created_at: Timestamp,
        updated_at: Timestamp,
        since: Timestamp,
        runtime: Timestamp,
    }
}

entity! {
    #[entity(key = "validation", path = "validations", primary_key = "id")]
    /// The result of checking a package for errors.
    pub struct PackageValidation {
        id: Int,
        status: Str,
        status_message: Str,
        url: Str,
        package_id: Int,
        owner_id: Int,
        account_id: Int,
        errors: List,
        runtime: Timestamp,
        created_at: Timestamp,
        updated_at: Timestamp,
    }
}

entity! {
    #[entity(key = "template", path = "templates", primary_key = "id")]
    /// A package template.
    pub struct PackageTemplate {
        id: Int,
        name: Str,
        description: Str,
        position: Int,
        author: Object,
    }
}

fn package_path(id: i64) -> ResourcePath {
    ResourcePath::new(Package::PATH).join(id)
}

fn validations_path(package_id: &Value) -> ResourcePath {
    ResourcePath::new(Package::PATH)
        .join(key_segment(package_id))
        .join(PackageValidation::PATH)
}

impl Removable for Package {}

impl Creatable for Package {
    fn create(
        client: &XplentyClient,
        context: &Map<String, Value>,
        params: Params,
    ) -> Result<Self, ResourceError> {
        let mut body = context.clone();
        body.extend(payload::<Self>(params)?);
        let package: Self = client.create(Self::PATH, body)?;
        client.reload(package)
    }
}

impl Creatable for PackageValidation {
    /// Runs a validation of the package named by `package_id` in `context`
    /// or `params`. No other argument is accepted.
    fn create(
        client: &XplentyClient,
        context: &Map<String, Value>,
        params: Params,
    ) -> Result<Self, ResourceError> {
        let mut args = context.clone();
        args.extend(params.filtered(Self::schema(), &[])?);
        if let Some(extra) = args.keys().find(|k| *k != "package_id") {
            return Err(ResourceError::UnexpectedArgument {
                resource: Self::schema().name,
                argument: extra.clone(),
            });
        }
        let package_id = args
            .get("package_id")
            .cloned()
            .ok_or(ResourceError::MissingId {
                resource: Package::schema().name,
            })?;

        let path = validations_path(&package_id);
        let body = client.send_json(HttpMethod::Post, Self::BASE, path.clone(), None, None)?;
        let validation: Self = client.entity_from(&body, context)?;
        match validation.primary_key() {
            Some(id) => client.fetch_one(path.join(key_segment(&id)), None),
            None => Ok(validation),
        }
    }
}

impl XplentyClient {
    /// Lists packages, filtered by any [`Package`] field plus
    /// `offset`/`limit`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedArgument`] for unknown filters, or
    /// the error of the call.
    pub fn packages(&self, params: Params) -> Result<Collection<Package>, ResourceError> {
        list(self, &params)
    }

    /// Fetches one package.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn package(&self, id: i64) -> Result<Package, ResourceError> {
        self.fetch_one(package_path(id), None)
    }

    /// Creates a package and returns it as stored.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedArgument`] for unknown fields, or
    /// the error of the call.
    pub fn create_package(&self, params: Params) -> Result<Package, ResourceError> {
        Package::create(self, &Map::new(), params)
    }

    /// Updates a package and returns its refreshed state.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedArgument`] for unknown fields, or
    /// the error of the call.
    pub fn update_package(&self, id: i64, params: Params) -> Result<Package, ResourceError> {
        let body = payload::<Package>(params)?;
        self.update(package_path(id), body)
    }

    /// Deletes a package, returning `true` on success.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn delete_package(&self, id: i64) -> Result<bool, ResourceError> {
        self.remove(Package::BASE, package_path(id))
    }

    /// Lists the validations of a package.
    ///
    /// The collection carries `package_id`, so
    /// [`Collection::add`] runs another validation of the same package.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn package_validations(
        &self,
        package_id: i64,
    ) -> Result<Collection<PackageValidation>, ResourceError> {
        let mut context = Map::new();
        context.insert("package_id".to_string(), Value::from(package_id));
        self.fetch_collection(validations_path(&Value::from(package_id)), None, context)
    }

    /// Runs a validation of a package and returns it.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn run_package_validation(
        &self,
        package_id: i64,
    ) -> Result<PackageValidation, ResourceError> {
        PackageValidation::create(self, &Map::new(), Params::new().set("package_id", package_id))
    }

    /// Lists the package templates.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn package_templates(&self) -> Result<Collection<PackageTemplate>, ResourceError> {
        self.fetch_collection(
            ResourcePath::new(Package::PATH).join(PackageTemplate::PATH),
            None,
            Map::new(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::resources::testing::{client, ACCOUNT};

    #[test]
    fn test_validations_collection_carries_package_id() {
        let (client, transport) = client();
        transport.push_json(200, r#"[{"id": 1, "status": "completed"}]"#);

        let validations = client.package_validations(30).unwrap();
        assert_eq!(validations[0].package_id, Some(30));
        assert_eq!(
            transport.requests()[0].url,
            format!("{ACCOUNT}/packages/30/validations")
        );
    }

    #[test]
    fn test_collection_add_runs_validation_of_same_package() {
        let (client, transport) = client();
        transport.push_json(200, "[]");
        transport.push_json(201, r#"{"id": 4, "status": "running"}"#);
        transport.push_json(200, r#"{"id": 4, "status": "completed"}"#);

        let mut validations = client.package_validations(30).unwrap();
        let added = validations.add(&client, Params::new()).unwrap();

        assert_eq!(added.status.as_deref(), Some("completed"));
        assert_eq!(validations.len(), 1);
        let requests = transport.requests();
        assert_eq!(requests[1].method, HttpMethod::Post);
        assert_eq!(requests[1].url, format!("{ACCOUNT}/packages/30/validations"));
        assert_eq!(requests[2].url, format!("{ACCOUNT}/packages/30/validations/4"));
    }

    #[test]
    fn test_validation_rejects_other_arguments() {
        let (client, transport) = client();
        let result = PackageValidation::create(
            &client,
            &Map::new(),
            Params::new().set("package_id", 1).set("status", "x"),
        );
        assert!(matches!(
            result,
            Err(ResourceError::UnexpectedArgument { ref argument, .. }) if argument == "status"
        ));
        assert_eq!(transport.call_count(), 0);
    }

    #[test]
    fn test_templates_path() {
        let (client, transport) = client();
        transport.push_json(200, r#"[{"id": 1, "name": "t", "author": {"name": "x"}}]"#);

        let templates = client.package_templates().unwrap();
        assert_eq!(templates[0].author.as_ref().unwrap()["name"], "x");
        assert_eq!(
            transport.requests()[0].url,
            format!("{ACCOUNT}/packages/templates")
        );
    }

    #[test]
    fn test_create_package_filters_arguments() {
        let (client, transport) = client();
        let result = client.create_package(Params::new().set("name", "p").set("colour", "x"));
        assert!(result.is_err());
        assert_eq!(transport.call_count(), 0);
    }

    #[test]
    fn test_delete_package() {
        let (client, transport) = client();
        transport.push_json(200, "{}");

        assert!(client.delete_package(6).unwrap());
        assert_eq!(transport.requests()[0].url, format!("{ACCOUNT}/packages/6"));
    }
}
