//! Connection resource: stored credentials for data sources and
//! destinations.
//!
//! Connections are addressed by type and id (`connections/{type}/{id}`).

use serde_json::Map;

use crate::entity;
use crate::rest::resources::list;
use crate::rest::{
    Collection, Entity, Params, Removable, ResourceError, ResourcePath, XplentyClient,
};

entity! {
    #[entity(key = "connection", path = "connections", primary_key = "id")]
    /// A stored connection.
    pub struct Connection {
        id: Int,
        name: Str,
        kind as "type": Str,
        url: Str,
        created_at: Timestamp,
        updated_at: Timestamp,
    }
}

entity! {
    #[entity(key = "connection_type", path = "types", primary_key = "name")]
    /// A kind of connection the account can create.
    pub struct ConnectionType {
        name: Str,
        kind as "type": Str,
        description: Str,
        icon_url: Str,
        groups: List,
    }
}

fn connection_path(kind: &str, id: i64) -> ResourcePath {
    ResourcePath::from_segments([Connection::PATH, kind]).join(id)
}

impl Removable for Connection {
    /// Deletes the connection at `connections/{type}/{id}`.
    fn delete(&self, client: &XplentyClient) -> Result<bool, ResourceError> {
        let (Some(kind), Some(id)) = (self.kind.as_deref(), self.id) else {
            return Err(ResourceError::MissingId {
                resource: Self::schema().name,
            });
        };
        client.remove(Self::BASE, connection_path(kind, id))
    }
}

impl XplentyClient {
    /// Lists connections, filtered by any [`Connection`] field plus
    /// `offset`/`limit`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedArgument`] for unknown filters, or
    /// the error of the call.
    pub fn connections(&self, params: Params) -> Result<Collection<Connection>, ResourceError> {
        list(self, &params)
    }

    /// Lists the connection types.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn connection_types(&self) -> Result<Collection<ConnectionType>, ResourceError> {
        self.fetch_collection(
            ResourcePath::new(Connection::PATH).join(ConnectionType::PATH),
            None,
            Map::new(),
        )
    }

    /// Deletes the connection of type `kind` with id `id`.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn delete_connection(&self, kind: &str, id: i64) -> Result<bool, ResourceError> {
        self.remove(Connection::BASE, connection_path(kind, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::resources::testing::{client, ACCOUNT};

    #[test]
    fn test_delete_connection_uses_type_and_id() {
        let (client, transport) = client();
        transport.push_json(200, r#"[{"id": 7, "type": "s3", "name": "bucket"}]"#);
        transport.push_json(204, "");

        let mut connections = client.connections(Params::new()).unwrap();
        assert!(connections.remove(&client, 7).unwrap());
        assert_eq!(
            transport.requests()[1].url,
            format!("{ACCOUNT}/connections/s3/7")
        );
    }

    #[test]
    fn test_delete_without_type_fails_locally() {
        let (client, transport) = client();
        let connection = Connection {
            id: Some(7),
            ..Connection::default()
        };
        assert!(matches!(
            connection.delete(&client),
            Err(ResourceError::MissingId { resource: "Connection" })
        ));
        assert_eq!(transport.call_count(), 0);
    }

    #[test]
    fn test_connection_types() {
        let (client, transport) = client();
        transport.push_json(200, r#"[{"name": "Amazon S3", "type": "s3", "groups": []}]"#);

        let types = client.connection_types().unwrap();
        assert!(types.get("Amazon S3").is_some());
        assert_eq!(
            transport.requests()[0].url,
            format!("{ACCOUNT}/connections/types")
        );
    }

    #[test]
    fn test_delete_connection_direct() {
        let (client, transport) = client();
        transport.push_json(204, "");
        assert!(client.delete_connection("mysql", 3).unwrap());
        assert!(transport.requests()[0].url.ends_with("/connections/mysql/3"));
    }
}
