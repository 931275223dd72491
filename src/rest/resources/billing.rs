//! Billing and quota resources: subscription, plans, payment method and the
//! API rate limit status.

use serde_json::{Map, Value};

use crate::clients::HttpMethod;
use crate::entity;
use crate::rest::{Collection, Entity, ResourceError, XplentyClient};

entity! {
    #[entity(key = "subscription", path = "subscription", primary_key = "plan_id")]
    /// The account's current subscription.
    pub struct Subscription {
        plan_id: Str,
        url: Str,
        trial_period_days: Int,
        trialling: Bool,
        trial_start: Timestamp,
        trial_end: Timestamp,
    }
}

entity! {
    #[entity(key = "plan", path = "plans", primary_key = "id")]
    /// A subscription plan.
    pub struct Plan {
        id: Str,
        name: Str,
        description: Str,
        price_currency: Str,
        price_unit: Str,
        price_cents: Int,
        cluster_node_price_currency: Str,
        cluster_node_price_unit: Str,
        cluster_node_price_cents: Int,
        cluster_node_hours_included: Int,
        cluster_node_hours_limit: Int,
        cluster_nodes_limit: Int,
        cluster_size_limit: Int,
        clusters_limit: Int,
        sandbox_clusters_limit: Int,
        sandbox_node_hours_included: Int,
        sandbox_node_hours_limit: Int,
        members_limit: Int,
        position: Int,
        created_at: Timestamp,
        updated_at: Timestamp,
    }
}

entity! {
    #[entity(key = "payment_method", path = "payment_method")]
    /// The card the account is billed to.
    pub struct PaymentMethod {
        card_last_4: Str,
        card_number: Str,
        card_type: Str,
        expiration_date: Str,
        url: Str,
    }
}

entity! {
    #[entity(key = "limits", path = "rate_limit_status")]
    /// The API request quota of the account.
    pub struct AccountLimits {
        limit: Int,
        remaining: Int,
    }
}

impl XplentyClient {
    /// Fetches the account subscription.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn subscription(&self) -> Result<Subscription, ResourceError> {
        self.fetch_one(Subscription::PATH, None)
    }

    /// Lists the available plans.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn plans(&self) -> Result<Collection<Plan>, ResourceError> {
        self.fetch_collection(Plan::PATH, None, Map::new())
    }

    /// Fetches the account payment method.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn payment_method(&self) -> Result<PaymentMethod, ResourceError> {
        self.fetch_one(PaymentMethod::PATH, None)
    }

    /// Replaces the payment method and/or the plan.
    ///
    /// Returns `true` when the server answered 2xx.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn update_payment_method(
        &self,
        billing_payment_token: Option<&str>,
        plan_id: Option<&str>,
    ) -> Result<bool, ResourceError> {
        let mut body = Map::new();
        if let Some(token) = billing_payment_token {
            body.insert("billing_payment_token".to_string(), Value::from(token));
        }
        if let Some(plan_id) = plan_id {
            body.insert("plan_id".to_string(), Value::from(plan_id));
        }
        let response = self.send(
            HttpMethod::Put,
            PaymentMethod::BASE,
            PaymentMethod::PATH,
            None,
            Some(Value::Object(body)),
        )?;
        Ok(response.is_ok())
    }

    /// Fetches the API rate limit status of the account.
    ///
    /// The server nests the counters under `limits`.
    ///
    /// # Errors
    ///
    /// Returns the error of the call.
    pub fn account_limits(&self) -> Result<AccountLimits, ResourceError> {
        let body = self.send_json(
            HttpMethod::Get,
            AccountLimits::BASE,
            AccountLimits::PATH,
            None,
            None,
        )?;
        let limits = body.get(AccountLimits::schema().key).unwrap_or(&Value::Null);
        self.entity_from(limits, &Map::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::resources::testing::{client, ACCOUNT};
    use serde_json::json;

    #[test]
    fn test_account_limits_reads_nested_object() {
        let (client, transport) = client();
        transport.push_json(200, r#"{"limits": {"limit": "5000", "remaining": 4999}}"#);

        let limits = client.account_limits().unwrap();
        assert_eq!(limits.limit, Some(5000));
        assert_eq!(limits.remaining, Some(4999));
        assert_eq!(
            transport.requests()[0].url,
            format!("{ACCOUNT}/rate_limit_status")
        );
    }

    #[test]
    fn test_account_limits_without_limits_is_empty() {
        let (client, transport) = client();
        transport.push_json(200, "{}");
        assert_eq!(client.account_limits().unwrap(), AccountLimits::default());
    }

    #[test]
    fn test_update_payment_method_sends_given_fields() {
        let (client, transport) = client();
        transport.push_json(200, "{}");

        assert!(client.update_payment_method(Some("tok_1"), None).unwrap());
        let request = &transport.requests()[0];
        assert_eq!(request.method, HttpMethod::Put);
        let body: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"billing_payment_token": "tok_1"}));
    }

    #[test]
    fn test_subscription_and_plans() {
        let (client, transport) = client();
        transport.push_json(200, r#"{"plan_id": "free", "trialling": false}"#);
        transport.push_json(200, r#"[{"id": "free", "members_limit": 3}]"#);

        assert_eq!(client.subscription().unwrap().trialling, Some(false));
        assert_eq!(client.plans().unwrap().get("free").unwrap().members_limit, Some(3));
    }
}
