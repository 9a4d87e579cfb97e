//! Typed storefront API over [`ApiClient`].
//!
//! Paths follow the Django REST backend. List endpoints accept either a
//! paginated `{"results": [...]}` envelope or a bare array, and malformed
//! records are skipped rather than failing the whole list.

mod cart;
mod catalog;
mod orders;
mod site;

use serde::de::DeserializeOwned;
use serde_json::Value;
use shopfront_commerce::checkout::{CustomerDetails, OrderDraft};
use shopfront_commerce::{wire, Currency, Money};

use crate::client::ApiClient;
use crate::endpoint::Endpoint;
use crate::FetchError;

/// Typed storefront backend calls.
#[derive(Debug, Clone)]
pub struct StorefrontApi {
    client: ApiClient,
    delivery_charge: Money,
}

impl StorefrontApi {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            delivery_charge: Money::zero(Currency::default()),
        }
    }

    /// Flat delivery charge seeded into every [`OrderDraft`].
    pub fn with_delivery_charge(mut self, charge: Money) -> Self {
        self.delivery_charge = charge;
        self
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Start an order for `customer` carrying the configured delivery charge.
    pub fn draft_order(&self, customer: CustomerDetails) -> OrderDraft {
        OrderDraft::new(customer).with_delivery_charge(self.delivery_charge)
    }

    /// GET a list endpoint and decode its records leniently.
    async fn get_list<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        path: &str,
        query: &[(&str, Option<&str>)],
    ) -> Result<Vec<T>, FetchError> {
        let body: Value = self.client.get_json(endpoint, path, query).await?;
        let url = self.client.url(path);
        decode_list(body).ok_or_else(|| FetchError::Deserialization {
            url,
            message: "expected a list or a paginated envelope".to_string(),
        })
    }
}

/// Unwrap `{"results": [...]}` or a bare array into records.
pub fn decode_list<T: DeserializeOwned>(body: Value) -> Option<Vec<T>> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => items,
            _ => return None,
        },
        _ => return None,
    };
    Some(wire::collect_lenient(items))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_list_shapes() {
        let bare: Vec<i64> = decode_list(serde_json::json!([1, 2])).unwrap();
        assert_eq!(bare, vec![1, 2]);

        let paged: Vec<i64> =
            decode_list(serde_json::json!({"count": 3, "next": null, "results": [1, "x", 3]})).unwrap();
        assert_eq!(paged, vec![1, 3]);

        assert!(decode_list::<i64>(serde_json::json!({"detail": "nope"})).is_none());
        assert!(decode_list::<i64>(serde_json::json!("text")).is_none());
    }
}
