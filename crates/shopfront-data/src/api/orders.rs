//! Order creation. Orders are never retried.

use shopfront_commerce::checkout::{
    CreateMultiProductOrder, CreateOrder, CreateSingleProductOrder, Order, OrderPayload,
};

use super::StorefrontApi;
use crate::endpoint::Endpoint;
use crate::request::Method;
use crate::FetchError;

const CREATE_ORDER: &str = "/api/orders/create/";

impl StorefrontApi {
    /// `POST /api/orders/create/` with the minimal single-product body.
    pub async fn create_order(&self, order: &CreateOrder) -> Result<Order, FetchError> {
        self.client
            .send_json(Endpoint::Orders, Method::POST, CREATE_ORDER, order)
            .await
    }

    pub async fn create_single_product_order(
        &self,
        order: &CreateSingleProductOrder,
    ) -> Result<Order, FetchError> {
        self.client
            .send_json(Endpoint::Orders, Method::POST, CREATE_ORDER, order)
            .await
    }

    pub async fn create_multi_product_order(
        &self,
        order: &CreateMultiProductOrder,
    ) -> Result<Order, FetchError> {
        self.client
            .send_json(Endpoint::Orders, Method::POST, CREATE_ORDER, order)
            .await
    }

    /// Submit a body built by [`shopfront_commerce::checkout::OrderDraft`].
    pub async fn submit_order(&self, payload: &OrderPayload) -> Result<Order, FetchError> {
        match payload {
            OrderPayload::Single(order) => self.create_single_product_order(order).await,
            OrderPayload::Multi(order) => self.create_multi_product_order(order).await,
        }
    }
}
