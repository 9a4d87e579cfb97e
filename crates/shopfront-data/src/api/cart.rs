//! Session cart calls. These carry the visitor's cookie and are never cached.

use shopfront_commerce::cart::{AddToCart, Cart, UpdateCartItem};
use shopfront_commerce::CartItemId;

use super::StorefrontApi;
use crate::endpoint::Endpoint;
use crate::request::Method;
use crate::FetchError;

impl StorefrontApi {
    /// `GET /api/cart/`.
    pub async fn cart(&self) -> Result<Cart, FetchError> {
        self.client.get_json(Endpoint::Cart, "/api/cart/", &[]).await
    }

    /// `POST /api/cart/add/`.
    pub async fn add_to_cart(&self, item: &AddToCart) -> Result<Cart, FetchError> {
        self.client
            .send_json(Endpoint::Cart, Method::POST, "/api/cart/add/", item)
            .await
    }

    /// `PUT /api/cart/items/{id}/`.
    pub async fn update_cart_item(
        &self,
        item_id: CartItemId,
        update: &UpdateCartItem,
    ) -> Result<Cart, FetchError> {
        let path = format!("/api/cart/items/{}/", item_id);
        self.client
            .send_json(Endpoint::Cart, Method::PUT, &path, update)
            .await
    }

    /// `DELETE /api/cart/items/{id}/remove/`.
    pub async fn remove_cart_item(&self, item_id: CartItemId) -> Result<Cart, FetchError> {
        let path = format!("/api/cart/items/{}/remove/", item_id);
        let request = self.client.request(Method::DELETE, &path).build();
        self.client.send(Endpoint::Cart, request).await?.json()
    }

    /// `DELETE /api/cart/`.
    pub async fn clear_cart(&self) -> Result<(), FetchError> {
        self.client
            .send_empty(Endpoint::Cart, Method::DELETE, "/api/cart/")
            .await
    }
}
