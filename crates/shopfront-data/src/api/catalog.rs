//! Catalog reads.

use shopfront_commerce::catalog::{BestSelling, Category, Hot, Product};
use shopfront_commerce::homepage::HomepageData;
use shopfront_commerce::ProductId;

use super::StorefrontApi;
use crate::endpoint::Endpoint;
use crate::FetchError;

impl StorefrontApi {
    /// `GET /api/products/`, optionally filtered by search text and category slug.
    pub async fn list_products(
        &self,
        search: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<Product>, FetchError> {
        self.get_list(
            Endpoint::Products,
            "/api/products/",
            &[("search", search), ("category", category)],
        )
        .await
    }

    /// `GET /api/products/{id}/`.
    pub async fn product(&self, id: ProductId) -> Result<Product, FetchError> {
        self.client
            .get_json(Endpoint::Products, &format!("/api/products/{}/", id), &[])
            .await
    }

    /// `GET /api/categories/tree/`: top-level categories with their children.
    pub async fn category_tree(&self) -> Result<Vec<Category>, FetchError> {
        self.get_list(Endpoint::Categories, "/api/categories/tree/", &[]).await
    }

    /// `GET /api/categories/{slug}/`.
    pub async fn category(&self, slug: &str) -> Result<Category, FetchError> {
        let path = format!("/api/categories/{}/", urlencoding::encode(slug));
        self.client.get_json(Endpoint::Categories, &path, &[]).await
    }

    /// `GET /api/best-selling/`.
    pub async fn best_selling(&self) -> Result<Vec<BestSelling>, FetchError> {
        self.get_list(Endpoint::BestSelling, "/api/best-selling/", &[]).await
    }

    /// `GET /api/hot/`.
    pub async fn hot(&self) -> Result<Vec<Hot>, FetchError> {
        self.get_list(Endpoint::Hot, "/api/hot/", &[]).await
    }

    /// `GET /api/homepage/`: products, best sellers and hot picks in one payload.
    pub async fn homepage(&self) -> Result<HomepageData, FetchError> {
        self.client.get_json(Endpoint::Homepage, "/api/homepage/", &[]).await
    }
}
