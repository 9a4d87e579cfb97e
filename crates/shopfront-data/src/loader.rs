//! Server-side loaders that never fail.
//!
//! Pages render with whatever arrived: a failed homepage payload becomes
//! `None` (the derivation turns that into its error state), a failed tree
//! becomes `[]` and failed settings become `None`.

use shopfront_commerce::catalog::Category;
use shopfront_commerce::homepage::HomepageData;
use shopfront_commerce::site::SiteSettings;

use crate::api::StorefrontApi;

/// Homepage payload, or `None` when it could not be fetched or decoded.
pub async fn fetch_homepage_data(api: &StorefrontApi) -> Option<HomepageData> {
    match api.homepage().await {
        Ok(data) => Some(data),
        Err(error) => {
            tracing::warn!(%error, "homepage payload unavailable");
            None
        }
    }
}

/// Category tree, or an empty list on failure.
pub async fn fetch_categories_tree(api: &StorefrontApi) -> Vec<Category> {
    match api.category_tree().await {
        Ok(tree) => tree,
        Err(error) => {
            tracing::warn!(%error, "category tree unavailable");
            Vec::new()
        }
    }
}

/// Site settings, or `None` on failure.
pub async fn fetch_site_settings(api: &StorefrontApi) -> Option<SiteSettings> {
    match api.site_settings().await {
        Ok(settings) => Some(settings),
        Err(error) => {
            tracing::warn!(%error, "site settings unavailable");
            None
        }
    }
}
