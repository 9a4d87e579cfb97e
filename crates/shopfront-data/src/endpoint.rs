//! Endpoint tagging for backend calls.

use std::time::Duration;

/// Backend endpoints the storefront talks to.
///
/// Each tag carries a default timeout, retry count and cacheability. Tags
/// also name the dependency in logs and `Server-Timing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `GET /api/homepage/`: products plus curated lists in one payload.
    Homepage,
    /// `GET /api/products/` and `/api/products/{id}/`.
    Products,
    /// `GET /api/categories/tree/` and `/api/categories/{slug}/`.
    Categories,
    BestSelling,
    Hot,
    SiteSettings,
    Notifications,
    TrackingCodes,
    /// Session cart reads and mutations.
    Cart,
    /// Order creation.
    Orders,
}

impl Endpoint {
    /// Get the default total timeout for this endpoint.
    pub fn default_timeout(&self) -> Duration {
        match self {
            Self::Homepage | Self::Products => Duration::from_millis(5000),
            Self::Categories | Self::BestSelling | Self::Hot => Duration::from_millis(3000),
            Self::SiteSettings => Duration::from_millis(2000),
            // Decorations; the page renders without them
            Self::Notifications | Self::TrackingCodes => Duration::from_millis(1500),
            Self::Cart => Duration::from_millis(5000),
            Self::Orders => Duration::from_millis(10_000),
        }
    }

    /// Get the default max retries for GET requests to this endpoint.
    pub fn default_max_retries(&self) -> u32 {
        match self {
            Self::Homepage | Self::Products | Self::Categories => 1,
            Self::Orders | Self::Notifications | Self::TrackingCodes => 0,
            _ => 1,
        }
    }

    /// Whether successful GET responses may be served from the revalidation cache.
    pub fn is_cacheable(&self) -> bool {
        !matches!(self, Self::Cart | Self::Orders)
    }

    /// Whether a failure of this endpoint turns the page into its error state.
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::Homepage | Self::Products)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Homepage => "homepage",
            Self::Products => "products",
            Self::Categories => "categories",
            Self::BestSelling => "best-selling",
            Self::Hot => "hot",
            Self::SiteSettings => "site-settings",
            Self::Notifications => "notifications",
            Self::TrackingCodes => "tracking-codes",
            Self::Cart => "cart",
            Self::Orders => "orders",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
