//! Site-wide content. Decorations fail soft.

use serde_json::Value;
use shopfront_commerce::site::{Notification, SiteSettings, TrackingCode};

use super::{decode_list, StorefrontApi};
use crate::endpoint::Endpoint;
use crate::FetchError;

impl StorefrontApi {
    /// `GET /api/notifications/active/`.
    ///
    /// `None` when nothing is active or the call fails for any reason.
    pub async fn active_notification(&self) -> Option<Notification> {
        let body: Value = match self
            .client
            .get_json(Endpoint::Notifications, "/api/notifications/active/", &[])
            .await
        {
            Ok(body) => body,
            Err(error) => {
                tracing::warn!(%error, "notification unavailable");
                return None;
            }
        };

        if body.is_null() {
            return None;
        }
        match serde_json::from_value::<Notification>(body) {
            Ok(notification) => notification.into_active(),
            Err(error) => {
                tracing::warn!(%error, "malformed notification");
                None
            }
        }
    }

    /// `GET /api/tracking-codes/active/`. Empty when the call fails.
    pub async fn active_tracking_codes(&self) -> Vec<TrackingCode> {
        match self
            .client
            .get_json::<Value>(Endpoint::TrackingCodes, "/api/tracking-codes/active/", &[])
            .await
        {
            Ok(body) => decode_list(body).unwrap_or_default(),
            Err(error) => {
                tracing::warn!(%error, "tracking codes unavailable");
                Vec::new()
            }
        }
    }

    /// `GET /api/site-settings/`.
    pub async fn site_settings(&self) -> Result<SiteSettings, FetchError> {
        self.client
            .get_json(Endpoint::SiteSettings, "/api/site-settings/", &[])
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::client::ApiClient;
    use crate::transport::InMemoryTransport;

    const NOTIFICATION: &str = "http://api.test/api/notifications/active/";
    const TRACKING: &str = "http://api.test/api/tracking-codes/active/";

    fn api(transport: &Arc<InMemoryTransport>) -> StorefrontApi {
        StorefrontApi::new(ApiClient::new("http://api.test", transport.clone()))
    }

    #[tokio::test]
    async fn test_active_notification() {
        let transport = Arc::new(InMemoryTransport::new());
        transport.get_json(NOTIFICATION, r#"{"id":1,"message":"Eid sale","is_active":true}"#);
        let n = api(&transport).active_notification().await.unwrap();
        assert_eq!(n.message, "Eid sale");
    }

    #[tokio::test]
    async fn test_inactive_or_failing_notification_is_none() {
        let transport = Arc::new(InMemoryTransport::new());
        transport.get_json(NOTIFICATION, r#"{"id":1,"message":"old","is_active":false}"#);
        assert!(api(&transport).active_notification().await.is_none());

        let failing = Arc::new(InMemoryTransport::new());
        failing.get_status(NOTIFICATION, 500);
        assert!(api(&failing).active_notification().await.is_none());

        let empty = Arc::new(InMemoryTransport::new());
        empty.get_json(NOTIFICATION, "null");
        assert!(api(&empty).active_notification().await.is_none());
    }

    #[tokio::test]
    async fn test_tracking_codes_fail_soft() {
        let transport = Arc::new(InMemoryTransport::new());
        transport.get_json(TRACKING, r#"[{"id":1,"name":"Meta","code":"","pixel_id":"987"}]"#);
        let codes = api(&transport).active_tracking_codes().await;
        assert_eq!(codes[0].pixel_id.as_deref(), Some("987"));

        let failing = Arc::new(InMemoryTransport::new());
        failing.get_status(TRACKING, 502);
        assert!(api(&failing).active_tracking_codes().await.is_empty());
    }

    #[tokio::test]
    async fn test_site_settings_error_propagates() {
        let transport = Arc::new(InMemoryTransport::new());
        let err = api(&transport).site_settings().await.unwrap_err();
        assert!(err.is_not_found());
    }
}
