//! Site-wide content: the announcement bar, tracking pixels and hero image.

use crate::ids::{NotificationId, TrackingCodeId};
use crate::wire;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Marketing announcement shown above the header.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, deserialize_with = "wire::optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "wire::optional_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// Keep the notification only if it is active and says something.
    pub fn into_active(self) -> Option<Self> {
        (self.is_active && !self.message.trim().is_empty()).then_some(self)
    }
}

/// A third-party tracking snippet configured in the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackingCode {
    pub id: TrackingCodeId,
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "wire::string_or_empty")]
    pub code: String,
    #[serde(default, deserialize_with = "wire::optional_string")]
    pub pixel_id: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "wire::optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "wire::optional_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Global storefront settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteSettings {
    /// Hero banner image reference.
    #[serde(default, deserialize_with = "wire::optional_string")]
    pub hero_image: Option<String>,
    #[serde(default, deserialize_with = "wire::optional_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Facebook pixel id taken from the first active tracking code.
pub fn facebook_pixel_id(codes: &[TrackingCode]) -> Option<&str> {
    codes.first().and_then(|code| code.pixel_id.as_deref())
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(id: i64, pixel: Option<&str>) -> TrackingCode {
        TrackingCode {
            id: TrackingCodeId::new(id),
            name: "Meta".to_string(),
            code: String::new(),
            pixel_id: pixel.map(str::to_string),
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_pixel_from_first_code_only() {
        assert_eq!(facebook_pixel_id(&[code(1, Some("123")), code(2, Some("456"))]), Some("123"));
        assert_eq!(facebook_pixel_id(&[code(1, None), code(2, Some("456"))]), None);
        assert_eq!(facebook_pixel_id(&[]), None);
    }

    #[test]
    fn test_empty_pixel_string_is_absent() {
        let parsed: TrackingCode =
            serde_json::from_str(r#"{"id":1,"name":"Meta","code":"","pixel_id":""}"#).unwrap();
        assert!(parsed.pixel_id.is_none());
    }

    #[test]
    fn test_notification_active_filter() {
        let n: Notification = serde_json::from_str(
            r#"{"id":1,"message":"Free delivery over 3000৳","is_active":true}"#,
        )
        .unwrap();
        assert!(n.clone().into_active().is_some());

        let inactive = Notification { is_active: false, ..n };
        assert!(inactive.into_active().is_none());
    }

    #[test]
    fn test_site_settings_blank_hero() {
        let s: SiteSettings =
            serde_json::from_str(r#"{"hero_image":"","updated_at":"2024-06-01T00:00:00Z"}"#)
                .unwrap();
        assert!(s.hero_image.is_none());
        assert!(s.updated_at.is_some());
    }
}
