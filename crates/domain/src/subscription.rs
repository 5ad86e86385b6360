use crate::shared::entity::ID;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered Web Push endpoint for one device, together with the key
/// material needed to encrypt payloads for it.
///
/// `endpoint` is the natural key: registering the same endpoint again
/// replaces the previous row. Rows are deleted when the push service reports
/// the endpoint as permanently gone or when the owning client unregisters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushSubscription {
    pub id: ID,
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
    pub user_id: Option<String>,
    /// Tenant scope; subscriptions without one are never resolved
    pub hospital_id: Option<String>,
    pub device_info: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PushSubscription {
    /// Rough device family, derived from the push service host.
    pub fn device_label(&self) -> &'static str {
        if self.endpoint.contains("fcm.googleapis.com") {
            "Android/Chrome"
        } else if self.endpoint.contains("push.apple.com") {
            "iOS/Safari"
        } else if self.endpoint.contains("mozilla.com") {
            "Firefox"
        } else if self.endpoint.contains("windows.com") {
            "Windows/Edge"
        } else {
            "Outro"
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn subscription_with_endpoint(endpoint: &str) -> PushSubscription {
        PushSubscription {
            id: Default::default(),
            endpoint: endpoint.into(),
            p256dh: "p256dh".into(),
            auth: "auth".into(),
            user_id: None,
            hospital_id: None,
            device_info: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn it_classifies_devices_by_endpoint() {
        let cases = vec![
            ("https://fcm.googleapis.com/fcm/send/abc", "Android/Chrome"),
            ("https://web.push.apple.com/xyz", "iOS/Safari"),
            ("https://updates.push.services.mozilla.com/w/1", "Firefox"),
            ("https://wns2-par02p.notify.windows.com/w/1", "Windows/Edge"),
            ("https://push.example.com/1", "Outro"),
        ];
        for (endpoint, expected) in cases {
            assert_eq!(subscription_with_endpoint(endpoint).device_label(), expected);
        }
    }
}
