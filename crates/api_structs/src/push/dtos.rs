use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vital_domain::{PushSubscription, ID};

/// The browser's `PushSubscription.toJSON()` shape as sent by the client.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubscriptionDTO {
    pub endpoint: String,
    pub keys: SubscriptionKeysDTO,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubscriptionKeysDTO {
    pub p256dh: String,
    pub auth: String,
}

/// Admin listing view of a registration; key material is not exposed.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PushSubscriptionDTO {
    pub id: ID,
    pub endpoint: String,
    pub hospital_id: Option<String>,
    pub device: String,
    pub created_at: DateTime<Utc>,
}

impl PushSubscriptionDTO {
    pub fn new(subscription: &PushSubscription) -> Self {
        Self {
            id: subscription.id.clone(),
            endpoint: subscription.endpoint.clone(),
            hospital_id: subscription.hospital_id.clone(),
            device: subscription.device_label().into(),
            created_at: subscription.created_at,
        }
    }
}
