use crate::dtos::{PushSubscriptionDTO, SubscriptionDTO};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vital_domain::{Solicitacao, ID};

pub mod create_push_subscription {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct RequestBody {
        pub subscription: SubscriptionDTO,
        pub user_id: Option<String>,
        pub hospital_id: Option<String>,
        pub device_info: Option<serde_json::Value>,
    }

    #[derive(Debug, Deserialize, Serialize)]
    pub struct APIResponse {
        pub success: bool,
        pub id: ID,
    }
}

pub mod delete_push_subscription {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct RequestBody {
        pub endpoint: String,
    }

    #[derive(Debug, Deserialize, Serialize)]
    pub struct APIResponse {
        pub success: bool,
    }
}

pub mod send_push_notification {
    use super::*;

    /// The send route accepts both the database-webhook event shape and the
    /// manual shape. The webhook variant is tried first; the manual variant
    /// has only optional fields and would otherwise match everything.
    #[derive(Debug, Deserialize, Serialize)]
    #[serde(untagged)]
    pub enum RequestBody {
        Webhook(WebhookEvent),
        Manual(ManualPush),
    }

    /// Insert event emitted by the database when a new solicitação lands.
    #[derive(Debug, Deserialize, Serialize)]
    pub struct WebhookEvent {
        #[serde(rename = "type")]
        pub event_type: String,
        pub table: String,
        pub record: Solicitacao,
    }

    #[derive(Debug, Deserialize, Serialize)]
    pub struct ManualPush {
        pub hospital_id: Option<String>,
        pub title: Option<String>,
        pub body: Option<String>,
        pub urgency: Option<String>,
        pub data: Option<serde_json::Value>,
        /// Devices of this user are skipped, so the originator does not get
        /// notified about their own action.
        pub exclude_user_id: Option<String>,
    }

    #[derive(Debug, Deserialize, Serialize)]
    pub struct APIResponse {
        pub sent: usize,
        pub failed: usize,
        pub errors: Vec<String>,
    }
}

pub mod get_push_status {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct APIResponse {
        pub enabled: bool,
        pub vapid_configured: bool,
        pub public_key: Option<String>,
        pub timestamp: DateTime<Utc>,
    }
}

pub mod get_push_subscriptions {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct APIResponse {
        pub count: usize,
        pub subscriptions: Vec<PushSubscriptionDTO>,
    }
}
