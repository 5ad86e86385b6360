use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod get_service_health {
    use super::*;

    #[derive(Deserialize, Serialize)]
    pub struct APIResponse {
        pub status: String,
        pub service: String,
        pub timestamp: DateTime<Utc>,
    }
}
