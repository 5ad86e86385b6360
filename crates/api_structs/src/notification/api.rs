use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod process_pending_notifications {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct APIResponse {
        pub success: bool,
        pub processadas: usize,
        pub erros: usize,
    }
}

pub mod get_notification_status {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct APIResponse {
        pub success: bool,
        pub pendentes: i64,
        pub enviadas: i64,
        pub webpush_disponivel: bool,
        pub timestamp: DateTime<Utc>,
    }
}

pub mod get_job_status {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct APIResponse {
        pub job_running: bool,
        pub store_connected: bool,
    }
}
