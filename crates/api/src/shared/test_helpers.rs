use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use vital_domain::{NotificationPayload, PushSubscription, ScheduledNotification, ID};
use vital_infra::{IPushClient, ISys, PushDeliveryError, VitalContext};

/// Frozen clock for tests that assert on recorded timestamps.
pub struct StaticSys(pub DateTime<Utc>);

impl ISys for StaticSys {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Push client stub: records every attempted endpoint and fails the
/// configured ones.
pub struct StubPushClient {
    gone_endpoints: HashSet<String>,
    failing_endpoints: HashSet<String>,
    attempted: Mutex<Vec<String>>,
    delivered: Mutex<Vec<String>>,
}

impl StubPushClient {
    pub fn new() -> Self {
        Self {
            gone_endpoints: HashSet::new(),
            failing_endpoints: HashSet::new(),
            attempted: Mutex::new(Vec::new()),
            delivered: Mutex::new(Vec::new()),
        }
    }

    pub fn with_gone_endpoint(mut self, endpoint: &str) -> Self {
        self.gone_endpoints.insert(endpoint.into());
        self
    }

    pub fn with_failing_endpoint(mut self, endpoint: &str) -> Self {
        self.failing_endpoints.insert(endpoint.into());
        self
    }

    pub fn attempted(&self) -> Vec<String> {
        self.attempted.lock().unwrap().clone()
    }

    pub fn delivered(&self) -> Vec<String> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl IPushClient for StubPushClient {
    async fn send(
        &self,
        subscription: &PushSubscription,
        _payload: &NotificationPayload,
    ) -> Result<(), PushDeliveryError> {
        self.attempted
            .lock()
            .unwrap()
            .push(subscription.endpoint.clone());

        if self.gone_endpoints.contains(&subscription.endpoint) {
            return Err(PushDeliveryError::Gone);
        }
        if self.failing_endpoints.contains(&subscription.endpoint) {
            return Err(PushDeliveryError::Delivery("delivery timed out".into()));
        }

        self.delivered
            .lock()
            .unwrap()
            .push(subscription.endpoint.clone());
        Ok(())
    }
}

/// In-memory context with the given push stub installed. Returns the stub
/// handle alongside so assertions can inspect the attempts.
pub fn setup_ctx(client: StubPushClient) -> (VitalContext, Arc<StubPushClient>) {
    let client = Arc::new(client);
    let ctx = VitalContext::create_inmemory(Some(client.clone() as Arc<dyn IPushClient>));
    (ctx, client)
}

/// In-memory context without any push client (degraded mode).
pub fn setup_ctx_without_push() -> VitalContext {
    VitalContext::create_inmemory(None)
}

pub fn subscription(hospital_id: &str, endpoint: &str) -> PushSubscription {
    PushSubscription {
        id: ID::new(),
        endpoint: endpoint.into(),
        p256dh: "BLc4xRzKlKORKWlbdgFaBrrPK3ydWAHo4M0gs0i1oEKgPpWC5cW8OCzVrOQRv-1npXRWk8udnW3oYhIO4475rds".into(),
        auth: "super-secret-auth".into(),
        user_id: None,
        hospital_id: Some(hospital_id.into()),
        device_info: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn due_notification(hospital_id: Option<&str>) -> ScheduledNotification {
    ScheduledNotification::new(
        ID::new(),
        hospital_id.map(|h| h.into()),
        Utc::now() - Duration::minutes(2),
    )
}
