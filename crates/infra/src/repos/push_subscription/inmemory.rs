use super::IPushSubscriptionRepo;
use std::sync::Mutex;
use vital_domain::PushSubscription;

pub struct InMemoryPushSubscriptionRepo {
    subscriptions: Mutex<Vec<PushSubscription>>,
}

impl InMemoryPushSubscriptionRepo {
    pub fn new() -> Self {
        Self {
            subscriptions: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IPushSubscriptionRepo for InMemoryPushSubscriptionRepo {
    async fn upsert(&self, subscription: &PushSubscription) -> anyhow::Result<PushSubscription> {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        subscriptions.retain(|s| s.endpoint != subscription.endpoint);
        subscriptions.push(subscription.clone());
        Ok(subscription.clone())
    }

    async fn find_by_hospital(&self, hospital_id: &str) -> anyhow::Result<Vec<PushSubscription>> {
        let subscriptions = self.subscriptions.lock().unwrap();
        Ok(subscriptions
            .iter()
            .filter(|s| s.hospital_id.as_deref() == Some(hospital_id))
            .cloned()
            .collect())
    }

    async fn find_recent(&self, limit: i64) -> anyhow::Result<Vec<PushSubscription>> {
        let subscriptions = self.subscriptions.lock().unwrap();
        let mut recent: Vec<_> = subscriptions.iter().cloned().collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(limit as usize);
        Ok(recent)
    }

    async fn delete_by_endpoint(&self, endpoint: &str) -> anyhow::Result<()> {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        subscriptions.retain(|s| s.endpoint != endpoint);
        Ok(())
    }
}
