mod inmemory;
mod postgres;

pub use inmemory::InMemoryPushSubscriptionRepo;
pub use postgres::PostgresPushSubscriptionRepo;
use vital_domain::PushSubscription;

#[async_trait::async_trait]
pub trait IPushSubscriptionRepo: Send + Sync {
    /// Inserts the subscription, replacing any previous registration for the
    /// same endpoint. Returns the stored row.
    async fn upsert(&self, subscription: &PushSubscription) -> anyhow::Result<PushSubscription>;
    /// All subscriptions registered for exactly this hospital. Never falls
    /// back to other tenants.
    async fn find_by_hospital(&self, hospital_id: &str) -> anyhow::Result<Vec<PushSubscription>>;
    async fn find_recent(&self, limit: i64) -> anyhow::Result<Vec<PushSubscription>>;
    async fn delete_by_endpoint(&self, endpoint: &str) -> anyhow::Result<()>;
}
