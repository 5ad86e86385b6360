mod inmemory;
mod postgres;

use chrono::{DateTime, Duration, Utc};
pub use inmemory::InMemoryScheduledNotificationRepo;
pub use postgres::PostgresScheduledNotificationRepo;
use vital_domain::{ScheduledNotification, ID};

/// Upper bound on notifications claimed per scan, to bound the work done in
/// one scheduler tick.
pub const SCHEDULED_NOTIFICATION_BATCH_LIMIT: i64 = 50;

/// How long a claim holds. A claimed notification is invisible to other
/// scans until the lease expires; expiry is the crash-recovery path and can
/// produce at-least-once delivery.
pub(crate) fn claim_lease() -> Duration {
    Duration::minutes(5)
}

#[async_trait::async_trait]
pub trait IScheduledNotificationRepo: Send + Sync {
    async fn insert(&self, notification: &ScheduledNotification) -> anyhow::Result<()>;
    async fn find(&self, notification_id: &ID) -> Option<ScheduledNotification>;
    /// Atomically claims up to `limit` due, unsent, unclaimed notifications
    /// so that a concurrent scan cannot pick them up again.
    async fn claim_due(
        &self,
        now: DateTime<Utc>,
        limit: i64,
    ) -> anyhow::Result<Vec<ScheduledNotification>>;
    /// The reconciler write: flips `enviada` to true and records the
    /// completion timestamp plus an optional error annotation.
    async fn mark_sent(
        &self,
        notification_id: &ID,
        sent_at: DateTime<Utc>,
        erro: Option<String>,
    ) -> anyhow::Result<()>;
    async fn count_by_enviada(&self, enviada: bool) -> anyhow::Result<i64>;
}
