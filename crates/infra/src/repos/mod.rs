mod push_subscription;
mod scheduled_notification;

pub use push_subscription::IPushSubscriptionRepo;
use push_subscription::{InMemoryPushSubscriptionRepo, PostgresPushSubscriptionRepo};
pub use scheduled_notification::{IScheduledNotificationRepo, SCHEDULED_NOTIFICATION_BATCH_LIMIT};
use scheduled_notification::{InMemoryScheduledNotificationRepo, PostgresScheduledNotificationRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub scheduled_notifications: Arc<dyn IScheduledNotificationRepo>,
    pub push_subscriptions: Arc<dyn IPushSubscriptionRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        Ok(Self {
            scheduled_notifications: Arc::new(PostgresScheduledNotificationRepo::new(pool.clone())),
            push_subscriptions: Arc::new(PostgresPushSubscriptionRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            scheduled_notifications: Arc::new(InMemoryScheduledNotificationRepo::new()),
            push_subscriptions: Arc::new(InMemoryPushSubscriptionRepo::new()),
        }
    }
}
