use super::{claim_lease, IScheduledNotificationRepo};
use chrono::{DateTime, Utc};
use std::sync::Mutex;
use vital_domain::{ScheduledNotification, ID};

struct StoredNotification {
    notification: ScheduledNotification,
    claimed_at: Option<DateTime<Utc>>,
}

pub struct InMemoryScheduledNotificationRepo {
    notifications: Mutex<Vec<StoredNotification>>,
}

impl InMemoryScheduledNotificationRepo {
    pub fn new() -> Self {
        Self {
            notifications: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IScheduledNotificationRepo for InMemoryScheduledNotificationRepo {
    async fn insert(&self, notification: &ScheduledNotification) -> anyhow::Result<()> {
        let mut notifications = self.notifications.lock().unwrap();
        notifications.push(StoredNotification {
            notification: notification.clone(),
            claimed_at: None,
        });
        Ok(())
    }

    async fn find(&self, notification_id: &ID) -> Option<ScheduledNotification> {
        let notifications = self.notifications.lock().unwrap();
        notifications
            .iter()
            .find(|stored| stored.notification.id == *notification_id)
            .map(|stored| stored.notification.clone())
    }

    async fn claim_due(
        &self,
        now: DateTime<Utc>,
        limit: i64,
    ) -> anyhow::Result<Vec<ScheduledNotification>> {
        let lease_cutoff = now - claim_lease();
        let mut notifications = self.notifications.lock().unwrap();
        let mut claimed = Vec::new();

        for stored in notifications.iter_mut() {
            if claimed.len() as i64 == limit {
                break;
            }
            let claimable = !stored.notification.enviada
                && stored.notification.data_agendada <= now
                && stored.claimed_at.map_or(true, |at| at <= lease_cutoff);
            if claimable {
                stored.claimed_at = Some(now);
                claimed.push(stored.notification.clone());
            }
        }

        Ok(claimed)
    }

    async fn mark_sent(
        &self,
        notification_id: &ID,
        sent_at: DateTime<Utc>,
        erro: Option<String>,
    ) -> anyhow::Result<()> {
        let mut notifications = self.notifications.lock().unwrap();
        for stored in notifications.iter_mut() {
            if stored.notification.id == *notification_id {
                stored.notification.enviada = true;
                stored.notification.data_envio = Some(sent_at);
                stored.notification.erro = erro.clone();
            }
        }
        Ok(())
    }

    async fn count_by_enviada(&self, enviada: bool) -> anyhow::Result<i64> {
        let notifications = self.notifications.lock().unwrap();
        Ok(notifications
            .iter()
            .filter(|stored| stored.notification.enviada == enviada)
            .count() as i64)
    }
}

#[cfg(test)]
mod test {
    use super::super::SCHEDULED_NOTIFICATION_BATCH_LIMIT;
    use super::*;
    use chrono::Duration;

    fn due_notification(now: DateTime<Utc>) -> ScheduledNotification {
        ScheduledNotification::new(ID::new(), Some("h1".into()), now - Duration::minutes(2))
    }

    #[tokio::test]
    async fn it_caps_one_scan_at_the_batch_limit() {
        let repo = InMemoryScheduledNotificationRepo::new();
        let now = Utc::now();
        for _ in 0..75 {
            repo.insert(&due_notification(now)).await.unwrap();
        }

        let claimed = repo
            .claim_due(now, SCHEDULED_NOTIFICATION_BATCH_LIMIT)
            .await
            .unwrap();
        assert_eq!(claimed.len(), 50);
    }

    #[tokio::test]
    async fn a_claimed_notification_is_not_claimed_again_within_the_lease() {
        let repo = InMemoryScheduledNotificationRepo::new();
        let now = Utc::now();
        repo.insert(&due_notification(now)).await.unwrap();

        let first = repo.claim_due(now, 50).await.unwrap();
        assert_eq!(first.len(), 1);

        let second = repo.claim_due(now, 50).await.unwrap();
        assert!(second.is_empty());

        // After the lease expires the claim is handed out again.
        let later = now + claim_lease() + Duration::seconds(1);
        let third = repo.claim_due(later, 50).await.unwrap();
        assert_eq!(third.len(), 1);
    }

    #[tokio::test]
    async fn a_sent_notification_is_never_scanned_again() {
        let repo = InMemoryScheduledNotificationRepo::new();
        let now = Utc::now();
        let notification = due_notification(now);
        repo.insert(&notification).await.unwrap();

        repo.mark_sent(&notification.id, now, None).await.unwrap();

        let later = now + claim_lease() + Duration::minutes(1);
        assert!(repo.claim_due(later, 50).await.unwrap().is_empty());

        let stored = repo.find(&notification.id).await.unwrap();
        assert!(stored.enviada);
        assert_eq!(stored.data_envio, Some(now));
    }

    #[tokio::test]
    async fn unsent_notifications_that_are_not_due_are_left_alone() {
        let repo = InMemoryScheduledNotificationRepo::new();
        let now = Utc::now();
        let future =
            ScheduledNotification::new(ID::new(), Some("h1".into()), now + Duration::minutes(10));
        repo.insert(&future).await.unwrap();

        assert!(repo.claim_due(now, 50).await.unwrap().is_empty());
        assert_eq!(repo.count_by_enviada(false).await.unwrap(), 1);
    }
}
