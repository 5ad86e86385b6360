use super::IPushSubscriptionRepo;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;
use vital_domain::PushSubscription;

pub struct PostgresPushSubscriptionRepo {
    pool: PgPool,
}

impl PostgresPushSubscriptionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PushSubscriptionRaw {
    id: Uuid,
    endpoint: String,
    p256dh: String,
    auth: String,
    user_id: Option<String>,
    hospital_id: Option<String>,
    device_info: Option<Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PushSubscriptionRaw> for PushSubscription {
    fn from(e: PushSubscriptionRaw) -> Self {
        Self {
            id: e.id.into(),
            endpoint: e.endpoint,
            p256dh: e.p256dh,
            auth: e.auth,
            user_id: e.user_id,
            hospital_id: e.hospital_id,
            device_info: e.device_info,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

#[async_trait::async_trait]
impl IPushSubscriptionRepo for PostgresPushSubscriptionRepo {
    async fn upsert(&self, subscription: &PushSubscription) -> anyhow::Result<PushSubscription> {
        let stored: PushSubscriptionRaw = sqlx::query_as(
            r#"
            INSERT INTO push_subscriptions
            (id, endpoint, p256dh, auth, user_id, hospital_id, device_info, created_at, updated_at)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (endpoint) DO UPDATE
            SET p256dh = EXCLUDED.p256dh,
                auth = EXCLUDED.auth,
                user_id = EXCLUDED.user_id,
                hospital_id = EXCLUDED.hospital_id,
                device_info = EXCLUDED.device_info,
                updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
        )
        .bind(subscription.id.inner_ref())
        .bind(&subscription.endpoint)
        .bind(&subscription.p256dh)
        .bind(&subscription.auth)
        .bind(&subscription.user_id)
        .bind(&subscription.hospital_id)
        .bind(&subscription.device_info)
        .bind(subscription.created_at)
        .bind(subscription.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to upsert push subscription: {:?}. DB returned error: {:?}",
                subscription, e
            );
            e
        })?;

        Ok(stored.into())
    }

    async fn find_by_hospital(&self, hospital_id: &str) -> anyhow::Result<Vec<PushSubscription>> {
        let subscriptions: Vec<PushSubscriptionRaw> = sqlx::query_as(
            r#"
            SELECT * FROM push_subscriptions
            WHERE hospital_id = $1
            "#,
        )
        .bind(hospital_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find push subscriptions for hospital: {:?} failed. DB returned error: {:?}",
                hospital_id, e
            );
            e
        })?;

        Ok(subscriptions.into_iter().map(|s| s.into()).collect())
    }

    async fn find_recent(&self, limit: i64) -> anyhow::Result<Vec<PushSubscription>> {
        let subscriptions: Vec<PushSubscriptionRaw> = sqlx::query_as(
            r#"
            SELECT * FROM push_subscriptions
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find recent push subscriptions failed. DB returned error: {:?}",
                e
            );
            e
        })?;

        Ok(subscriptions.into_iter().map(|s| s.into()).collect())
    }

    async fn delete_by_endpoint(&self, endpoint: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            DELETE FROM push_subscriptions
            WHERE endpoint = $1
            "#,
        )
        .bind(endpoint)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Delete push subscription with endpoint: {:?} failed. DB returned error: {:?}",
                endpoint, e
            );
            e
        })?;
        Ok(())
    }
}
