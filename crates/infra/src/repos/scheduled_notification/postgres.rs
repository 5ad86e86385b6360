use super::{claim_lease, IScheduledNotificationRepo};
use chrono::{DateTime, Utc};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;
use vital_domain::{ScheduledNotification, ID};

pub struct PostgresScheduledNotificationRepo {
    pool: PgPool,
}

impl PostgresScheduledNotificationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ScheduledNotificationRaw {
    id: Uuid,
    solicitacao_id: Uuid,
    hospital_id: Option<String>,
    data_agendada: DateTime<Utc>,
    enviada: bool,
    titulo: Option<String>,
    mensagem: Option<String>,
    erro: Option<String>,
    data_envio: Option<DateTime<Utc>>,
}

impl From<ScheduledNotificationRaw> for ScheduledNotification {
    fn from(e: ScheduledNotificationRaw) -> Self {
        Self {
            id: e.id.into(),
            solicitacao_id: e.solicitacao_id.into(),
            hospital_id: e.hospital_id,
            data_agendada: e.data_agendada,
            enviada: e.enviada,
            titulo: e.titulo,
            mensagem: e.mensagem,
            erro: e.erro,
            data_envio: e.data_envio,
        }
    }
}

#[async_trait::async_trait]
impl IScheduledNotificationRepo for PostgresScheduledNotificationRepo {
    async fn insert(&self, notification: &ScheduledNotification) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO notificacoes_agendadas
            (id, solicitacao_id, hospital_id, data_agendada, enviada, titulo, mensagem, erro, data_envio)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(notification.id.inner_ref())
        .bind(notification.solicitacao_id.inner_ref())
        .bind(&notification.hospital_id)
        .bind(notification.data_agendada)
        .bind(notification.enviada)
        .bind(&notification.titulo)
        .bind(&notification.mensagem)
        .bind(&notification.erro)
        .bind(notification.data_envio)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert scheduled notification: {:?}. DB returned error: {:?}",
                notification, e
            );
            e
        })?;
        Ok(())
    }

    async fn find(&self, notification_id: &ID) -> Option<ScheduledNotification> {
        let res: Option<ScheduledNotificationRaw> = sqlx::query_as(
            r#"
            SELECT * FROM notificacoes_agendadas
            WHERE id = $1
            "#,
        )
        .bind(notification_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find scheduled notification with id: {:?} failed. DB returned error: {:?}",
                notification_id, e
            );
            e
        })
        .ok()?;
        res.map(|notification| notification.into())
    }

    async fn claim_due(
        &self,
        now: DateTime<Utc>,
        limit: i64,
    ) -> anyhow::Result<Vec<ScheduledNotification>> {
        let lease_cutoff = now - claim_lease();
        let claimed: Vec<ScheduledNotificationRaw> = sqlx::query_as(
            r#"
            UPDATE notificacoes_agendadas
            SET claimed_at = $1
            WHERE id IN (
                SELECT id FROM notificacoes_agendadas
                WHERE data_agendada <= $1
                    AND enviada = FALSE
                    AND (claimed_at IS NULL OR claimed_at <= $2)
                ORDER BY data_agendada
                LIMIT $3
                FOR UPDATE SKIP LOCKED
            )
            RETURNING *
            "#,
        )
        .bind(now)
        .bind(lease_cutoff)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to claim due scheduled notifications. DB returned error: {:?}",
                e
            );
            e
        })?;

        Ok(claimed.into_iter().map(|n| n.into()).collect())
    }

    async fn mark_sent(
        &self,
        notification_id: &ID,
        sent_at: DateTime<Utc>,
        erro: Option<String>,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE notificacoes_agendadas
            SET enviada = TRUE,
                data_envio = $2,
                erro = $3
            WHERE id = $1
            "#,
        )
        .bind(notification_id.inner_ref())
        .bind(sent_at)
        .bind(erro)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to mark scheduled notification {:?} as sent. DB returned error: {:?}",
                notification_id, e
            );
            e
        })?;
        Ok(())
    }

    async fn count_by_enviada(&self, enviada: bool) -> anyhow::Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM notificacoes_agendadas
            WHERE enviada = $1
            "#,
        )
        .bind(enviada)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to count scheduled notifications. DB returned error: {:?}",
                e
            );
            e
        })?;
        Ok(count)
    }
}
