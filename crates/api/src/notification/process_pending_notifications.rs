use super::dispatch::dispatch_notification;
use crate::error::VitalError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use tracing::{error, info, warn};
use vital_api_structs::process_pending_notifications::APIResponse;
use vital_domain::{NotificationPayload, NotificationSource};
use vital_infra::{VitalContext, SCHEDULED_NOTIFICATION_BATCH_LIMIT};

pub async fn process_pending_notifications_controller(
    ctx: web::Data<VitalContext>,
) -> Result<HttpResponse, VitalError> {
    let usecase = ProcessPendingNotificationsUseCase::default();

    execute(usecase, &ctx)
        .await
        .map(|summary| {
            HttpResponse::Ok().json(APIResponse {
                success: true,
                processadas: summary.processadas,
                erros: summary.erros,
            })
        })
        .map_err(VitalError::from)
}

/// One tick of the re-evaluation pipeline: claim due reminders, resolve each
/// reminder's tenant devices, dispatch, and reconcile. Runs from the
/// scheduler and from the manual trigger route.
#[derive(Debug, Default)]
pub struct ProcessPendingNotificationsUseCase;

#[derive(Debug, Default, PartialEq)]
pub struct ProcessSummary {
    /// Reminders for which at least one device accepted the delivery
    pub processadas: usize,
    /// Reminder-level failures (store reads/writes), not per-device ones
    pub erros: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for VitalError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ProcessPendingNotificationsUseCase {
    type Response = ProcessSummary;

    type Error = UseCaseError;

    const NAME: &'static str = "ProcessPendingNotifications";

    async fn execute(&mut self, ctx: &VitalContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.now();
        let due = ctx
            .repos
            .scheduled_notifications
            .claim_due(now, SCHEDULED_NOTIFICATION_BATCH_LIMIT)
            .await
            .map_err(|e| {
                error!("Unable to claim due scheduled notifications: {:?}", e);
                UseCaseError::StorageError
            })?;

        let mut summary = ProcessSummary::default();
        if due.is_empty() {
            return Ok(summary);
        }
        info!("{} scheduled notifications to process", due.len());

        for notification in due {
            let hospital_id = match &notification.hospital_id {
                Some(hospital_id) => hospital_id.clone(),
                None => {
                    // Terminal for this reminder: without a tenant there is
                    // nobody to resolve, now or on any retry.
                    warn!(
                        "Scheduled notification {} has no hospital_id",
                        notification.id
                    );
                    if let Err(e) = ctx
                        .repos
                        .scheduled_notifications
                        .mark_sent(&notification.id, ctx.sys.now(), Some("Sem hospital_id".into()))
                        .await
                    {
                        error!(
                            "Unable to mark notification {} as sent: {:?}",
                            notification.id, e
                        );
                        summary.erros += 1;
                    }
                    continue;
                }
            };

            let recipients = match ctx
                .repos
                .push_subscriptions
                .find_by_hospital(&hospital_id)
                .await
            {
                Ok(recipients) => recipients,
                Err(e) => {
                    // Leave the reminder unsent; the claim lease will expire
                    // and a later scan retries it.
                    error!(
                        "Unable to fetch subscriptions for hospital {}: {:?}",
                        hospital_id, e
                    );
                    summary.erros += 1;
                    continue;
                }
            };

            let payload =
                NotificationPayload::from_source(NotificationSource::Reavaliacao(&notification));
            let dispatched = dispatch_notification(&payload, &recipients, ctx).await;
            if dispatched.sent > 0 {
                summary.processadas += 1;
            }

            // Processed means the pipeline ran for this reminder, not that a
            // device received it: zero recipients still reconciles.
            if let Err(e) = ctx
                .repos
                .scheduled_notifications
                .mark_sent(&notification.id, ctx.sys.now(), None)
                .await
            {
                error!(
                    "Unable to mark notification {} as sent: {:?}",
                    notification.id, e
                );
                summary.erros += 1;
            }
        }

        info!(
            "Notification run finished: {} delivered, {} errors",
            summary.processadas, summary.erros
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{
        due_notification, setup_ctx, setup_ctx_without_push, subscription, StaticSys,
        StubPushClient,
    };
    use std::sync::Arc;

    #[actix_web::main]
    #[test]
    async fn the_reconciler_records_the_completion_timestamp() {
        let (mut ctx, _client) = setup_ctx(StubPushClient::new());
        let frozen_now = chrono::Utc::now();
        ctx.sys = Arc::new(StaticSys(frozen_now));

        let notification = due_notification(Some("h1"));
        ctx.repos
            .scheduled_notifications
            .insert(&notification)
            .await
            .unwrap();

        execute(ProcessPendingNotificationsUseCase::default(), &ctx)
            .await
            .unwrap();

        let stored = ctx
            .repos
            .scheduled_notifications
            .find(&notification.id)
            .await
            .unwrap();
        assert_eq!(stored.data_envio, Some(frozen_now));
    }

    #[actix_web::main]
    #[test]
    async fn a_reminder_without_a_tenant_is_closed_without_any_delivery() {
        let (ctx, client) = setup_ctx(StubPushClient::new());
        let notification = due_notification(None);
        ctx.repos
            .scheduled_notifications
            .insert(&notification)
            .await
            .unwrap();

        let summary = execute(ProcessPendingNotificationsUseCase::default(), &ctx)
            .await
            .unwrap();

        assert_eq!(summary, ProcessSummary { processadas: 0, erros: 0 });
        assert!(client.attempted().is_empty());

        let stored = ctx
            .repos
            .scheduled_notifications
            .find(&notification.id)
            .await
            .unwrap();
        assert!(stored.enviada);
        assert_eq!(stored.erro, Some("Sem hospital_id".into()));
    }

    #[actix_web::main]
    #[test]
    async fn it_fans_out_to_the_reminder_tenant_only_and_cleans_gone_endpoints() {
        let (ctx, client) = setup_ctx(StubPushClient::new().with_gone_endpoint("https://push/h1-gone"));

        let notification = due_notification(Some("h1"));
        ctx.repos
            .scheduled_notifications
            .insert(&notification)
            .await
            .unwrap();

        for sub in vec![
            subscription("h1", "https://push/h1-ok"),
            subscription("h1", "https://push/h1-gone"),
            subscription("h2", "https://push/h2-untouched"),
        ] {
            ctx.repos.push_subscriptions.upsert(&sub).await.unwrap();
        }

        let summary = execute(ProcessPendingNotificationsUseCase::default(), &ctx)
            .await
            .unwrap();

        assert_eq!(summary, ProcessSummary { processadas: 1, erros: 0 });

        // Only the reminder tenant's devices were contacted.
        let attempted = client.attempted();
        assert_eq!(attempted.len(), 2);
        assert!(!attempted.contains(&"https://push/h2-untouched".to_string()));
        assert_eq!(client.delivered(), vec!["https://push/h1-ok".to_string()]);

        // The gone endpoint was removed, the other tenant left alone.
        assert!(ctx
            .repos
            .push_subscriptions
            .find_by_hospital("h1")
            .await
            .unwrap()
            .iter()
            .all(|s| s.endpoint != "https://push/h1-gone"));
        assert_eq!(
            ctx.repos
                .push_subscriptions
                .find_by_hospital("h2")
                .await
                .unwrap()
                .len(),
            1
        );

        let stored = ctx
            .repos
            .scheduled_notifications
            .find(&notification.id)
            .await
            .unwrap();
        assert!(stored.enviada);
        assert!(stored.erro.is_none());
    }

    #[actix_web::main]
    #[test]
    async fn a_reminder_with_no_recipients_is_still_reconciled() {
        let (ctx, client) = setup_ctx(StubPushClient::new());
        let notification = due_notification(Some("h1"));
        ctx.repos
            .scheduled_notifications
            .insert(&notification)
            .await
            .unwrap();

        let summary = execute(ProcessPendingNotificationsUseCase::default(), &ctx)
            .await
            .unwrap();

        assert_eq!(summary, ProcessSummary { processadas: 0, erros: 0 });
        assert!(client.attempted().is_empty());
        assert!(ctx
            .repos
            .scheduled_notifications
            .find(&notification.id)
            .await
            .unwrap()
            .enviada);
    }

    #[actix_web::main]
    #[test]
    async fn a_processed_reminder_is_not_processed_again() {
        let (ctx, client) = setup_ctx(StubPushClient::new());
        let notification = due_notification(Some("h1"));
        ctx.repos
            .scheduled_notifications
            .insert(&notification)
            .await
            .unwrap();
        ctx.repos
            .push_subscriptions
            .upsert(&subscription("h1", "https://push/h1"))
            .await
            .unwrap();

        execute(ProcessPendingNotificationsUseCase::default(), &ctx)
            .await
            .unwrap();
        let summary = execute(ProcessPendingNotificationsUseCase::default(), &ctx)
            .await
            .unwrap();

        assert_eq!(summary, ProcessSummary::default());
        assert_eq!(client.attempted().len(), 1);
    }

    #[actix_web::main]
    #[test]
    async fn without_push_configured_reminders_are_reconciled_without_deliveries() {
        let ctx = setup_ctx_without_push();
        let notification = due_notification(Some("h1"));
        ctx.repos
            .scheduled_notifications
            .insert(&notification)
            .await
            .unwrap();
        ctx.repos
            .push_subscriptions
            .upsert(&subscription("h1", "https://push/h1"))
            .await
            .unwrap();

        let summary = execute(ProcessPendingNotificationsUseCase::default(), &ctx)
            .await
            .unwrap();

        assert_eq!(summary, ProcessSummary { processadas: 0, erros: 0 });
        assert!(ctx
            .repos
            .scheduled_notifications
            .find(&notification.id)
            .await
            .unwrap()
            .enviada);
    }
}
