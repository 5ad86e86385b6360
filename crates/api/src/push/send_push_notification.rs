use crate::error::VitalError;
use crate::notification::{dispatch_notification, DispatchSummary};
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use tracing::{error, info};
use vital_api_structs::send_push_notification::{APIResponse, ManualPush, RequestBody};
use vital_domain::{
    NotificationPayload, NotificationSource, DEFAULT_BADGE, DEFAULT_ICON,
};
use vital_infra::VitalContext;

pub async fn send_push_notification_controller(
    ctx: web::Data<VitalContext>,
    body: web::Json<RequestBody>,
) -> Result<HttpResponse, VitalError> {
    let usecase = SendPushNotificationUseCase { request: body.0 };

    execute(usecase, &ctx)
        .await
        .map(|summary| {
            HttpResponse::Ok().json(APIResponse {
                sent: summary.sent,
                failed: summary.failed,
                errors: summary.errors,
            })
        })
        .map_err(VitalError::from)
}

/// Fan-out send for the two on-demand triggers: the database webhook firing
/// on a freshly inserted solicitação, and the manual shape used by
/// operators and the frontend.
#[derive(Debug)]
pub struct SendPushNotificationUseCase {
    pub request: RequestBody,
}

#[derive(Debug)]
pub enum UseCaseError {
    MissingHospitalId,
    PushUnavailable,
    StorageError,
}

impl From<UseCaseError> for VitalError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::MissingHospitalId => {
                Self::BadClientData("hospital_id é obrigatório".into())
            }
            UseCaseError::PushUnavailable => {
                Self::ServiceUnavailable("Web Push não configurado".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

fn manual_payload(manual: &ManualPush) -> NotificationPayload {
    let urgency = manual.urgency.as_deref().unwrap_or("normal");
    NotificationPayload {
        title: manual
            .title
            .clone()
            .unwrap_or_else(|| "VITAL - Nova Notificação".into()),
        body: manual
            .body
            .clone()
            .unwrap_or_else(|| "Você tem uma nova atualização".into()),
        icon: DEFAULT_ICON.into(),
        badge: DEFAULT_BADGE.into(),
        tag: if urgency == "high" { "urgent" } else { "normal" }.into(),
        data: manual
            .data
            .clone()
            .unwrap_or_else(|| serde_json::json!({})),
        require_interaction: urgency == "high",
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendPushNotificationUseCase {
    type Response = DispatchSummary;

    type Error = UseCaseError;

    const NAME: &'static str = "SendPushNotification";

    async fn execute(&mut self, ctx: &VitalContext) -> Result<Self::Response, Self::Error> {
        if ctx.push.is_none() {
            return Err(UseCaseError::PushUnavailable);
        }

        let (hospital_id, payload, exclude_user_id) = match &self.request {
            RequestBody::Webhook(event) => {
                info!(
                    "Database webhook received: {} on {}",
                    event.event_type, event.table
                );
                let hospital_id = event
                    .record
                    .hospital_id
                    .clone()
                    .ok_or(UseCaseError::MissingHospitalId)?;
                let payload = NotificationPayload::from_source(NotificationSource::NovaSolicitacao(
                    &event.record,
                ));
                (hospital_id, payload, None)
            }
            RequestBody::Manual(manual) => {
                let hospital_id = manual
                    .hospital_id
                    .clone()
                    .ok_or(UseCaseError::MissingHospitalId)?;
                (hospital_id, manual_payload(manual), manual.exclude_user_id.clone())
            }
        };

        let mut recipients = ctx
            .repos
            .push_subscriptions
            .find_by_hospital(&hospital_id)
            .await
            .map_err(|e| {
                error!(
                    "Unable to fetch subscriptions for hospital {}: {:?}",
                    hospital_id, e
                );
                UseCaseError::StorageError
            })?;
        if let Some(exclude_user_id) = &exclude_user_id {
            recipients.retain(|s| s.user_id.as_deref() != Some(exclude_user_id.as_str()));
        }

        Ok(dispatch_notification(&payload, &recipients, ctx).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{setup_ctx, setup_ctx_without_push, StubPushClient};
    use vital_api_structs::send_push_notification::WebhookEvent;
    use vital_domain::{Solicitacao, ID};

    fn webhook_request(hospital_id: Option<&str>, mews: Option<i32>) -> RequestBody {
        RequestBody::Webhook(WebhookEvent {
            event_type: "INSERT".into(),
            table: "solicitacoes".into(),
            record: Solicitacao {
                id: ID::new(),
                paciente: Some("João".into()),
                leito: Some("3A".into()),
                motivo: Some("Queda de saturação".into()),
                mews,
                hospital_id: hospital_id.map(|h| h.into()),
                status: Some("pendente".into()),
            },
        })
    }

    fn manual_request(hospital_id: Option<&str>, exclude_user_id: Option<&str>) -> RequestBody {
        RequestBody::Manual(ManualPush {
            hospital_id: hospital_id.map(|h| h.into()),
            title: None,
            body: None,
            urgency: Some("high".into()),
            data: None,
            exclude_user_id: exclude_user_id.map(|u| u.into()),
        })
    }

    #[actix_web::main]
    #[test]
    async fn the_webhook_notifies_only_the_record_tenant() {
        let (ctx, client) = setup_ctx(StubPushClient::new());
        let mut own = crate::shared::test_helpers::subscription("h1", "https://push/h1");
        own.user_id = Some("user-1".into());
        ctx.repos.push_subscriptions.upsert(&own).await.unwrap();
        ctx.repos
            .push_subscriptions
            .upsert(&crate::shared::test_helpers::subscription(
                "h2",
                "https://push/h2",
            ))
            .await
            .unwrap();

        let usecase = SendPushNotificationUseCase {
            request: webhook_request(Some("h1"), Some(8)),
        };
        let summary = execute(usecase, &ctx).await.unwrap();

        assert_eq!(summary.sent, 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(client.attempted(), vec!["https://push/h1".to_string()]);
    }

    #[actix_web::main]
    #[test]
    async fn a_webhook_record_without_a_tenant_is_rejected() {
        let (ctx, _client) = setup_ctx(StubPushClient::new());
        let usecase = SendPushNotificationUseCase {
            request: webhook_request(None, None),
        };
        let res = execute(usecase, &ctx).await;
        assert!(matches!(res, Err(UseCaseError::MissingHospitalId)));
    }

    #[actix_web::main]
    #[test]
    async fn without_push_configured_the_send_route_is_unavailable() {
        let ctx = setup_ctx_without_push();
        let usecase = SendPushNotificationUseCase {
            request: manual_request(Some("h1"), None),
        };
        let res = execute(usecase, &ctx).await;
        assert!(matches!(res, Err(UseCaseError::PushUnavailable)));
    }

    #[actix_web::main]
    #[test]
    async fn manual_sends_can_exclude_the_originating_user() {
        let (ctx, client) = setup_ctx(StubPushClient::new());
        let mut own = crate::shared::test_helpers::subscription("h1", "https://push/own");
        own.user_id = Some("user-1".into());
        let mut other = crate::shared::test_helpers::subscription("h1", "https://push/other");
        other.user_id = Some("user-2".into());
        ctx.repos.push_subscriptions.upsert(&own).await.unwrap();
        ctx.repos.push_subscriptions.upsert(&other).await.unwrap();

        let usecase = SendPushNotificationUseCase {
            request: manual_request(Some("h1"), Some("user-1")),
        };
        let summary = execute(usecase, &ctx).await.unwrap();

        assert_eq!(summary.sent, 1);
        assert_eq!(client.attempted(), vec!["https://push/other".to_string()]);
    }

    #[test]
    fn the_webhook_shape_is_parsed_before_the_manual_shape() {
        let body = serde_json::json!({
            "type": "INSERT",
            "table": "solicitacoes",
            "record": {
                "id": "6a1f4cd8-9f0f-4a8b-9a0e-0c2c63a9a1f4",
                "paciente": "Maria",
                "mews": 5,
                "hospital_id": "h1"
            }
        });
        let parsed: RequestBody = serde_json::from_value(body).unwrap();
        assert!(matches!(parsed, RequestBody::Webhook(_)));

        let manual = serde_json::json!({ "hospital_id": "h1", "urgency": "high" });
        let parsed: RequestBody = serde_json::from_value(manual).unwrap();
        assert!(matches!(parsed, RequestBody::Manual(_)));
    }
}
