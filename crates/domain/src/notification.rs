use crate::scheduled_notification::ScheduledNotification;
use crate::solicitacao::{MewsLevel, Solicitacao};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const DEFAULT_ICON: &str = "/icons/icon-192x192.png";
pub const DEFAULT_BADGE: &str = "/icons/icon-72x72.png";

/// The JSON document handed to the push service and ultimately consumed by
/// the service worker on the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    /// Notifications with the same tag replace each other on the device, so
    /// repeats for one event coalesce instead of stacking.
    pub tag: String,
    pub data: serde_json::Value,
    #[serde(rename = "requireInteraction")]
    pub require_interaction: bool,
}

/// The two events that produce a notification: a due re-evaluation reminder
/// and a freshly inserted solicitação arriving through the database webhook.
#[derive(Debug)]
pub enum NotificationSource<'a> {
    Reavaliacao(&'a ScheduledNotification),
    NovaSolicitacao(&'a Solicitacao),
}

impl NotificationPayload {
    /// Pure builder: formatting only, no I/O.
    pub fn from_source(source: NotificationSource<'_>) -> Self {
        match source {
            NotificationSource::Reavaliacao(notification) => Self {
                title: notification
                    .titulo
                    .clone()
                    .unwrap_or_else(|| "Tempo de Reavaliação Expirou!".into()),
                body: notification
                    .mensagem
                    .clone()
                    .unwrap_or_else(|| "Paciente precisa de atenção!".into()),
                icon: DEFAULT_ICON.into(),
                badge: DEFAULT_BADGE.into(),
                tag: format!("reavaliacao-{}", notification.solicitacao_id),
                data: json!({
                    "tipo": "reavaliacao_expirada",
                    "solicitacao_id": notification.solicitacao_id,
                    "url": "/",
                }),
                require_interaction: false,
            },
            NotificationSource::NovaSolicitacao(solicitacao) => {
                let nivel = MewsLevel::from_score(solicitacao.mews.unwrap_or(0));
                let paciente = solicitacao.paciente.as_deref().unwrap_or("N/A");
                let motivo = solicitacao
                    .motivo
                    .as_deref()
                    .unwrap_or("Nova solicitação");
                Self {
                    title: "🚨 Nova Solicitação TRR".into(),
                    body: format!("Paciente: {} - {} ({})", paciente, motivo, nivel.label()),
                    icon: DEFAULT_ICON.into(),
                    badge: DEFAULT_BADGE.into(),
                    tag: format!("solicitacao-{}", solicitacao.id),
                    data: json!({
                        "tipo": "nova_solicitacao",
                        "solicitacao_id": solicitacao.id,
                        "url": "/",
                    }),
                    require_interaction: nivel.is_high_urgency(),
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::entity::ID;
    use chrono::Utc;

    fn scheduled_notification() -> ScheduledNotification {
        ScheduledNotification::new(ID::new(), Some("h1".into()), Utc::now())
    }

    fn solicitacao(mews: Option<i32>) -> Solicitacao {
        Solicitacao {
            id: ID::new(),
            paciente: Some("Maria".into()),
            leito: Some("12B".into()),
            motivo: Some("Rebaixamento de consciência".into()),
            mews,
            hospital_id: Some("h1".into()),
            status: Some("pendente".into()),
        }
    }

    #[test]
    fn reminder_payload_uses_defaults_when_not_overridden() {
        let notification = scheduled_notification();
        let payload =
            NotificationPayload::from_source(NotificationSource::Reavaliacao(&notification));

        assert_eq!(payload.title, "Tempo de Reavaliação Expirou!");
        assert_eq!(payload.body, "Paciente precisa de atenção!");
        assert!(!payload.require_interaction);
    }

    #[test]
    fn reminder_payload_prefers_overrides() {
        let mut notification = scheduled_notification();
        notification.titulo = Some("Reavaliar leito 12B".into());
        notification.mensagem = Some("MEWS acima do esperado".into());

        let payload =
            NotificationPayload::from_source(NotificationSource::Reavaliacao(&notification));
        assert_eq!(payload.title, "Reavaliar leito 12B");
        assert_eq!(payload.body, "MEWS acima do esperado");
    }

    #[test]
    fn reminder_tag_embeds_the_solicitacao_id() {
        let notification = scheduled_notification();
        let payload =
            NotificationPayload::from_source(NotificationSource::Reavaliacao(&notification));
        assert_eq!(
            payload.tag,
            format!("reavaliacao-{}", notification.solicitacao_id)
        );
    }

    #[test]
    fn solicitacao_payload_classifies_severity() {
        let red = solicitacao(Some(8));
        let payload = NotificationPayload::from_source(NotificationSource::NovaSolicitacao(&red));
        assert!(payload.body.contains("Código Vermelho"));
        assert!(payload.require_interaction);

        let yellow = solicitacao(Some(3));
        let payload =
            NotificationPayload::from_source(NotificationSource::NovaSolicitacao(&yellow));
        assert!(payload.body.contains("Código Amarelo"));
        assert!(!payload.require_interaction);

        let missing = solicitacao(None);
        let payload =
            NotificationPayload::from_source(NotificationSource::NovaSolicitacao(&missing));
        assert!(payload.body.contains("Código Azul"));
        assert!(!payload.require_interaction);
    }

    #[test]
    fn payload_serializes_with_the_wire_field_names() {
        let notification = scheduled_notification();
        let payload =
            NotificationPayload::from_source(NotificationSource::Reavaliacao(&notification));
        let value = serde_json::to_value(&payload).unwrap();

        assert!(value.get("requireInteraction").is_some());
        assert_eq!(value["data"]["tipo"], "reavaliacao_expirada");
    }
}
