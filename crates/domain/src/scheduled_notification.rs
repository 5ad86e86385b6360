use crate::shared::entity::ID;
use chrono::{DateTime, Utc};

/// A `ScheduledNotification` is a one-shot instruction to alert the staff of
/// a hospital that the re-evaluation window for a `Solicitacao` has elapsed.
///
/// Rows live in the `notificacoes_agendadas` table. `enviada` only ever
/// transitions from `false` to `true`; once set, the row is permanently
/// excluded from future scans.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledNotification {
    pub id: ID,
    /// The clinical request this reminder concerns
    pub solicitacao_id: ID,
    /// Tenant scope. A reminder without a tenant can never be delivered and
    /// is marked sent with an error annotation.
    pub hospital_id: Option<String>,
    /// The reminder is due when this is in the past
    pub data_agendada: DateTime<Utc>,
    pub enviada: bool,
    /// Optional title override; the payload builder falls back to a default
    pub titulo: Option<String>,
    /// Optional body override
    pub mensagem: Option<String>,
    /// Diagnostic annotation written by the reconciler
    pub erro: Option<String>,
    /// When the reconciler processed this reminder
    pub data_envio: Option<DateTime<Utc>>,
}

impl ScheduledNotification {
    pub fn new(
        solicitacao_id: ID,
        hospital_id: Option<String>,
        data_agendada: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ID::new(),
            solicitacao_id,
            hospital_id,
            data_agendada,
            enviada: false,
            titulo: None,
            mensagem: None,
            erro: None,
            data_envio: None,
        }
    }
}
