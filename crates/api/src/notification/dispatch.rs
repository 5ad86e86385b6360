use tracing::{error, warn};
use vital_domain::{NotificationPayload, PushSubscription};
use vital_infra::{PushDeliveryError, VitalContext};

#[derive(Debug, Default, PartialEq)]
pub struct DispatchSummary {
    pub sent: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

/// Delivers `payload` to every recipient, one independent attempt per
/// device: a failing device never aborts delivery to the rest, and
/// `sent + failed` always equals the number of attempts.
///
/// Endpoints the push service reports as gone are deleted from the store
/// right away so they are not contacted again on the next fan-out. Without a
/// configured push client nothing is attempted.
pub async fn dispatch_notification(
    payload: &NotificationPayload,
    recipients: &[PushSubscription],
    ctx: &VitalContext,
) -> DispatchSummary {
    let mut summary = DispatchSummary::default();

    let client = match &ctx.push {
        Some(client) => client,
        None => return summary,
    };

    for subscription in recipients {
        match client.send(subscription, payload).await {
            Ok(()) => summary.sent += 1,
            Err(PushDeliveryError::Gone) => {
                summary.failed += 1;
                summary
                    .errors
                    .push(format!("endpoint gone: {}", subscription.endpoint));
                warn!(
                    "Subscription endpoint reported gone, removing: {}",
                    subscription.endpoint
                );
                if let Err(e) = ctx
                    .repos
                    .push_subscriptions
                    .delete_by_endpoint(&subscription.endpoint)
                    .await
                {
                    error!(
                        "Unable to remove gone subscription {}: {:?}",
                        subscription.endpoint, e
                    );
                }
            }
            Err(PushDeliveryError::Delivery(message)) => {
                summary.failed += 1;
                summary.errors.push(message);
            }
        }
    }

    summary
}
