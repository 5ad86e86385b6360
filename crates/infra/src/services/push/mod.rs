use crate::config::VapidConfig;
use thiserror::Error;
use vital_domain::{NotificationPayload, PushSubscription};
use web_push::{
    ContentEncoding, IsahcWebPushClient, SubscriptionInfo, VapidSignatureBuilder, WebPushClient,
    WebPushError, WebPushMessageBuilder, URL_SAFE_NO_PAD,
};

#[derive(Debug, Error)]
pub enum PushDeliveryError {
    /// The push service reported the endpoint as permanently gone (HTTP
    /// 410/404). The subscription should be removed.
    #[error("Subscription endpoint is gone")]
    Gone,
    #[error("Push delivery failed: {0}")]
    Delivery(String),
}

/// A single delivery attempt to one device. Implemented by the Web Push
/// gateway in production and by stubs in tests.
#[async_trait::async_trait]
pub trait IPushClient: Send + Sync {
    async fn send(
        &self,
        subscription: &PushSubscription,
        payload: &NotificationPayload,
    ) -> Result<(), PushDeliveryError>;
}

/// Delivers notifications over the Web Push protocol: VAPID-signed requests
/// with aes128gcm-encrypted payloads, addressed with the key material stored
/// on the subscription.
pub struct WebPushGateway {
    client: IsahcWebPushClient,
    vapid: VapidConfig,
}

impl WebPushGateway {
    pub fn create(vapid: VapidConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client: IsahcWebPushClient::new()?,
            vapid,
        })
    }
}

#[async_trait::async_trait]
impl IPushClient for WebPushGateway {
    async fn send(
        &self,
        subscription: &PushSubscription,
        payload: &NotificationPayload,
    ) -> Result<(), PushDeliveryError> {
        let info = SubscriptionInfo::new(
            subscription.endpoint.clone(),
            subscription.p256dh.clone(),
            subscription.auth.clone(),
        );

        let body = serde_json::to_vec(payload)
            .map_err(|e| PushDeliveryError::Delivery(e.to_string()))?;

        let mut sig_builder = VapidSignatureBuilder::from_base64(&self.vapid.private_key, URL_SAFE_NO_PAD, &info)
            .map_err(|e| PushDeliveryError::Delivery(e.to_string()))?;
        sig_builder.add_claim("sub", self.vapid.subject.clone());
        let signature = sig_builder
            .build()
            .map_err(|e| PushDeliveryError::Delivery(e.to_string()))?;

        let mut builder = WebPushMessageBuilder::new(&info);
        builder.set_payload(ContentEncoding::Aes128Gcm, &body);
        builder.set_vapid_signature(signature);
        let message = builder
            .build()
            .map_err(|e| PushDeliveryError::Delivery(e.to_string()))?;

        match self.client.send(message).await {
            Ok(_) => Ok(()),
            Err(WebPushError::EndpointNotValid) | Err(WebPushError::EndpointNotFound) => {
                Err(PushDeliveryError::Gone)
            }
            Err(e) => Err(PushDeliveryError::Delivery(e.to_string())),
        }
    }
}
