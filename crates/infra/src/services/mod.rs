mod push;

pub use push::{IPushClient, PushDeliveryError, WebPushGateway};
