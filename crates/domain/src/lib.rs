mod notification;
mod scheduled_notification;
mod shared;
mod solicitacao;
mod subscription;

pub use notification::{NotificationPayload, NotificationSource, DEFAULT_BADGE, DEFAULT_ICON};
pub use scheduled_notification::ScheduledNotification;
pub use shared::entity::ID;
pub use solicitacao::{MewsLevel, Solicitacao};
pub use subscription::PushSubscription;
