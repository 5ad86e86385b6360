use crate::error::VitalError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use vital_api_structs::create_push_subscription::{APIResponse, RequestBody};
use vital_domain::{PushSubscription, ID};
use vital_infra::VitalContext;

pub async fn create_push_subscription_controller(
    ctx: web::Data<VitalContext>,
    body: web::Json<RequestBody>,
) -> Result<HttpResponse, VitalError> {
    let body = body.0;
    let usecase = CreatePushSubscriptionUseCase {
        endpoint: body.subscription.endpoint,
        p256dh: body.subscription.keys.p256dh,
        auth: body.subscription.keys.auth,
        user_id: body.user_id,
        hospital_id: body.hospital_id,
        device_info: body.device_info,
    };

    execute(usecase, &ctx)
        .await
        .map(|subscription| {
            HttpResponse::Ok().json(APIResponse {
                success: true,
                id: subscription.id,
            })
        })
        .map_err(VitalError::from)
}

#[derive(Debug)]
pub struct CreatePushSubscriptionUseCase {
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
    pub user_id: Option<String>,
    pub hospital_id: Option<String>,
    pub device_info: Option<serde_json::Value>,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidSubscription,
    StorageError,
}

impl From<UseCaseError> for VitalError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidSubscription => {
                Self::BadClientData("Subscription endpoint must not be empty".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreatePushSubscriptionUseCase {
    type Response = PushSubscription;

    type Error = UseCaseError;

    const NAME: &'static str = "CreatePushSubscription";

    async fn execute(&mut self, ctx: &VitalContext) -> Result<Self::Response, Self::Error> {
        if self.endpoint.is_empty() {
            return Err(UseCaseError::InvalidSubscription);
        }

        let now = ctx.sys.now();
        let subscription = PushSubscription {
            id: ID::new(),
            endpoint: self.endpoint.clone(),
            p256dh: self.p256dh.clone(),
            auth: self.auth.clone(),
            user_id: self.user_id.clone(),
            hospital_id: self.hospital_id.clone(),
            device_info: self.device_info.clone(),
            created_at: now,
            updated_at: now,
        };

        ctx.repos
            .push_subscriptions
            .upsert(&subscription)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
