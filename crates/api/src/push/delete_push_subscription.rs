use crate::error::VitalError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use vital_api_structs::delete_push_subscription::{APIResponse, RequestBody};
use vital_infra::VitalContext;

pub async fn delete_push_subscription_controller(
    ctx: web::Data<VitalContext>,
    body: web::Json<RequestBody>,
) -> Result<HttpResponse, VitalError> {
    let usecase = DeletePushSubscriptionUseCase {
        endpoint: body.0.endpoint,
    };

    execute(usecase, &ctx)
        .await
        .map(|_| HttpResponse::Ok().json(APIResponse { success: true }))
        .map_err(VitalError::from)
}

#[derive(Debug)]
pub struct DeletePushSubscriptionUseCase {
    pub endpoint: String,
}

#[derive(Debug)]
pub enum UseCaseError {
    MissingEndpoint,
    StorageError,
}

impl From<UseCaseError> for VitalError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::MissingEndpoint => {
                Self::BadClientData("Endpoint é obrigatório".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeletePushSubscriptionUseCase {
    type Response = ();

    type Error = UseCaseError;

    const NAME: &'static str = "DeletePushSubscription";

    async fn execute(&mut self, ctx: &VitalContext) -> Result<Self::Response, Self::Error> {
        if self.endpoint.is_empty() {
            return Err(UseCaseError::MissingEndpoint);
        }

        ctx.repos
            .push_subscriptions
            .delete_by_endpoint(&self.endpoint)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{setup_ctx, subscription, StubPushClient};

    #[actix_web::main]
    #[test]
    async fn it_removes_the_registration_for_the_endpoint() {
        let (ctx, _client) = setup_ctx(StubPushClient::new());
        ctx.repos
            .push_subscriptions
            .upsert(&subscription("h1", "https://push/1"))
            .await
            .unwrap();

        let usecase = DeletePushSubscriptionUseCase {
            endpoint: "https://push/1".into(),
        };
        execute(usecase, &ctx).await.unwrap();

        assert!(ctx
            .repos
            .push_subscriptions
            .find_by_hospital("h1")
            .await
            .unwrap()
            .is_empty());
    }
}
