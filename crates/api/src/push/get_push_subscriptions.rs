use crate::error::VitalError;
use actix_web::{web, HttpResponse};
use tracing::error;
use vital_api_structs::dtos::PushSubscriptionDTO;
use vital_api_structs::get_push_subscriptions::APIResponse;
use vital_infra::VitalContext;

const LISTING_LIMIT: i64 = 20;

pub async fn get_push_subscriptions_controller(
    ctx: web::Data<VitalContext>,
) -> Result<HttpResponse, VitalError> {
    let subscriptions = ctx
        .repos
        .push_subscriptions
        .find_recent(LISTING_LIMIT)
        .await
        .map_err(|e| {
            error!("Unable to list push subscriptions: {:?}", e);
            VitalError::InternalError
        })?;

    let subscriptions: Vec<_> = subscriptions
        .iter()
        .map(PushSubscriptionDTO::new)
        .collect();

    Ok(HttpResponse::Ok().json(APIResponse {
        count: subscriptions.len(),
        subscriptions,
    }))
}
