use crate::error::VitalError;
use actix_web::{web, HttpResponse};
use tracing::error;
use vital_api_structs::get_notification_status::APIResponse;
use vital_infra::VitalContext;

pub async fn get_notification_status_controller(
    ctx: web::Data<VitalContext>,
) -> Result<HttpResponse, VitalError> {
    let pendentes = ctx
        .repos
        .scheduled_notifications
        .count_by_enviada(false)
        .await
        .map_err(|e| {
            error!("Unable to count pending notifications: {:?}", e);
            VitalError::InternalError
        })?;
    let enviadas = ctx
        .repos
        .scheduled_notifications
        .count_by_enviada(true)
        .await
        .map_err(|e| {
            error!("Unable to count sent notifications: {:?}", e);
            VitalError::InternalError
        })?;

    Ok(HttpResponse::Ok().json(APIResponse {
        success: true,
        pendentes,
        enviadas,
        webpush_disponivel: ctx.push.is_some(),
        timestamp: ctx.sys.now(),
    }))
}
