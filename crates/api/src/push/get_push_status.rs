use actix_web::{web, HttpResponse};
use vital_api_structs::get_push_status::APIResponse;
use vital_infra::VitalContext;

pub async fn get_push_status_controller(ctx: web::Data<VitalContext>) -> HttpResponse {
    HttpResponse::Ok().json(APIResponse {
        enabled: ctx.push.is_some(),
        vapid_configured: ctx.config.vapid.is_some(),
        public_key: ctx.config.vapid.as_ref().map(|v| v.public_key.clone()),
        timestamp: ctx.sys.now(),
    })
}
