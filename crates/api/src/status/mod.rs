use actix_web::{web, HttpResponse};
use chrono::Utc;
use vital_api_structs::get_service_health::APIResponse;

async fn status() -> HttpResponse {
    HttpResponse::Ok().json(APIResponse {
        status: "ok".into(),
        service: "VITAL API".into(),
        timestamp: Utc::now(),
    })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(status));
}
