mod dispatch;
mod get_notification_status;
pub mod process_pending_notifications;

use crate::job_schedulers::get_job_status_controller;
use actix_web::web;
pub use dispatch::{dispatch_notification, DispatchSummary};
use get_notification_status::get_notification_status_controller;
use process_pending_notifications::process_pending_notifications_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/notificacoes/processar",
        web::post().to(process_pending_notifications_controller),
    );
    cfg.route(
        "/notificacoes/status",
        web::get().to(get_notification_status_controller),
    );
    cfg.route("/notificacoes/job", web::get().to(get_job_status_controller));
}
