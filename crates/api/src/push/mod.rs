mod create_push_subscription;
mod delete_push_subscription;
mod get_push_status;
mod get_push_subscriptions;
pub mod send_push_notification;

use actix_web::web;
use create_push_subscription::create_push_subscription_controller;
use delete_push_subscription::delete_push_subscription_controller;
use get_push_status::get_push_status_controller;
use get_push_subscriptions::get_push_subscriptions_controller;
use send_push_notification::send_push_notification_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/push/subscription",
        web::post().to(create_push_subscription_controller),
    );
    cfg.route(
        "/push/subscription",
        web::delete().to(delete_push_subscription_controller),
    );
    cfg.route("/push/send", web::post().to(send_push_notification_controller));
    cfg.route("/push/status", web::get().to(get_push_status_controller));
    cfg.route(
        "/push/subscriptions",
        web::get().to(get_push_subscriptions_controller),
    );
}
