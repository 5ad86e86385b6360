use crate::notification::process_pending_notifications::ProcessPendingNotificationsUseCase;
use crate::shared::usecase::execute;
use actix_web::rt::time::interval;
use actix_web::{web, HttpResponse};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use vital_api_structs::get_job_status::APIResponse;
use vital_infra::VitalContext;

/// Fixed period between notification runs.
const TICK_INTERVAL: Duration = Duration::from_secs(60);

/// Owns the state of the background notification job. Constructed once at
/// startup and handed to whatever needs to query it; there are no
/// module-level globals.
#[derive(Clone)]
pub struct SchedulerHandle {
    armed: Arc<AtomicBool>,
    store_connected: bool,
}

impl SchedulerHandle {
    fn new(store_connected: bool) -> Self {
        Self {
            armed: Arc::new(AtomicBool::new(false)),
            store_connected,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }

    pub fn store_connected(&self) -> bool {
        self.store_connected
    }
}

/// Starts the scheduled notifications job: one run immediately, then one
/// every `TICK_INTERVAL`. Each tick is awaited before the next is taken, so
/// ticks of one process never overlap; across processes the claim step in
/// the store keeps double-processing out.
pub fn start_scheduled_notifications_job(ctx: VitalContext) -> SchedulerHandle {
    let handle = SchedulerHandle::new(true);
    handle.armed.store(true, Ordering::SeqCst);

    actix_web::rt::spawn(async move {
        info!(
            "Scheduled notifications job started (interval: {:?})",
            TICK_INTERVAL
        );
        let mut ticker = interval(TICK_INTERVAL);
        loop {
            // The first tick completes immediately.
            ticker.tick().await;
            let usecase = ProcessPendingNotificationsUseCase::default();
            // Failures are logged by `execute`; the job itself never dies.
            let _ = execute(usecase, &ctx).await;
        }
    });

    handle
}

pub async fn get_job_status_controller(scheduler: web::Data<SchedulerHandle>) -> HttpResponse {
    HttpResponse::Ok().json(APIResponse {
        job_running: scheduler.is_armed(),
        store_connected: scheduler.store_connected(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_started_scheduler_reports_armed() {
        let handle = SchedulerHandle::new(true);
        assert!(!handle.is_armed());
        handle.armed.store(true, Ordering::SeqCst);
        assert!(handle.is_armed());
        assert!(handle.store_connected());
    }
}
