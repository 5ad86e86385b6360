mod config;
mod repos;
mod services;
mod system;

pub use config::{Config, VapidConfig};
pub use repos::{
    IPushSubscriptionRepo, IScheduledNotificationRepo, Repos, SCHEDULED_NOTIFICATION_BATCH_LIMIT,
};
pub use services::{IPushClient, PushDeliveryError, WebPushGateway};
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;
use tracing::{info, warn};

#[derive(Clone)]
pub struct VitalContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    /// Absent when VAPID keys are not configured; the pipeline then runs in
    /// degraded mode and performs zero deliveries.
    pub push: Option<Arc<dyn IPushClient>>,
}

impl VitalContext {
    /// Context backed by in-memory repositories, for tests.
    pub fn create_inmemory(push: Option<Arc<dyn IPushClient>>) -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            push,
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> VitalContext {
    let config = Config::new();
    let repos = Repos::create_postgres(&get_psql_connection_string())
        .await
        .expect("Postgres credentials must be set and valid");
    let push = setup_push_client(&config);

    VitalContext {
        repos,
        config,
        sys: Arc::new(RealSys {}),
        push,
    }
}

fn setup_push_client(config: &Config) -> Option<Arc<dyn IPushClient>> {
    match &config.vapid {
        Some(vapid) => match WebPushGateway::create(vapid.clone()) {
            Ok(gateway) => {
                info!("Web Push configured");
                Some(Arc::new(gateway))
            }
            Err(e) => {
                warn!("Unable to create Web Push client, push delivery disabled: {:?}", e);
                None
            }
        },
        None => {
            warn!("VAPID keys not configured, push delivery disabled");
            None
        }
    }
}

fn get_psql_connection_string() -> String {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .unwrap_or_else(|_| panic!("{} env var to be present.", PSQL_CONNECTION_STRING))
}

pub async fn run_migration() -> Result<(), MigrateError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&get_psql_connection_string())
        .await
        .expect("TO CONNECT TO POSTGRES");

    sqlx::migrate!().run(&pool).await
}
