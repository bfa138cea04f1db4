//! Shared application state
//!
//! Cloned into every axum handler.

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::services::email_service::Mailer;
use crate::services::reminder_service::{PgReminderStore, ReminderDispatcher};
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<EnvironmentConfig>,
    pub jwt: Arc<JwtConfig>,
    pub mailer: Arc<dyn Mailer>,
    pub reminders: Arc<ReminderDispatcher>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig, mailer: Arc<dyn Mailer>) -> Self {
        let reminders = Arc::new(ReminderDispatcher::new(
            Arc::new(PgReminderStore::new(pool.clone())),
            mailer.clone(),
            config.reminder_window_days,
        ));

        Self {
            pool,
            jwt: Arc::new(JwtConfig::from(&config)),
            config: Arc::new(config),
            mailer,
            reminders,
        }
    }
}
