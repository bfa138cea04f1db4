use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::dto::reminder_dto::ReminderResponse;
use crate::services::reminder_service::ReminderDispatcher;
use crate::utils::errors::AppResult;

pub struct ReminderController {
    dispatcher: Arc<ReminderDispatcher>,
}

impl ReminderController {
    pub fn new(dispatcher: Arc<ReminderDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// On-demand sweep over the caller's own vehicles
    pub async fn trigger(&self, user_id: Uuid) -> AppResult<ReminderResponse> {
        info!("📬 On-demand reminder sweep requested by user {}", user_id);
        let summary = self.dispatcher.dispatch(Some(user_id), Utc::now()).await?;
        Ok(summary.into())
    }
}
