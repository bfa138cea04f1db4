use serde::Serialize;

use crate::services::reminder_service::ReminderSummary;

#[derive(Debug, Serialize)]
pub struct ReminderResponse {
    pub message: String,
    pub summary: ReminderSummary,
}

impl From<ReminderSummary> for ReminderResponse {
    fn from(summary: ReminderSummary) -> Self {
        let message = if summary.checked == 0 {
            "No vehicles found."
        } else if summary.sent == 0 && summary.failed == 0 {
            "No reminders needed this week."
        } else if summary.failed > 0 {
            "Some reminders could not be sent."
        } else {
            "Reminders sent successfully."
        };

        Self {
            message: message.to_string(),
            summary,
        }
    }
}
