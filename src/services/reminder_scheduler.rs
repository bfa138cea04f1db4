//! Daily reminder timer
//!
//! Fires the reminder sweep once a day at a fixed wall-clock hour of the
//! server's local time zone, independent of request traffic.

use chrono::{DateTime, Local, NaiveTime, TimeZone, Utc};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::services::reminder_service::ReminderDispatcher;

/// Next instant strictly after `now` whose local time is `hour:00:00`.
pub fn next_run_after<Tz: TimeZone>(now: &DateTime<Tz>, hour: u32) -> DateTime<Tz> {
    let tz = now.timezone();
    let at = NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or_default();
    let mut day = now.date_naive();

    loop {
        // Skips days where the hour does not exist (DST gap)
        if let Some(candidate) = tz.from_local_datetime(&day.and_time(at)).earliest() {
            if candidate > *now {
                return candidate;
            }
        }
        day = day.succ_opt().unwrap_or(day);
    }
}

pub struct ReminderScheduler {
    dispatcher: Arc<ReminderDispatcher>,
    hour: u32,
}

impl ReminderScheduler {
    pub fn new(dispatcher: Arc<ReminderDispatcher>, hour: u32) -> Self {
        Self { dispatcher, hour }
    }

    /// Spawn the timer loop; it exits once `shutdown` flips to `true`.
    pub fn spawn(self, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!("⏰ Reminder scheduler started (daily at {:02}:00)", self.hour);
            loop {
                let now = Local::now();
                let next = next_run_after(&now, self.hour);
                info!("⏰ Next reminder sweep at {}", next.to_rfc3339());
                let wait = (next - now).to_std().unwrap_or(std::time::Duration::ZERO);

                tokio::select! {
                    _ = tokio::time::sleep(wait) => {}
                    _ = shutdown.changed() => {
                        info!("🛑 Reminder scheduler stopping");
                        return;
                    }
                }

                info!("🔔 Running reminder sweep...");
                if let Err(e) = self.dispatcher.dispatch(None, Utc::now()).await {
                    error!("❌ Reminder sweep failed: {}", e);
                }
            }
        })
    }
}
