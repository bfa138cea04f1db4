//! Service reminder dispatch
//!
//! For every vehicle in scope the upcoming service date is resolved from its
//! records. If it falls inside `[now, now + window]` and differs from the
//! vehicle's `last_reminder_sent_date`, the owner is emailed and the date is
//! stored as the new marker. Vehicles are processed concurrently and
//! independently: one failing send never stops or rolls back the others.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::models::service::ServiceRecord;
use crate::repositories::service_repository::ServiceRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::email_service::{service_reminder_email, Mailer};
use crate::services::next_service::resolve_next_service_date;
use crate::utils::errors::AppResult;

/// Everything needed to decide on and send one vehicle's reminder
#[derive(Debug, Clone)]
pub struct ReminderCandidate {
    pub vehicle_id: Uuid,
    pub vehicle_name: String,
    pub registration_number: String,
    pub owner_email: String,
    pub last_reminder_sent_date: Option<DateTime<Utc>>,
    pub services: Vec<ServiceRecord>,
}

#[async_trait]
pub trait ReminderStore: Send + Sync {
    /// Vehicles to check; every vehicle when `owner` is `None`.
    async fn candidates(&self, owner: Option<Uuid>) -> AppResult<Vec<ReminderCandidate>>;

    async fn mark_reminder_sent(&self, vehicle_id: Uuid, due: DateTime<Utc>) -> AppResult<()>;
}

pub struct PgReminderStore {
    vehicles: VehicleRepository,
    services: ServiceRepository,
}

impl PgReminderStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            vehicles: VehicleRepository::new(pool.clone()),
            services: ServiceRepository::new(pool),
        }
    }
}

#[async_trait]
impl ReminderStore for PgReminderStore {
    async fn candidates(&self, owner: Option<Uuid>) -> AppResult<Vec<ReminderCandidate>> {
        let vehicles = self.vehicles.find_with_owner(owner).await?;
        let ids: Vec<Uuid> = vehicles.iter().map(|v| v.vehicle.id).collect();
        let mut services = self.services.find_by_vehicles(&ids).await?;

        Ok(vehicles
            .into_iter()
            .map(|row| ReminderCandidate {
                services: services.remove(&row.vehicle.id).unwrap_or_default(),
                vehicle_id: row.vehicle.id,
                vehicle_name: row.vehicle.vehicle_name,
                registration_number: row.vehicle.registration_number,
                owner_email: row.owner_email,
                last_reminder_sent_date: row.vehicle.last_reminder_sent_date,
            })
            .collect())
    }

    async fn mark_reminder_sent(&self, vehicle_id: Uuid, due: DateTime<Utc>) -> AppResult<()> {
        self.vehicles.set_last_reminder_sent_date(vehicle_id, due).await
    }
}

/// Why a vehicle got no reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoUpcomingService,
    OutsideWindow,
    AlreadySent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderOutcome {
    Sent(DateTime<Utc>),
    Skipped(SkipReason),
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSummary {
    pub checked: usize,
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ReminderSummary {
    fn record(&mut self, outcome: ReminderOutcome) {
        self.checked += 1;
        match outcome {
            ReminderOutcome::Sent(_) => self.sent += 1,
            ReminderOutcome::Skipped(_) => self.skipped += 1,
            ReminderOutcome::Failed => self.failed += 1,
        }
    }
}

/// Due date to remind about, or why not to send.
pub fn reminder_due_date(
    services: &[ServiceRecord],
    last_reminder_sent_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    window: Duration,
) -> Result<DateTime<Utc>, SkipReason> {
    let due = resolve_next_service_date(services, now).ok_or(SkipReason::NoUpcomingService)?;

    if due < now || due > now + window {
        return Err(SkipReason::OutsideWindow);
    }
    if last_reminder_sent_date == Some(due) {
        return Err(SkipReason::AlreadySent);
    }
    Ok(due)
}

pub struct ReminderDispatcher {
    store: Arc<dyn ReminderStore>,
    mailer: Arc<dyn Mailer>,
    window: Duration,
}

impl ReminderDispatcher {
    pub fn new(store: Arc<dyn ReminderStore>, mailer: Arc<dyn Mailer>, window_days: i64) -> Self {
        Self {
            store,
            mailer,
            window: Duration::days(window_days),
        }
    }

    /// Run one sweep over all vehicles (`owner = None`) or one owner's vehicles.
    pub async fn dispatch(&self, owner: Option<Uuid>, now: DateTime<Utc>) -> AppResult<ReminderSummary> {
        let candidates = self.store.candidates(owner).await?;

        let outcomes = join_all(
            candidates
                .iter()
                .map(|candidate| self.process(candidate, now)),
        )
        .await;

        let mut summary = ReminderSummary::default();
        for outcome in outcomes {
            summary.record(outcome);
        }

        info!(
            "🔔 Reminder sweep: checked={} sent={} skipped={} failed={}",
            summary.checked, summary.sent, summary.skipped, summary.failed
        );
        Ok(summary)
    }

    async fn process(&self, candidate: &ReminderCandidate, now: DateTime<Utc>) -> ReminderOutcome {
        let due = match reminder_due_date(
            &candidate.services,
            candidate.last_reminder_sent_date,
            now,
            self.window,
        ) {
            Ok(due) => due,
            Err(reason) => {
                debug!("Vehicle {} skipped: {:?}", candidate.vehicle_id, reason);
                return ReminderOutcome::Skipped(reason);
            }
        };

        let email = service_reminder_email(
            &candidate.owner_email,
            &candidate.vehicle_name,
            &candidate.registration_number,
            due,
            now,
        );

        if let Err(e) = self.mailer.send(email).await {
            error!(
                "❌ Reminder for vehicle {} to {} failed: {}",
                candidate.vehicle_id, candidate.owner_email, e
            );
            return ReminderOutcome::Failed;
        }

        if let Err(e) = self.store.mark_reminder_sent(candidate.vehicle_id, due).await {
            error!(
                "❌ Reminder sent for vehicle {} but marker not saved: {}",
                candidate.vehicle_id, e
            );
            return ReminderOutcome::Failed;
        }

        info!(
            "📧 Reminder sent for vehicle {} (due {})",
            candidate.vehicle_id,
            due.format("%Y-%m-%d")
        );
        ReminderOutcome::Sent(due)
    }
}
