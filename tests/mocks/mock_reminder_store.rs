use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use vehicle_vault::services::reminder_service::{ReminderCandidate, ReminderStore};
use vehicle_vault::utils::errors::{AppError, AppResult};

/// In-memory reminder store keyed by vehicle, remembering each vehicle's owner.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockReminderStore {
    vehicles: Arc<Mutex<Vec<(Uuid, ReminderCandidate)>>>,
    marked: Arc<Mutex<HashMap<Uuid, DateTime<Utc>>>>,
    fail_mark_for: Arc<Mutex<Option<Uuid>>>,
}

#[allow(dead_code)]
impl MockReminderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vehicle(&self, owner: Uuid, candidate: ReminderCandidate) {
        self.vehicles.lock().unwrap().push((owner, candidate));
    }

    /// Marker currently stored for a vehicle
    pub fn last_reminder(&self, vehicle_id: Uuid) -> Option<DateTime<Utc>> {
        self.vehicles
            .lock()
            .unwrap()
            .iter()
            .find(|(_, c)| c.vehicle_id == vehicle_id)
            .and_then(|(_, c)| c.last_reminder_sent_date)
    }

    pub fn mark_count(&self) -> usize {
        self.marked.lock().unwrap().len()
    }

    pub fn fail_marking(&self, vehicle_id: Uuid) {
        *self.fail_mark_for.lock().unwrap() = Some(vehicle_id);
    }
}

#[async_trait]
impl ReminderStore for MockReminderStore {
    async fn candidates(&self, owner: Option<Uuid>) -> AppResult<Vec<ReminderCandidate>> {
        let vehicles = self.vehicles.lock().unwrap();
        Ok(vehicles
            .iter()
            .filter(|(vehicle_owner, _)| owner.map_or(true, |o| o == *vehicle_owner))
            .map(|(_, candidate)| candidate.clone())
            .collect())
    }

    async fn mark_reminder_sent(&self, vehicle_id: Uuid, due: DateTime<Utc>) -> AppResult<()> {
        if *self.fail_mark_for.lock().unwrap() == Some(vehicle_id) {
            return Err(AppError::Internal("store unavailable".to_string()));
        }

        let mut vehicles = self.vehicles.lock().unwrap();
        for (_, candidate) in vehicles.iter_mut() {
            if candidate.vehicle_id == vehicle_id {
                candidate.last_reminder_sent_date = Some(due);
            }
        }
        self.marked.lock().unwrap().insert(vehicle_id, due);
        Ok(())
    }
}
