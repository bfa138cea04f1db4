//! Vehicle model
//!
//! Maps the `vehicles` table. The preferred workshop is kept in two nullable
//! columns and the recently used workshops in a JSONB list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::service::ServiceCenter;

/// Maximum number of workshops remembered per vehicle
pub const SERVICE_CENTER_HISTORY_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCenterUsage {
    pub name: String,
    pub address: String,
    pub last_used_at: DateTime<Utc>,
}

/// Recently used workshops, most recent first, unique by (name, address).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceCenterHistory(Vec<ServiceCenterUsage>);

impl ServiceCenterHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ServiceCenterUsage] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Move (or insert) a workshop to the front and cap the list.
    pub fn record_usage(&mut self, name: &str, address: &str, at: DateTime<Utc>) {
        self.0
            .retain(|entry| !(entry.name == name && entry.address == address));
        self.0.insert(
            0,
            ServiceCenterUsage {
                name: name.to_string(),
                address: address.to_string(),
                last_used_at: at,
            },
        );
        self.0.truncate(SERVICE_CENTER_HISTORY_LIMIT);
    }
}

/// Row of the `vehicles` table
#[derive(Debug, Clone, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub user_id: Uuid,
    pub vehicle_name: String,
    pub registration_number: String,
    pub model_year: Option<i32>,
    pub preferred_center_name: Option<String>,
    pub preferred_center_address: Option<String>,
    pub service_center_history: Json<ServiceCenterHistory>,
    pub last_reminder_sent_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn new(
        user_id: Uuid,
        vehicle_name: String,
        registration_number: String,
        model_year: Option<i32>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            vehicle_name,
            registration_number,
            model_year,
            preferred_center_name: None,
            preferred_center_address: None,
            service_center_history: Json(ServiceCenterHistory::new()),
            last_reminder_sent_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    pub fn preferred_service_center(&self) -> Option<ServiceCenter> {
        match (&self.preferred_center_name, &self.preferred_center_address) {
            (Some(name), Some(address)) => Some(ServiceCenter {
                name: name.clone(),
                address: address.clone(),
            }),
            _ => None,
        }
    }
}
