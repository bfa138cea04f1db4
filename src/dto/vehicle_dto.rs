use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::service::ServiceCenter;
use crate::models::vehicle::{ServiceCenterUsage, Vehicle};
use crate::utils::validation::validate_not_empty;

/// Model year as number, numeric string, empty string or null
fn lenient_model_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom("modelYear must be a whole number")),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(serde_json::Value::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom("modelYear must be a whole number")),
        Some(_) => Err(serde::de::Error::custom("modelYear must be a whole number")),
    }
}

/// Body of both create and update; update replaces all three fields.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRequest {
    #[validate(custom = "validate_not_empty")]
    pub vehicle_name: String,

    #[validate(custom = "validate_not_empty")]
    pub registration_number: String,

    #[serde(default, deserialize_with = "lenient_model_year")]
    #[validate(range(min = 1886, max = 2100))]
    pub model_year: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPreferredCenterRequest {
    pub vehicle_id: Option<Uuid>,
    pub name: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferredCenterResponse {
    pub message: String,
    pub preferred_service_center: Option<ServiceCenter>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user_id: Uuid,
    pub vehicle_name: String,
    pub registration_number: String,
    pub model_year: Option<i32>,
    pub preferred_service_center: Option<ServiceCenter>,
    pub service_center_history: Vec<ServiceCenterUsage>,
    pub last_reminder_sent_date: Option<DateTime<Utc>>,
    /// Computed from the service records at read time
    pub next_service_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VehicleResponse {
    pub fn from_vehicle(vehicle: Vehicle, next_service_date: Option<DateTime<Utc>>) -> Self {
        Self {
            preferred_service_center: vehicle.preferred_service_center(),
            service_center_history: vehicle.service_center_history.0.entries().to_vec(),
            id: vehicle.id,
            user_id: vehicle.user_id,
            vehicle_name: vehicle.vehicle_name,
            registration_number: vehicle.registration_number,
            model_year: vehicle.model_year,
            last_reminder_sent_date: vehicle.last_reminder_sent_date,
            next_service_date,
            created_at: vehicle.created_at,
            updated_at: vehicle.updated_at,
        }
    }
}
