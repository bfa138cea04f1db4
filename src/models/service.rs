//! Service record model
//!
//! Maps the `services` table. Records are immutable once written; the only
//! mutation is deletion.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Kind of maintenance performed - stored as its display label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    #[serde(rename = "Oil Change")]
    OilChange,
    #[serde(rename = "Brake Service")]
    BrakeService,
    #[serde(rename = "Tire Rotation")]
    TireRotation,
    #[serde(rename = "Battery Replacement")]
    BatteryReplacement,
    #[serde(rename = "Engine Diagnostics")]
    EngineDiagnostics,
    #[serde(rename = "General Maintenance")]
    GeneralMaintenance,
    #[serde(rename = "Others")]
    Others,
}

impl ServiceType {
    pub const ALL: [ServiceType; 7] = [
        ServiceType::OilChange,
        ServiceType::BrakeService,
        ServiceType::TireRotation,
        ServiceType::BatteryReplacement,
        ServiceType::EngineDiagnostics,
        ServiceType::GeneralMaintenance,
        ServiceType::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::OilChange => "Oil Change",
            ServiceType::BrakeService => "Brake Service",
            ServiceType::TireRotation => "Tire Rotation",
            ServiceType::BatteryReplacement => "Battery Replacement",
            ServiceType::EngineDiagnostics => "Engine Diagnostics",
            ServiceType::GeneralMaintenance => "General Maintenance",
            ServiceType::Others => "Others",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown service type '{0}'")]
pub struct UnknownServiceType(pub String);

impl FromStr for ServiceType {
    type Err = UnknownServiceType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownServiceType(s.to_string()))
    }
}

impl TryFrom<String> for ServiceType {
    type Error = UnknownServiceType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Name and address of a workshop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCenter {
    pub name: String,
    pub address: String,
}

/// Row of the `services` table
#[derive(Debug, Clone, FromRow)]
pub struct ServiceRecord {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub service_date: DateTime<Utc>,
    pub description: String,
    pub cost: Decimal,
    pub mileage: Option<i32>,
    pub next_service_date: Option<DateTime<Utc>>,
    #[sqlx(try_from = "String")]
    pub service_type: ServiceType,
    pub service_center_name: String,
    pub service_center_address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ServiceRecord {
    pub fn service_center(&self) -> ServiceCenter {
        ServiceCenter {
            name: self.service_center_name.clone(),
            address: self.service_center_address.clone(),
        }
    }
}
