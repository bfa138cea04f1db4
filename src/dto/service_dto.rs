use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::service::{ServiceCenter, ServiceRecord, ServiceType};
use crate::utils::validation::{flexible_datetime, validate_not_empty};

#[derive(Debug, Deserialize, Validate)]
pub struct ServiceCenterInput {
    #[validate(custom = "validate_not_empty")]
    pub name: String,

    #[validate(custom = "validate_not_empty")]
    pub address: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequest {
    pub service_type: ServiceType,

    #[serde(deserialize_with = "flexible_datetime::deserialize")]
    pub service_date: DateTime<Utc>,

    #[validate(custom = "validate_not_empty")]
    pub description: String,

    pub cost: Decimal,

    #[serde(default)]
    pub mileage: Option<i32>,

    #[serde(default, deserialize_with = "flexible_datetime::option::deserialize")]
    pub next_service_date: Option<DateTime<Utc>>,

    #[validate]
    pub service_center: ServiceCenterInput,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub service_type: ServiceType,
    pub service_date: DateTime<Utc>,
    pub description: String,
    pub cost: Decimal,
    pub mileage: Option<i32>,
    pub next_service_date: Option<DateTime<Utc>>,
    pub service_center: ServiceCenter,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ServiceRecord> for ServiceResponse {
    fn from(record: ServiceRecord) -> Self {
        Self {
            service_center: record.service_center(),
            id: record.id,
            vehicle_id: record.vehicle_id,
            service_type: record.service_type,
            service_date: record.service_date,
            description: record.description,
            cost: record.cost,
            mileage: record.mileage,
            next_service_date: record.next_service_date,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_service_request_from_frontend_payload() {
        let request: CreateServiceRequest = serde_json::from_str(
            r#"{
                "serviceType": "Oil Change",
                "serviceDate": "2024-02-01",
                "cost": 79.99,
                "description": "Synthetic oil",
                "mileage": 42000,
                "nextServiceDate": "2024-08-01",
                "serviceCenter": {"name": "Quick Lube", "address": "1 Main St"}
            }"#,
        )
        .unwrap();

        assert_eq!(request.service_type, ServiceType::OilChange);
        assert_eq!(request.mileage, Some(42000));
        assert!(request.next_service_date.is_some());
        assert!(request.cost > Decimal::ZERO);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_blank_service_center_fails_validation() {
        let request: CreateServiceRequest = serde_json::from_str(
            r#"{
                "serviceType": "Others",
                "serviceDate": "2024-02-01",
                "cost": 10,
                "description": "Wipers",
                "serviceCenter": {"name": " ", "address": ""}
            }"#,
        )
        .unwrap();

        assert!(request.next_service_date.is_none());
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_unknown_service_type_is_rejected() {
        let parsed = serde_json::from_str::<CreateServiceRequest>(
            r#"{
                "serviceType": "Car Wash",
                "serviceDate": "2024-02-01",
                "cost": 10,
                "description": "Foam",
                "serviceCenter": {"name": "Suds", "address": "2 Main St"}
            }"#,
        );
        assert!(parsed.is_err());
    }
}
