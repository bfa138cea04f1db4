use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::dto::service_dto::{CreateServiceRequest, ServiceResponse};
use crate::models::service::ServiceRecord;
use crate::models::vehicle::Vehicle;
use crate::repositories::service_repository::ServiceRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::{not_found_error, validation_error, AppError, AppResult};
use crate::utils::validation::{validate_money, validate_non_negative, validate_positive};

pub struct ServiceController {
    pool: PgPool,
    repository: ServiceRepository,
    vehicles: VehicleRepository,
}

fn check_field(field: &'static str, result: Result<(), ValidationError>) -> AppResult<()> {
    result.map_err(|error| {
        let mut errors = ValidationErrors::new();
        errors.add(field, error);
        AppError::Validation(errors)
    })
}

/// Field checks that do not need the database
fn validate_request(request: &CreateServiceRequest) -> AppResult<()> {
    request.validate()?;

    check_field("cost", validate_positive(&request.cost))?;
    check_field("cost", validate_money(&request.cost))?;
    if let Some(mileage) = request.mileage {
        check_field("mileage", validate_non_negative(&mileage))?;
    }
    if request.service_date.date_naive() > Utc::now().date_naive() {
        return Err(validation_error(
            "serviceDate",
            "Service date cannot be in the future.",
        ));
    }
    Ok(())
}

impl ServiceController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ServiceRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool.clone()),
            pool,
        }
    }

    async fn load_owned_vehicle(&self, vehicle_id: Uuid, user_id: Uuid) -> AppResult<Vehicle> {
        let vehicle = self
            .vehicles
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found.".to_string()))?;

        if !vehicle.is_owned_by(user_id) {
            return Err(AppError::Forbidden(
                "Not authorized to access this vehicle.".to_string(),
            ));
        }
        Ok(vehicle)
    }

    /// Stores the record and moves its workshop to the front of the vehicle history.
    pub async fn create(
        &self,
        vehicle_id: Uuid,
        user_id: Uuid,
        request: CreateServiceRequest,
    ) -> AppResult<ServiceResponse> {
        validate_request(&request)?;
        self.load_owned_vehicle(vehicle_id, user_id).await?;

        let center_name = request.service_center.name.trim().to_string();
        let center_address = request.service_center.address.trim().to_string();

        let now = Utc::now();
        let record = ServiceRecord {
            id: Uuid::new_v4(),
            vehicle_id,
            service_date: request.service_date,
            description: request.description.trim().to_string(),
            cost: request.cost,
            mileage: request.mileage,
            next_service_date: request.next_service_date,
            service_type: request.service_type,
            service_center_name: center_name.clone(),
            service_center_address: center_address.clone(),
            created_at: now,
            updated_at: now,
        };
        let saved = self.record_service(&record).await?;

        info!(
            "🔧 {} recorded for vehicle {} at {}",
            saved.service_type, vehicle_id, center_name
        );
        Ok(saved.into())
    }

    /// Inserts the record and bumps the vehicle's center history in one
    /// transaction. Ownership and field checks are the caller's job.
    pub async fn record_service(&self, record: &ServiceRecord) -> AppResult<ServiceRecord> {
        let mut tx = self.pool.begin().await?;

        let mut history =
            VehicleRepository::lock_service_center_history(&mut *tx, record.vehicle_id).await?;
        history.record_usage(
            &record.service_center_name,
            &record.service_center_address,
            record.created_at,
        );
        VehicleRepository::update_service_center_history(&mut *tx, record.vehicle_id, &history)
            .await?;

        let saved = ServiceRepository::create(&mut *tx, record).await?;
        tx.commit().await?;

        Ok(saved)
    }

    /// Newest service first
    pub async fn list(&self, vehicle_id: Uuid, user_id: Uuid) -> AppResult<Vec<ServiceResponse>> {
        self.load_owned_vehicle(vehicle_id, user_id).await?;
        let records = self.repository.find_by_vehicle(vehicle_id).await?;
        Ok(records.into_iter().map(ServiceResponse::from).collect())
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<()> {
        let record = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Service record", &id.to_string()))?;

        self.load_owned_vehicle(record.vehicle_id, user_id).await?;
        self.repository.delete(id).await?;

        info!("🗑️  Service record {} deleted", id);
        Ok(())
    }
}
