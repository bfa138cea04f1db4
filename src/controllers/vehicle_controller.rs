use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::vehicle_dto::{
    PreferredCenterResponse, SetPreferredCenterRequest, VehicleRequest, VehicleResponse,
};
use crate::models::vehicle::Vehicle;
use crate::repositories::service_repository::ServiceRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::next_service::resolve_next_service_date;
use crate::utils::errors::{conflict_error, validation_error, AppError, AppResult};

pub struct VehicleController {
    repository: VehicleRepository,
    services: ServiceRepository,
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleRepository::new(pool.clone()),
            services: ServiceRepository::new(pool),
        }
    }

    /// Vehicle owned by `user_id`, or not-found / forbidden
    async fn load_owned(&self, id: Uuid, user_id: Uuid) -> AppResult<Vehicle> {
        let vehicle = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found.".to_string()))?;

        if !vehicle.is_owned_by(user_id) {
            return Err(AppError::Forbidden(
                "Not authorized to access this vehicle.".to_string(),
            ));
        }
        Ok(vehicle)
    }

    async fn to_response(&self, vehicle: Vehicle) -> AppResult<VehicleResponse> {
        let records = self.services.find_by_vehicle(vehicle.id).await?;
        let next = resolve_next_service_date(&records, Utc::now());
        Ok(VehicleResponse::from_vehicle(vehicle, next))
    }

    pub async fn create(&self, user_id: Uuid, request: VehicleRequest) -> AppResult<VehicleResponse> {
        request.validate()?;
        let registration_number = request.registration_number.trim().to_string();

        if self.repository.registration_exists(&registration_number, None).await? {
            return Err(conflict_error("Vehicle", "registration number", &registration_number));
        }

        let vehicle = Vehicle::new(
            user_id,
            request.vehicle_name.trim().to_string(),
            registration_number,
            request.model_year,
        );
        let saved = self.repository.create(&vehicle).await?;

        info!("🚗 Vehicle {} created for user {}", saved.id, user_id);
        Ok(VehicleResponse::from_vehicle(saved, None))
    }

    pub async fn list(&self, user_id: Uuid) -> AppResult<Vec<VehicleResponse>> {
        let vehicles = self.repository.find_by_user(user_id).await?;
        let ids: Vec<Uuid> = vehicles.iter().map(|v| v.id).collect();
        let mut records = self.services.find_by_vehicles(&ids).await?;
        let now = Utc::now();

        Ok(vehicles
            .into_iter()
            .map(|vehicle| {
                let vehicle_records = records.remove(&vehicle.id).unwrap_or_default();
                let next = resolve_next_service_date(&vehicle_records, now);
                VehicleResponse::from_vehicle(vehicle, next)
            })
            .collect())
    }

    pub async fn get(&self, id: Uuid, user_id: Uuid) -> AppResult<VehicleResponse> {
        let vehicle = self.load_owned(id, user_id).await?;
        self.to_response(vehicle).await
    }

    /// Replaces name, registration and model year (absent year clears it)
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        request: VehicleRequest,
    ) -> AppResult<VehicleResponse> {
        request.validate()?;
        let registration_number = request.registration_number.trim().to_string();

        self.load_owned(id, user_id).await?;

        if self
            .repository
            .registration_exists(&registration_number, Some(id))
            .await?
        {
            return Err(conflict_error("Vehicle", "registration number", &registration_number));
        }

        let updated = self
            .repository
            .update_details(
                id,
                request.vehicle_name.trim(),
                &registration_number,
                request.model_year,
            )
            .await?;

        self.to_response(updated).await
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<()> {
        self.load_owned(id, user_id).await?;
        self.repository.delete(id).await?;
        info!("🗑️  Vehicle {} deleted", id);
        Ok(())
    }

    /// Both fields blank clears the preference; exactly one blank is rejected.
    pub async fn set_preferred_center(
        &self,
        user_id: Uuid,
        request: SetPreferredCenterRequest,
    ) -> AppResult<PreferredCenterResponse> {
        let vehicle_id = request
            .vehicle_id
            .ok_or_else(|| validation_error("vehicleId", "Vehicle ID is required"))?;

        let name = request.name.as_deref().map(str::trim).unwrap_or_default();
        let address = request.address.as_deref().map(str::trim).unwrap_or_default();

        let center = match (name.is_empty(), address.is_empty()) {
            (true, true) => None,
            (true, false) => {
                return Err(validation_error("name", "Service center name cannot be empty."))
            }
            (false, true) => {
                return Err(validation_error(
                    "address",
                    "Service center address cannot be empty.",
                ))
            }
            (false, false) => Some((name, address)),
        };

        let owned = self
            .repository
            .find_by_id(vehicle_id)
            .await?
            .filter(|vehicle| vehicle.is_owned_by(user_id));
        if owned.is_none() {
            return Err(AppError::NotFound(
                "Vehicle not found or not owned by user".to_string(),
            ));
        }

        let updated = self.repository.set_preferred_center(vehicle_id, center).await?;
        let message = if center.is_some() {
            "Preferred service center updated"
        } else {
            "Preferred service center removed"
        };

        Ok(PreferredCenterResponse {
            message: message.to_string(),
            preferred_service_center: updated.preferred_service_center(),
        })
    }
}
