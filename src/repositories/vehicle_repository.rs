use crate::models::vehicle::{ServiceCenterHistory, Vehicle};
use crate::utils::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Vehicle joined with its owner's email, as the reminder sweep needs it
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VehicleWithOwner {
    #[sqlx(flatten)]
    pub vehicle: Vehicle,
    pub owner_email: String,
}

pub struct VehicleRepository {
    pool: PgPool,
}

fn map_registration_conflict(e: sqlx::Error) -> AppError {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() => AppError::Conflict(
            "A vehicle with this registration number already exists.".to_string(),
        ),
        _ => AppError::Database(e),
    }
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        let result = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (
                id, user_id, vehicle_name, registration_number, model_year,
                service_center_history, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(vehicle.id)
        .bind(vehicle.user_id)
        .bind(&vehicle.vehicle_name)
        .bind(&vehicle.registration_number)
        .bind(vehicle.model_year)
        .bind(&vehicle.service_center_history)
        .bind(vehicle.created_at)
        .bind(vehicle.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_registration_conflict)?;

        Ok(result)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    /// Vehicles with owner email; all of them when `user_id` is `None`.
    pub async fn find_with_owner(&self, user_id: Option<Uuid>) -> AppResult<Vec<VehicleWithOwner>> {
        let vehicles = sqlx::query_as::<_, VehicleWithOwner>(
            r#"
            SELECT v.*, u.email AS owner_email
            FROM vehicles v
            INNER JOIN users u ON u.id = v.user_id
            WHERE $1::uuid IS NULL OR v.user_id = $1
            ORDER BY v.created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    pub async fn registration_exists(
        &self,
        registration_number: &str,
        excluding: Option<Uuid>,
    ) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM vehicles
                WHERE registration_number = $1 AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(registration_number)
        .bind(excluding)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn update_details(
        &self,
        id: Uuid,
        vehicle_name: &str,
        registration_number: &str,
        model_year: Option<i32>,
    ) -> AppResult<Vehicle> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET vehicle_name = $2, registration_number = $3, model_year = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(vehicle_name)
        .bind(registration_number)
        .bind(model_year)
        .fetch_one(&self.pool)
        .await
        .map_err(map_registration_conflict)?;

        Ok(vehicle)
    }

    /// Set both preferred center columns, or clear them with `None`
    pub async fn set_preferred_center(
        &self,
        id: Uuid,
        center: Option<(&str, &str)>,
    ) -> AppResult<Vehicle> {
        let (name, address) = match center {
            Some((name, address)) => (Some(name), Some(address)),
            None => (None, None),
        };

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET preferred_center_name = $2, preferred_center_address = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(address)
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    /// Current history, row-locked until the surrounding transaction ends
    pub async fn lock_service_center_history(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> AppResult<ServiceCenterHistory> {
        let (history,): (Json<ServiceCenterHistory>,) = sqlx::query_as(
            "SELECT service_center_history FROM vehicles WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_one(conn)
        .await?;

        Ok(history.0)
    }

    pub async fn update_service_center_history(
        conn: &mut PgConnection,
        id: Uuid,
        history: &ServiceCenterHistory,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE vehicles SET service_center_history = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(Json(history))
        .execute(conn)
        .await?;

        Ok(())
    }

    pub async fn set_last_reminder_sent_date(
        &self,
        id: Uuid,
        date: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query("UPDATE vehicles SET last_reminder_sent_date = $2 WHERE id = $1")
            .bind(id)
            .bind(date)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
