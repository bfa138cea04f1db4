use crate::models::service::ServiceRecord;
use crate::utils::errors::AppResult;
use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

pub struct ServiceRepository {
    pool: PgPool,
}

impl ServiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs on the caller's connection so it can share a transaction
    pub async fn create(conn: &mut PgConnection, record: &ServiceRecord) -> AppResult<ServiceRecord> {
        let result = sqlx::query_as::<_, ServiceRecord>(
            r#"
            INSERT INTO services (
                id, vehicle_id, service_date, description, cost, mileage,
                next_service_date, service_type, service_center_name,
                service_center_address, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(record.id)
        .bind(record.vehicle_id)
        .bind(record.service_date)
        .bind(&record.description)
        .bind(record.cost)
        .bind(record.mileage)
        .bind(record.next_service_date)
        .bind(record.service_type.as_str())
        .bind(&record.service_center_name)
        .bind(&record.service_center_address)
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(conn)
        .await?;

        Ok(result)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ServiceRecord>> {
        let result = sqlx::query_as::<_, ServiceRecord>("SELECT * FROM services WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(result)
    }

    /// Newest service date first
    pub async fn find_by_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<ServiceRecord>> {
        let result = sqlx::query_as::<_, ServiceRecord>(
            "SELECT * FROM services WHERE vehicle_id = $1 ORDER BY service_date DESC",
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(result)
    }

    /// Records for many vehicles in one query, grouped by vehicle
    pub async fn find_by_vehicles(
        &self,
        vehicle_ids: &[Uuid],
    ) -> AppResult<HashMap<Uuid, Vec<ServiceRecord>>> {
        let records = sqlx::query_as::<_, ServiceRecord>(
            "SELECT * FROM services WHERE vehicle_id = ANY($1) ORDER BY service_date DESC",
        )
        .bind(vehicle_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<ServiceRecord>> = HashMap::new();
        for record in records {
            grouped.entry(record.vehicle_id).or_default().push(record);
        }
        Ok(grouped)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
