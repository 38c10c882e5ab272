use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::VehicleRepository;
use crate::models::{NewVehicle, Vehicle, VehicleDeletion};
use crate::utils::errors::AppResult;

pub struct PgVehicleRepository {
    pool: PgPool,
}

impl PgVehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VehicleRepository for PgVehicleRepository {
    async fn create(&self, vehicle: NewVehicle) -> AppResult<Vehicle> {
        let vehicle = vehicle.into_vehicle(Utc::now());

        let created = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (id, name, capacity_kg, tyres, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#
        )
        .bind(vehicle.id)
        .bind(&vehicle.name)
        .bind(vehicle.capacity_kg)
        .bind(vehicle.tyres)
        .bind(vehicle.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Vehicle>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let vehicles = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(vehicles)
    }

    async fn list(&self) -> AppResult<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles ORDER BY created_at DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    async fn find_by_capacity_at_least(&self, min_capacity: f64) -> AppResult<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE capacity_kg >= $1 ORDER BY created_at DESC"
        )
        .bind(min_capacity)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    async fn delete_if_idle(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<VehicleDeletion> {
        let mut tx = self.pool.begin().await?;

        // Bloquea la fila frente a inserciones concurrentes de reservas
        let locked: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM vehicles WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        if locked.is_none() {
            tx.rollback().await?;
            return Ok(VehicleDeletion::NotFound);
        }

        let (has_live,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM bookings WHERE vehicle_id = $1 AND end_time >= $2)"
        )
        .bind(id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        if has_live {
            tx.rollback().await?;
            return Ok(VehicleDeletion::HasLiveBookings);
        }

        let deleted = sqlx::query_as::<_, Vehicle>("DELETE FROM vehicles WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(VehicleDeletion::Deleted(deleted))
    }
}
