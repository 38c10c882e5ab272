//! Registro de vehículos
//!
//! Alta, listado y baja de vehículos. La baja se bloquea mientras el
//! vehículo tenga alguna reserva que no haya terminado.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{NewVehicle, Vehicle, VehicleDeletion};
use crate::repositories::{BookingRepository, VehicleRepository};
use crate::services::vehicle_locks::VehicleLocks;
use crate::utils::errors::{not_found_error, validation_error, AppError, AppResult};
use crate::utils::validation::{validate_capacity_kg, validate_not_empty, validate_positive};

#[derive(Clone)]
pub struct VehicleService {
    vehicles: Arc<dyn VehicleRepository>,
    bookings: Arc<dyn BookingRepository>,
    locks: VehicleLocks,
}

impl VehicleService {
    pub fn new(
        vehicles: Arc<dyn VehicleRepository>,
        bookings: Arc<dyn BookingRepository>,
        locks: VehicleLocks,
    ) -> Self {
        Self {
            vehicles,
            bookings,
            locks,
        }
    }

    /// Registrar un vehículo nuevo
    pub async fn register(&self, name: &str, capacity_kg: f64, tyres: i32) -> AppResult<Vehicle> {
        validate_not_empty(name).map_err(|_| validation_error("name", "Vehicle name is required"))?;
        validate_capacity_kg(capacity_kg)
            .map_err(|_| validation_error("capacityKg", "Capacity must be greater than 0"))?;
        validate_positive(tyres)
            .map_err(|_| validation_error("tyres", "Tyres must be greater than 0"))?;

        let vehicle = self
            .vehicles
            .create(NewVehicle {
                name: name.trim().to_string(),
                capacity_kg,
                tyres,
            })
            .await?;

        info!(
            "🚚 Vehículo registrado: {} ({}, {} kg, {} ruedas)",
            vehicle.id, vehicle.name, vehicle.capacity_kg, vehicle.tyres
        );
        Ok(vehicle)
    }

    /// Listar todos los vehículos, más recientes primero
    pub async fn list(&self) -> AppResult<Vec<Vehicle>> {
        self.vehicles.list().await
    }

    /// Eliminar un vehículo si no tiene reservas vigentes o futuras
    pub async fn remove(&self, id: Uuid) -> AppResult<Vehicle> {
        let _guard = self.locks.acquire(id).await;
        let now = Utc::now();

        if self.vehicles.find_by_id(id).await?.is_none() {
            return Err(not_found_error("Vehicle", &id.to_string()));
        }

        // Comprobación conservadora: cualquier estado, end_time >= now
        if self.bookings.has_live_booking(id, now).await? {
            warn!("⛔ Baja rechazada, el vehículo {} tiene reservas vigentes", id);
            return Err(AppError::Conflict(
                "Vehicle has active/future bookings".to_string(),
            ));
        }

        match self.vehicles.delete_if_idle(id, now).await? {
            VehicleDeletion::Deleted(vehicle) => {
                info!("🗑️ Vehículo eliminado: {} ({})", vehicle.id, vehicle.name);
                Ok(vehicle)
            }
            VehicleDeletion::NotFound => Err(not_found_error("Vehicle", &id.to_string())),
            VehicleDeletion::HasLiveBookings => Err(AppError::Conflict(
                "Vehicle has active/future bookings".to_string(),
            )),
        }
    }
}
