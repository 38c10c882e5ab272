//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. Los repositorios se inyectan aquí una sola
//! vez; los servicios comparten el mismo mapa de locks por vehículo.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::{
    BookingRepository, MemoryStore, PgBookingRepository, PgVehicleRepository, VehicleRepository,
};
use crate::services::{AvailabilityService, BookingService, VehicleLocks, VehicleService};

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub vehicles: VehicleService,
    pub availability: AvailabilityService,
    pub bookings: BookingService,
}

impl AppState {
    pub fn new(
        config: EnvironmentConfig,
        vehicle_repo: Arc<dyn VehicleRepository>,
        booking_repo: Arc<dyn BookingRepository>,
    ) -> Self {
        let locks = VehicleLocks::new();
        Self {
            config,
            vehicles: VehicleService::new(vehicle_repo.clone(), booking_repo.clone(), locks.clone()),
            availability: AvailabilityService::new(vehicle_repo.clone(), booking_repo.clone()),
            bookings: BookingService::new(vehicle_repo, booking_repo, locks),
        }
    }

    /// Estado respaldado por PostgreSQL
    pub fn with_postgres(config: EnvironmentConfig, pool: PgPool) -> Self {
        Self::new(
            config,
            Arc::new(PgVehicleRepository::new(pool.clone())),
            Arc::new(PgBookingRepository::new(pool)),
        )
    }

    /// Estado respaldado por el store en memoria
    pub fn in_memory(config: EnvironmentConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(config, store.clone(), store)
    }
}
