//! Repositorios de persistencia
//!
//! Los servicios dependen de estos traits, nunca de una conexión global.
//! Hay dos implementaciones: PostgreSQL (`sqlx`) y una en memoria usada por
//! los tests y por `STORAGE_BACKEND=memory`.

pub mod booking_repository;
pub mod memory;
pub mod vehicle_repository;

pub use booking_repository::PgBookingRepository;
pub use memory::MemoryStore;
pub use vehicle_repository::PgVehicleRepository;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Booking, BookingInsert, NewBooking, NewVehicle, Vehicle, VehicleDeletion};
use crate::scheduling::TimeWindow;
use crate::utils::errors::AppResult;

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    /// Persistir un vehículo nuevo
    async fn create(&self, vehicle: NewVehicle) -> AppResult<Vehicle>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>>;

    /// Buscar varios vehículos por id (orden no garantizado)
    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Vehicle>>;

    /// Todos los vehículos, más recientes primero
    async fn list(&self) -> AppResult<Vec<Vehicle>>;

    /// Vehículos con `capacity_kg >= min_capacity`, más recientes primero
    async fn find_by_capacity_at_least(&self, min_capacity: f64) -> AppResult<Vec<Vehicle>>;

    /// Borrar el vehículo solo si no tiene reservas con `end_time >= now`.
    /// La comprobación y el borrado son atómicos respecto a `insert_if_free`.
    async fn delete_if_idle(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<VehicleDeletion>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Reservas activas del vehículo que se solapan con `window`
    async fn find_overlapping(&self, vehicle_id: Uuid, window: TimeWindow) -> AppResult<Vec<Booking>>;

    /// Igual que `find_overlapping` pero para varios vehículos en una sola consulta
    async fn find_overlapping_for_many(
        &self,
        vehicle_ids: &[Uuid],
        window: TimeWindow,
    ) -> AppResult<Vec<Booking>>;

    /// Insertar la reserva si el vehículo existe y la ventana sigue libre.
    /// La re-verificación y la inserción se confirman juntas.
    async fn insert_if_free(&self, booking: NewBooking) -> AppResult<BookingInsert>;

    /// Reservas más recientes primero
    async fn list_recent(&self, limit: i64) -> AppResult<Vec<Booking>>;

    /// Borrado físico; devuelve la reserva eliminada si existía
    async fn delete(&self, id: Uuid) -> AppResult<Option<Booking>>;

    /// Alguna reserva del vehículo (cualquier estado) termina en `now` o después
    async fn has_live_booking(&self, vehicle_id: Uuid, now: DateTime<Utc>) -> AppResult<bool>;
}
