//! Servicio de reservas
//!
//! `book` es la única operación sensible a la concurrencia del sistema:
//! la re-verificación de solapamiento y la inserción se ejecutan dentro de
//! la sección crítica del vehículo, y el store vuelve a comprobar dentro
//! de su propia transacción antes de confirmar.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{Booking, BookingInsert, NewBooking, Vehicle};
use crate::repositories::{BookingRepository, VehicleRepository};
use crate::scheduling::{compute_end_time, estimate_duration_hours, TimeWindow};
use crate::services::vehicle_locks::VehicleLocks;
use crate::utils::errors::{not_found_error, validation_error, AppError, AppResult};
use crate::utils::validation::validate_not_empty;

/// Máximo de reservas devueltas por `list`
pub const MAX_BOOKING_LIST_LIMIT: i64 = 25;

const ALREADY_BOOKED: &str = "Vehicle is already booked in that time window";

/// Reserva junto con los datos de presentación de su vehículo
///
/// `vehicle` es `None` si el vehículo ya no existe o no pudo cargarse.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDetails {
    pub booking: Booking,
    pub vehicle: Option<Vehicle>,
}

#[derive(Clone)]
pub struct BookingService {
    vehicles: Arc<dyn VehicleRepository>,
    bookings: Arc<dyn BookingRepository>,
    locks: VehicleLocks,
}

impl BookingService {
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

    /// Reservar un vehículo a partir de `start_time`
    pub async fn book(
        &self,
        vehicle_id: Uuid,
        customer_id: &str,
        from_pincode: &str,
        to_pincode: &str,
        start_time: DateTime<Utc>,
    ) -> AppResult<BookingDetails> {
        validate_not_empty(customer_id)
            .map_err(|_| validation_error("customerId", "Customer ID is required"))?;
        validate_not_empty(from_pincode)
            .map_err(|_| validation_error("fromPincode", "From pincode is required"))?;
        validate_not_empty(to_pincode)
            .map_err(|_| validation_error("toPincode", "To pincode is required"))?;

        let _guard = self.locks.acquire(vehicle_id).await;

        let vehicle = self
            .vehicles
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &vehicle_id.to_string()))?;

        // La duración solo se calcula para vehículos existentes
        let hours = estimate_duration_hours(from_pincode, to_pincode)?;
        let end_time = compute_end_time(start_time, from_pincode, to_pincode)?;
        let window = TimeWindow::new(start_time, end_time)
            .ok_or_else(|| AppError::Internal("Computed end time precedes start time".into()))?;

        // Re-verificación inmediatamente antes de confirmar
        let overlapping = self.bookings.find_overlapping(vehicle_id, window).await?;
        if !overlapping.is_empty() {
            warn!(
                "⛔ Reserva rechazada: vehículo {} ocupado en [{} - {}) ({} solapes)",
                vehicle_id,
                window.start,
                window.end,
                overlapping.len()
            );
            return Err(AppError::Conflict(ALREADY_BOOKED.to_string()));
        }

        let new_booking = NewBooking {
            vehicle_id,
            customer_id: customer_id.trim().to_string(),
            from_pincode: from_pincode.trim().to_string(),
            to_pincode: to_pincode.trim().to_string(),
            window,
            estimated_ride_duration_hours: i32::try_from(hours)
                .map_err(|_| AppError::Internal(format!("Duration out of range: {}", hours)))?,
        };

        match self.bookings.insert_if_free(new_booking).await? {
            BookingInsert::Created(booking) => {
                info!(
                    "📅 Reserva creada: {} vehículo {} [{} - {}) cliente {}",
                    booking.id, vehicle_id, booking.start_time, booking.end_time, booking.customer_id
                );
                Ok(BookingDetails {
                    booking,
                    vehicle: Some(vehicle),
                })
            }
            BookingInsert::Overlap => {
                warn!("⛔ El store rechazó la reserva solapada del vehículo {}", vehicle_id);
                Err(AppError::Conflict(ALREADY_BOOKED.to_string()))
            }
            BookingInsert::VehicleMissing => Err(not_found_error("Vehicle", &vehicle_id.to_string())),
        }
    }

    /// Cancelar (borrar) una reserva; la ventana queda libre de inmediato
    pub async fn cancel(&self, booking_id: Uuid) -> AppResult<Booking> {
        let booking = self
            .bookings
            .delete(booking_id)
            .await?
            .ok_or_else(|| not_found_error("Booking", &booking_id.to_string()))?;

        info!(
            "🗑️ Reserva cancelada: {} vehículo {} [{} - {})",
            booking.id, booking.vehicle_id, booking.start_time, booking.end_time
        );
        Ok(booking)
    }

    /// Reservas más recientes primero, con su vehículo cuando se puede cargar
    pub async fn list(&self, limit: i64) -> AppResult<Vec<BookingDetails>> {
        let limit = limit.clamp(1, MAX_BOOKING_LIST_LIMIT);
        let bookings = self.bookings.list_recent(limit).await?;

        let mut vehicle_ids: Vec<Uuid> = bookings.iter().map(|b| b.vehicle_id).collect();
        vehicle_ids.sort_unstable();
        vehicle_ids.dedup();

        // El enriquecimiento es best-effort: un fallo no aborta el listado
        let vehicles: HashMap<Uuid, Vehicle> = match self.vehicles.find_by_ids(&vehicle_ids).await {
            Ok(found) => found.into_iter().map(|v| (v.id, v)).collect(),
            Err(e) => {
                warn!("⚠️ No se pudieron cargar los vehículos de las reservas: {}", e);
                HashMap::new()
            }
        };

        Ok(bookings
            .into_iter()
            .map(|booking| {
                let vehicle = vehicles.get(&booking.vehicle_id).cloned();
                BookingDetails { booking, vehicle }
            })
            .collect())
    }
}
