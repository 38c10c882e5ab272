//! Modelo de Booking
//!
//! Una reserva ocupa un vehículo durante `[start_time, end_time)`. El fin
//! siempre se deriva de la duración estimada del viaje y nunca se fija
//! de forma independiente.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use crate::scheduling::TimeWindow;

/// Estado de la reserva - mapea al ENUM booking_status
///
/// `Completed` está reservado; ninguna operación actual transiciona a él.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Active,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Solo las reservas activas bloquean el vehículo
    pub fn blocks_vehicle(&self) -> bool {
        matches!(self, BookingStatus::Active)
    }
}

/// Booking principal - mapea a la tabla bookings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub customer_id: String,
    pub from_pincode: String,
    pub to_pincode: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub estimated_ride_duration_hours: i32,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn window(&self) -> TimeWindow {
        TimeWindow {
            start: self.start_time,
            end: self.end_time,
        }
    }

    /// Reserva activa cuya ventana se solapa con `window`
    pub fn conflicts_with(&self, window: &TimeWindow) -> bool {
        self.status.blocks_vehicle() && self.window().overlaps(window)
    }
}

/// Datos de una reserva nueva, con la ventana ya calculada
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub vehicle_id: Uuid,
    pub customer_id: String,
    pub from_pincode: String,
    pub to_pincode: String,
    pub window: TimeWindow,
    pub estimated_ride_duration_hours: i32,
}

impl NewBooking {
    /// Construir el registro persistible en estado `active`
    pub fn into_booking(self, created_at: DateTime<Utc>) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            vehicle_id: self.vehicle_id,
            customer_id: self.customer_id,
            from_pincode: self.from_pincode,
            to_pincode: self.to_pincode,
            start_time: self.window.start,
            end_time: self.window.end,
            estimated_ride_duration_hours: self.estimated_ride_duration_hours,
            status: BookingStatus::Active,
            created_at,
        }
    }
}

/// Resultado de una inserción condicionada a que la ventana esté libre
#[derive(Debug, Clone, PartialEq)]
pub enum BookingInsert {
    Created(Booking),
    Overlap,
    VehicleMissing,
}
