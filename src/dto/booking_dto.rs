use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::vehicle_dto::VehicleSummary;
use crate::models::{Booking, BookingStatus};
use crate::services::BookingDetails;
use crate::utils::errors::{bad_request_error, AppResult};
use crate::utils::validation::validate_iso_datetime;

// Request para crear una reserva
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[validate(length(min = 1, message = "Vehicle ID is required"))]
    pub vehicle_id: String,

    #[validate(length(min = 1, message = "Customer ID is required"))]
    pub customer_id: String,

    #[validate(length(min = 1, message = "From pincode is required"))]
    pub from_pincode: String,

    #[validate(length(min = 1, message = "To pincode is required"))]
    pub to_pincode: String,

    #[validate(custom(function = "validate_iso_datetime", message = "Invalid start time format"))]
    pub start_time: String,
}

// Response de reserva; `vehicle` es null si el vehículo no está disponible
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
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
    pub vehicle: Option<VehicleSummary>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            vehicle_id: booking.vehicle_id,
            customer_id: booking.customer_id,
            from_pincode: booking.from_pincode,
            to_pincode: booking.to_pincode,
            start_time: booking.start_time,
            end_time: booking.end_time,
            estimated_ride_duration_hours: booking.estimated_ride_duration_hours,
            status: booking.status,
            created_at: booking.created_at,
            vehicle: None,
        }
    }
}

impl From<BookingDetails> for BookingResponse {
    fn from(details: BookingDetails) -> Self {
        Self {
            vehicle: details.vehicle.map(VehicleSummary::from),
            ..Self::from(details.booking)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookingEnvelope {
    pub message: String,
    pub booking: BookingResponse,
}

#[derive(Debug, Serialize)]
pub struct BookingListResponse {
    pub items: Vec<BookingResponse>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct BookingListQuery {
    pub limit: Option<String>,
}

impl BookingListQuery {
    /// Límite pedido, o `default` si no se indica
    pub fn limit_or(&self, default: i64) -> AppResult<i64> {
        match self.limit.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
            None => Ok(default),
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|l| *l > 0)
                .map(|l| l.min(default))
                .ok_or_else(|| bad_request_error("limit must be a positive integer")),
        }
    }
}
