use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::Vehicle;
use crate::utils::errors::{bad_request_error, AppResult};
use crate::utils::validation::validate_datetime;

// Request para registrar un vehículo
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    #[validate(length(min = 1, message = "Vehicle name is required"))]
    pub name: String,

    pub capacity_kg: f64,

    #[validate(range(min = 1, message = "Tyres must be greater than 0"))]
    pub tyres: i32,
}

// Response de vehículo
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VehicleResponse {
    pub id: Uuid,
    pub name: String,
    pub capacity_kg: f64,
    pub tyres: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            name: vehicle.name,
            capacity_kg: vehicle.capacity_kg,
            tyres: vehicle.tyres,
            created_at: vehicle.created_at,
        }
    }
}

// Datos del vehículo incrustados en una reserva
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSummary {
    pub id: Uuid,
    pub name: String,
    pub capacity_kg: f64,
    pub tyres: i32,
}

impl From<Vehicle> for VehicleSummary {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            name: vehicle.name,
            capacity_kg: vehicle.capacity_kg,
            tyres: vehicle.tyres,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VehicleEnvelope {
    pub message: String,
    pub vehicle: VehicleResponse,
}

#[derive(Debug, Serialize)]
pub struct VehicleListResponse {
    pub vehicles: Vec<VehicleResponse>,
}

// Query de GET /vehicles/available; todo llega como texto y se valida aquí
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub capacity_required: Option<String>,
    pub from_pincode: Option<String>,
    pub to_pincode: Option<String>,
    pub start_time: Option<String>,
}

/// Parámetros de búsqueda ya tipados
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityParams {
    pub capacity_required: i64,
    pub from_pincode: String,
    pub to_pincode: String,
    pub start_time: DateTime<Utc>,
}

fn required(value: Option<String>, field: &str) -> AppResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| bad_request_error(&format!("{} is required", field)))
}

impl AvailabilityQuery {
    pub fn parse(self) -> AppResult<AvailabilityParams> {
        let capacity_raw = required(self.capacity_required, "capacityRequired")?;
        let from_pincode = required(self.from_pincode, "fromPincode")?;
        let to_pincode = required(self.to_pincode, "toPincode")?;
        let start_raw = required(self.start_time, "startTime")?;

        let capacity_required = capacity_raw
            .parse::<i64>()
            .ok()
            .filter(|c| *c > 0)
            .ok_or_else(|| bad_request_error("capacityRequired must be a positive integer"))?;
        let start_time = validate_datetime(&start_raw)
            .map_err(|_| bad_request_error("startTime must be an ISO-8601 timestamp"))?;

        Ok(AvailabilityParams {
            capacity_required,
            from_pincode,
            to_pincode,
            start_time,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub estimated_ride_duration_hours: i64,
    pub available: Vec<VehicleResponse>,
}
