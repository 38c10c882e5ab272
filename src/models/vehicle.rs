//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle tal como se persiste en la tabla
//! `vehicles`. Un vehículo es inmutable después de su registro; solo puede
//! eliminarse.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Vehicle principal - mapea a la tabla vehicles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    pub name: String,
    pub capacity_kg: f64,
    pub tyres: i32,
    pub created_at: DateTime<Utc>,
}

/// Datos ya validados para registrar un vehículo
#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub name: String,
    pub capacity_kg: f64,
    pub tyres: i32,
}

impl NewVehicle {
    /// Construir el registro persistible con id y fecha de creación nuevos
    pub fn into_vehicle(self, created_at: DateTime<Utc>) -> Vehicle {
        Vehicle {
            id: Uuid::new_v4(),
            name: self.name,
            capacity_kg: self.capacity_kg,
            tyres: self.tyres,
            created_at,
        }
    }
}

/// Resultado de un borrado condicionado a que no haya reservas vigentes
#[derive(Debug, Clone, PartialEq)]
pub enum VehicleDeletion {
    Deleted(Vehicle),
    NotFound,
    HasLiveBookings,
}
