//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean al schema
//! PostgreSQL (`migrations/`).

pub mod booking;
pub mod vehicle;

pub use booking::{Booking, BookingInsert, BookingStatus, NewBooking};
pub use vehicle::{NewVehicle, Vehicle, VehicleDeletion};
