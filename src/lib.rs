//! Fleet Booking - reservas B2B de vehículos
//!
//! Registro de vehículos, búsqueda de disponibilidad por capacidad y
//! ventana de tiempo, y reservas sin doble asignación.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod scheduling;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_app_router;
pub use state::AppState;
