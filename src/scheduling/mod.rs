//! Lógica de planificación
//!
//! Funciones puras sin dependencias: estimación de duración de viaje y
//! detección de solapamiento entre ventanas de tiempo.

pub mod ride_duration;
pub mod time_window;

pub use ride_duration::{compute_end_time, estimate_duration_hours, DurationError};
pub use time_window::{overlaps, TimeWindow};
