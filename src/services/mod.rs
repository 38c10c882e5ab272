//! Services module
//!
//! Este módulo contiene la lógica de negocio de la flota: registro de
//! vehículos, búsqueda de disponibilidad y reservas. Los servicios reciben
//! los repositorios por inyección y nunca acceden a una conexión global.

pub mod availability_service;
pub mod booking_service;
pub mod vehicle_locks;
pub mod vehicle_service;

pub use availability_service::{Availability, AvailabilityService};
pub use booking_service::{BookingDetails, BookingService, MAX_BOOKING_LIST_LIMIT};
pub use vehicle_locks::VehicleLocks;
pub use vehicle_service::VehicleService;
