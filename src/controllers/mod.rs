//! Controllers
//!
//! Traducen entre DTOs HTTP y servicios de dominio.

pub mod booking_controller;
pub mod vehicle_controller;

use uuid::Uuid;

use crate::utils::errors::{not_found_error, AppResult};
use crate::utils::validation::validate_uuid;

/// Un id que no es un UUID válido no puede existir: se trata como no encontrado
pub(crate) fn parse_id(raw: &str, resource: &str) -> AppResult<Uuid> {
    validate_uuid(raw).map_err(|_| not_found_error(resource, raw))
}
