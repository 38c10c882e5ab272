//! DTOs de la API
//!
//! Requests y responses HTTP. Los nombres de campo en JSON van en camelCase.

pub mod booking_dto;
pub mod vehicle_dto;
