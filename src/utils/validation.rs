//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos,
//! conversión de tipos y el extractor `ValidatedJson` que aplica las
//! reglas de `validator` antes de que la petición llegue a los servicios.

use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Query, Request,
    },
    http::request::Parts,
    Json,
};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::utils::errors::AppError;

/// Validar y convertir string a UUID
pub fn validate_uuid(value: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(value.trim()).map_err(|_| {
        let mut error = ValidationError::new("uuid");
        error.add_param("value".into(), &value.to_string());
        error
    })
}

/// Validar y convertir string a datetime (ISO-8601 / RFC3339)
///
/// Sin offset (`2030-01-01T10:00:00`) se interpreta como UTC.
pub fn validate_datetime(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    let trimmed = value.trim();
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|naive| Utc.from_utc_datetime(&naive))
        })
        .map_err(|_| {
            let mut error = ValidationError::new("datetime");
            error.add_param("value".into(), &value.to_string());
            error.add_param("format".into(), &"ISO-8601".to_string());
            error
        })
}

/// Variante de `validate_datetime` para `#[validate(custom = ...)]`
pub fn validate_iso_datetime(value: &str) -> Result<(), ValidationError> {
    validate_datetime(value).map(|_| ())
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value <= T::zero() {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Capacidad en kg: número finito y mayor que cero
pub fn validate_capacity_kg(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        let mut error = ValidationError::new("finite");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    validate_positive(value)
}

/// JSON deserializado y validado con `validator`
///
/// Los errores de deserialización (cuerpo vacío, tipos incorrectos, campos
/// ausentes) se devuelven como `AppError::BadRequest` en lugar del rechazo
/// en texto plano de axum.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| AppError::BadRequest(rejection.body_text()))?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Query string deserializado y validado con `validator`
///
/// Igual que `ValidatedJson`: parámetros duplicados o con tipo incorrecto
/// producen el envelope JSON de `VALIDATION_ERROR`, no texto plano.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: QueryRejection| AppError::BadRequest(rejection.body_text()))?;
        value.validate()?;
        Ok(ValidatedQuery(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_uuid() {
        let valid_uuid = "550e8400-e29b-41d4-a716-446655440000";
        assert!(validate_uuid(valid_uuid).is_ok());

        let invalid_uuid = "invalid-uuid";
        assert!(validate_uuid(invalid_uuid).is_err());
    }

    #[test]
    fn test_validate_datetime() {
        assert!(validate_datetime("2025-08-18T10:00:00Z").is_ok());
        assert!(validate_datetime("2025-08-18T10:00:00.000+05:30").is_ok());
        assert!(validate_datetime("2025-08-18").is_err());
        assert!(validate_datetime("not a date").is_err());
    }

    #[test]
    fn test_validate_datetime_without_offset_is_utc() {
        let parsed = validate_datetime("2030-01-01T10:00:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2030-01-01T10:00:00+00:00");
        assert!(validate_datetime("2030-01-01T10:00:00.250").is_ok());
        assert!(validate_datetime("2030-01-01 10:00").is_err());
    }

    #[test]
    fn test_validate_datetime_normalizes_to_utc() {
        let parsed = validate_datetime("2025-08-18T15:30:00+05:30").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2025-08-18T10:00:00+00:00");
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("Tata 407").is_ok());
        assert!(validate_not_empty("").is_err());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive(5).is_ok());
        assert!(validate_positive(0).is_err());
        assert!(validate_positive(-5).is_err());
    }

    #[test]
    fn test_validate_capacity_kg() {
        assert!(validate_capacity_kg(500.0).is_ok());
        assert!(validate_capacity_kg(0.5).is_ok());
        assert!(validate_capacity_kg(0.0).is_err());
        assert!(validate_capacity_kg(-1.0).is_err());
        assert!(validate_capacity_kg(f64::NAN).is_err());
    }
}
