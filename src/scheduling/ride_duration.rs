//! Estimación de duración de viaje
//!
//! Heurística determinista basada en los códigos postales (pincodes):
//! `horas = |destino - origen| % 24`. Es un sustituto simple de un servicio
//! real de rutas; cualquier par de códigos produce un valor en `[0, 24)`.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

/// Horas máximas (exclusivas) que puede devolver la heurística
pub const HOURS_PER_DAY: i64 = 24;

/// Errores del estimador de duración
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    #[error("Invalid location code '{0}': pincodes must be numeric")]
    InvalidLocationCode(String),
}

fn parse_location_code(code: &str) -> Result<i64, DurationError> {
    code.trim()
        .parse::<i64>()
        .map_err(|_| DurationError::InvalidLocationCode(code.to_string()))
}

/// Estimar la duración del viaje en horas entre dos códigos de ubicación
pub fn estimate_duration_hours(from_code: &str, to_code: &str) -> Result<i64, DurationError> {
    let from = parse_location_code(from_code)?;
    let to = parse_location_code(to_code)?;

    // i128 evita overflow con códigos extremos
    let diff = (i128::from(to) - i128::from(from)).abs();
    Ok((diff % i128::from(HOURS_PER_DAY)) as i64)
}

/// Calcular la hora de llegada: `start + estimate_duration_hours(from, to)`
pub fn compute_end_time(
    start: DateTime<Utc>,
    from_code: &str,
    to_code: &str,
) -> Result<DateTime<Utc>, DurationError> {
    let hours = estimate_duration_hours(from_code, to_code)?;
    Ok(start + Duration::hours(hours))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_estimate_duration_reference_pincodes() {
        // |410099 - 474009| = 63910, 63910 % 24 = 22
        assert_eq!(estimate_duration_hours("474009", "410099"), Ok(22));
    }

    #[test]
    fn test_estimate_duration_is_symmetric_and_bounded() {
        let codes = ["0", "1", "23", "24", "25", "110001", "474009", "-17", "999999"];
        for a in codes {
            for b in codes {
                let ab = estimate_duration_hours(a, b).unwrap();
                let ba = estimate_duration_hours(b, a).unwrap();
                assert_eq!(ab, ba, "asimetría entre {} y {}", a, b);
                assert!((0..HOURS_PER_DAY).contains(&ab));
            }
        }
    }

    #[test]
    fn test_same_code_is_zero_hours() {
        assert_eq!(estimate_duration_hours("560001", "560001"), Ok(0));
        assert_eq!(estimate_duration_hours("100", "124"), Ok(0));
    }

    #[test]
    fn test_non_numeric_code_is_rejected() {
        assert_eq!(
            estimate_duration_hours("ABC", "110001"),
            Err(DurationError::InvalidLocationCode("ABC".to_string()))
        );
        assert!(estimate_duration_hours("110001", "").is_err());
        assert!(estimate_duration_hours("11.5", "110001").is_err());
    }

    #[test]
    fn test_extreme_codes_do_not_overflow() {
        let max = i64::MAX.to_string();
        let min = i64::MIN.to_string();
        let hours = estimate_duration_hours(&min, &max).unwrap();
        assert!((0..HOURS_PER_DAY).contains(&hours));
    }

    #[test]
    fn test_compute_end_time() {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        let end = compute_end_time(start, "100", "105").unwrap();
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 3, 1, 13, 0, 0).unwrap());
    }
}
