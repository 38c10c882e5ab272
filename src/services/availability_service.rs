//! Búsqueda de disponibilidad
//!
//! Responde "¿qué vehículos con capacidad >= X están libres en la ventana
//! [start, start + duración)?". Solo lectura: no tiene efectos secundarios,
//! el resultado se vuelve a verificar al reservar.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::models::Vehicle;
use crate::repositories::{BookingRepository, VehicleRepository};
use crate::scheduling::{compute_end_time, estimate_duration_hours, TimeWindow};
use crate::utils::errors::{validation_error, AppError, AppResult};
use crate::utils::validation::validate_not_empty;

/// Resultado de una búsqueda de disponibilidad
#[derive(Debug, Clone, PartialEq)]
pub struct Availability {
    pub estimated_ride_duration_hours: i64,
    pub window: TimeWindow,
    pub available: Vec<Vehicle>,
}

#[derive(Clone)]
pub struct AvailabilityService {
    vehicles: Arc<dyn VehicleRepository>,
    bookings: Arc<dyn BookingRepository>,
}

impl AvailabilityService {
    pub fn new(vehicles: Arc<dyn VehicleRepository>, bookings: Arc<dyn BookingRepository>) -> Self {
        Self { vehicles, bookings }
    }

    pub async fn search(
        &self,
        capacity_required: i64,
        from_pincode: &str,
        to_pincode: &str,
        start_time: DateTime<Utc>,
    ) -> AppResult<Availability> {
        if capacity_required <= 0 {
            return Err(validation_error(
                "capacityRequired",
                "Capacity required must be a positive integer",
            ));
        }
        validate_not_empty(from_pincode)
            .map_err(|_| validation_error("fromPincode", "From pincode is required"))?;
        validate_not_empty(to_pincode)
            .map_err(|_| validation_error("toPincode", "To pincode is required"))?;

        let hours = estimate_duration_hours(from_pincode, to_pincode)?;
        let end_time = compute_end_time(start_time, from_pincode, to_pincode)?;
        let window = TimeWindow::new(start_time, end_time)
            .ok_or_else(|| AppError::Internal("Computed end time precedes start time".into()))?;

        let candidates = self
            .vehicles
            .find_by_capacity_at_least(capacity_required as f64)
            .await?;

        if candidates.is_empty() {
            debug!("🔍 Sin vehículos con capacidad >= {} kg", capacity_required);
            return Ok(Availability {
                estimated_ride_duration_hours: hours,
                window,
                available: Vec::new(),
            });
        }

        let candidate_ids: Vec<Uuid> = candidates.iter().map(|v| v.id).collect();
        let busy: HashSet<Uuid> = self
            .bookings
            .find_overlapping_for_many(&candidate_ids, window)
            .await?
            .into_iter()
            .map(|b| b.vehicle_id)
            .collect();

        let available: Vec<Vehicle> = candidates
            .into_iter()
            .filter(|v| !busy.contains(&v.id))
            .collect();

        debug!(
            "🔍 Disponibilidad {} kg [{} - {}): {} libres, {} ocupados",
            capacity_required,
            window.start,
            window.end,
            available.len(),
            busy.len()
        );

        Ok(Availability {
            estimated_ride_duration_hours: hours,
            window,
            available,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingInsert, NewBooking, NewVehicle};
    use crate::repositories::MemoryStore;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 5, 10, 6, 0, 0).unwrap()
    }

    async fn add_vehicle(store: &MemoryStore, name: &str, capacity_kg: f64) -> Vehicle {
        VehicleRepository::create(
            store,
            NewVehicle {
                name: name.into(),
                capacity_kg,
                tyres: 6,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_search_filters_by_capacity_and_overlap() {
        let store = Arc::new(MemoryStore::new());
        let small = add_vehicle(&store, "small", 100.0).await;
        let busy = add_vehicle(&store, "busy", 600.0).await;
        let free = add_vehicle(&store, "free", 600.0).await;

        let outcome = store
            .insert_if_free(NewBooking {
                vehicle_id: busy.id,
                customer_id: "c".into(),
                from_pincode: "0".into(),
                to_pincode: "3".into(),
                window: TimeWindow { start: start() + Duration::hours(1), end: start() + Duration::hours(4) },
                estimated_ride_duration_hours: 3,
            })
            .await
            .unwrap();
        assert!(matches!(outcome, BookingInsert::Created(_)));

        let svc = AvailabilityService::new(store.clone(), store.clone());
        let result = svc.search(200, "100", "102", start()).await.unwrap();

        assert_eq!(result.estimated_ride_duration_hours, 2);
        assert_eq!(result.window.end, start() + Duration::hours(2));
        let ids: Vec<Uuid> = result.available.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![free.id]);
        assert!(!ids.contains(&small.id));
    }

    #[tokio::test]
    async fn test_search_validation() {
        let store = Arc::new(MemoryStore::new());
        let svc = AvailabilityService::new(store.clone(), store.clone());

        assert!(matches!(svc.search(0, "1", "2", start()).await, Err(AppError::Validation(_))));
        assert!(matches!(svc.search(10, "", "2", start()).await, Err(AppError::Validation(_))));
        assert!(matches!(svc.search(10, "1", " ", start()).await, Err(AppError::Validation(_))));
        assert!(matches!(svc.search(10, "abc", "2", start()).await, Err(AppError::BadRequest(_))));
    }

    /// Repositorio de reservas que falla si se consulta
    struct UnreachableBookings;

    #[async_trait]
    impl BookingRepository for UnreachableBookings {
        async fn find_overlapping(&self, _: Uuid, _: TimeWindow) -> AppResult<Vec<crate::models::Booking>> {
            Err(AppError::Internal("unexpected query".into()))
        }
        async fn find_overlapping_for_many(&self, _: &[Uuid], _: TimeWindow) -> AppResult<Vec<crate::models::Booking>> {
            Err(AppError::Internal("unexpected query".into()))
        }
        async fn insert_if_free(&self, _: NewBooking) -> AppResult<BookingInsert> {
            Err(AppError::Internal("unexpected query".into()))
        }
        async fn list_recent(&self, _: i64) -> AppResult<Vec<crate::models::Booking>> {
            Err(AppError::Internal("unexpected query".into()))
        }
        async fn delete(&self, _: Uuid) -> AppResult<Option<crate::models::Booking>> {
            Err(AppError::Internal("unexpected query".into()))
        }
        async fn has_live_booking(&self, _: Uuid, _: DateTime<Utc>) -> AppResult<bool> {
            Err(AppError::Internal("unexpected query".into()))
        }
    }

    #[tokio::test]
    async fn test_no_candidates_skips_booking_lookup() {
        let store = Arc::new(MemoryStore::new());
        add_vehicle(&store, "tiny", 50.0).await;

        let svc = AvailabilityService::new(store.clone(), Arc::new(UnreachableBookings));
        let result = svc.search(1000, "474009", "410099", start()).await.unwrap();
        assert!(result.available.is_empty());
        assert_eq!(result.estimated_ride_duration_hours, 22);
    }
}
