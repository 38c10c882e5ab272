//! Store en memoria
//!
//! Implementa ambos repositorios sobre un único `RwLock`, de modo que
//! `insert_if_free` y `delete_if_idle` son atómicos por construcción.
//! Se usa en los tests y cuando `STORAGE_BACKEND=memory`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BookingRepository, VehicleRepository};
use crate::models::{Booking, BookingInsert, NewBooking, NewVehicle, Vehicle, VehicleDeletion};
use crate::scheduling::TimeWindow;
use crate::utils::errors::AppResult;

#[derive(Default)]
struct Collections {
    vehicles: HashMap<Uuid, Vehicle>,
    bookings: HashMap<Uuid, Booking>,
}

impl Collections {
    fn has_live_booking(&self, vehicle_id: Uuid, now: DateTime<Utc>) -> bool {
        self.bookings
            .values()
            .any(|b| b.vehicle_id == vehicle_id && b.window().is_live_at(now))
    }

    fn overlapping<'a>(
        &'a self,
        vehicle_ids: &'a HashSet<Uuid>,
        window: &'a TimeWindow,
    ) -> impl Iterator<Item = &'a Booking> + 'a {
        self.bookings
            .values()
            .filter(move |b| vehicle_ids.contains(&b.vehicle_id) && b.conflicts_with(window))
    }
}

/// Ordena más recientes primero; el id desempata fechas iguales
fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, Uuid)) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn overlapping_for(&self, vehicle_ids: &[Uuid], window: TimeWindow) -> Vec<Booking> {
        let ids: HashSet<Uuid> = vehicle_ids.iter().copied().collect();
        let data = self.inner.read().await;
        let mut found: Vec<Booking> = data.overlapping(&ids, &window).cloned().collect();
        found.sort_by_key(|b| b.start_time);
        found
    }
}

#[async_trait]
impl VehicleRepository for MemoryStore {
    async fn create(&self, vehicle: NewVehicle) -> AppResult<Vehicle> {
        let vehicle = vehicle.into_vehicle(Utc::now());
        let mut data = self.inner.write().await;
        data.vehicles.insert(vehicle.id, vehicle.clone());
        Ok(vehicle)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        Ok(self.inner.read().await.vehicles.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Vehicle>> {
        let data = self.inner.read().await;
        Ok(ids.iter().filter_map(|id| data.vehicles.get(id).cloned()).collect())
    }

    async fn list(&self) -> AppResult<Vec<Vehicle>> {
        let mut vehicles: Vec<Vehicle> = self.inner.read().await.vehicles.values().cloned().collect();
        newest_first(&mut vehicles, |v| (v.created_at, v.id));
        Ok(vehicles)
    }

    async fn find_by_capacity_at_least(&self, min_capacity: f64) -> AppResult<Vec<Vehicle>> {
        let mut vehicles: Vec<Vehicle> = self
            .inner
            .read()
            .await
            .vehicles
            .values()
            .filter(|v| v.capacity_kg >= min_capacity)
            .cloned()
            .collect();
        newest_first(&mut vehicles, |v| (v.created_at, v.id));
        Ok(vehicles)
    }

    async fn delete_if_idle(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<VehicleDeletion> {
        let mut data = self.inner.write().await;

        if !data.vehicles.contains_key(&id) {
            return Ok(VehicleDeletion::NotFound);
        }
        if data.has_live_booking(id, now) {
            return Ok(VehicleDeletion::HasLiveBookings);
        }

        Ok(data
            .vehicles
            .remove(&id)
            .map(VehicleDeletion::Deleted)
            .unwrap_or(VehicleDeletion::NotFound))
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn find_overlapping(&self, vehicle_id: Uuid, window: TimeWindow) -> AppResult<Vec<Booking>> {
        Ok(self.overlapping_for(&[vehicle_id], window).await)
    }

    async fn find_overlapping_for_many(
        &self,
        vehicle_ids: &[Uuid],
        window: TimeWindow,
    ) -> AppResult<Vec<Booking>> {
        Ok(self.overlapping_for(vehicle_ids, window).await)
    }

    async fn insert_if_free(&self, booking: NewBooking) -> AppResult<BookingInsert> {
        let mut data = self.inner.write().await;

        if !data.vehicles.contains_key(&booking.vehicle_id) {
            return Ok(BookingInsert::VehicleMissing);
        }

        let ids = HashSet::from([booking.vehicle_id]);
        if data.overlapping(&ids, &booking.window).next().is_some() {
            return Ok(BookingInsert::Overlap);
        }

        let record = booking.into_booking(Utc::now());
        data.bookings.insert(record.id, record.clone());
        Ok(BookingInsert::Created(record))
    }

    async fn list_recent(&self, limit: i64) -> AppResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self.inner.read().await.bookings.values().cloned().collect();
        newest_first(&mut bookings, |b| (b.created_at, b.id));
        bookings.truncate(usize::try_from(limit.max(0)).unwrap_or(usize::MAX));
        Ok(bookings)
    }

    async fn delete(&self, id: Uuid) -> AppResult<Option<Booking>> {
        Ok(self.inner.write().await.bookings.remove(&id))
    }

    async fn has_live_booking(&self, vehicle_id: Uuid, now: DateTime<Utc>) -> AppResult<bool> {
        Ok(self.inner.read().await.has_live_booking(vehicle_id, now))
    }
}
