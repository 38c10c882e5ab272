use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use super::BookingRepository;
use crate::models::{Booking, BookingInsert, NewBooking};
use crate::scheduling::TimeWindow;
use crate::utils::errors::{AppError, AppResult};

/// Código SQLSTATE de `exclusion_violation` (constraint `bookings_no_overlap`)
const EXCLUSION_VIOLATION: &str = "23P01";

// Semántica semiabierta; las ventanas vacías nunca se solapan
const OVERLAP_FILTER: &str = "status = 'active' \
     AND start_time < end_time \
     AND $2 < $3 \
     AND start_time < $3 \
     AND end_time > $2";

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_exclusion_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(EXCLUSION_VIOLATION),
        _ => false,
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn find_overlapping(&self, vehicle_id: Uuid, window: TimeWindow) -> AppResult<Vec<Booking>> {
        let sql = format!(
            "SELECT * FROM bookings WHERE vehicle_id = $1 AND {} ORDER BY start_time",
            OVERLAP_FILTER
        );

        let bookings = sqlx::query_as::<_, Booking>(&sql)
            .bind(vehicle_id)
            .bind(window.start)
            .bind(window.end)
            .fetch_all(&self.pool)
            .await?;

        Ok(bookings)
    }

    async fn find_overlapping_for_many(
        &self,
        vehicle_ids: &[Uuid],
        window: TimeWindow,
    ) -> AppResult<Vec<Booking>> {
        if vehicle_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT * FROM bookings WHERE vehicle_id = ANY($1) AND {} ORDER BY start_time",
            OVERLAP_FILTER
        );

        let bookings = sqlx::query_as::<_, Booking>(&sql)
            .bind(vehicle_ids)
            .bind(window.start)
            .bind(window.end)
            .fetch_all(&self.pool)
            .await?;

        Ok(bookings)
    }

    async fn insert_if_free(&self, booking: NewBooking) -> AppResult<BookingInsert> {
        let mut tx = self.pool.begin().await?;

        // Serializa las reservas del mismo vehículo entre procesos
        let locked: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM vehicles WHERE id = $1 FOR UPDATE")
                .bind(booking.vehicle_id)
                .fetch_optional(&mut *tx)
                .await?;

        if locked.is_none() {
            tx.rollback().await?;
            return Ok(BookingInsert::VehicleMissing);
        }

        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM bookings WHERE vehicle_id = $1 AND {})",
            OVERLAP_FILTER
        );
        let (overlap,): (bool,) = sqlx::query_as(&sql)
            .bind(booking.vehicle_id)
            .bind(booking.window.start)
            .bind(booking.window.end)
            .fetch_one(&mut *tx)
            .await?;

        if overlap {
            tx.rollback().await?;
            return Ok(BookingInsert::Overlap);
        }

        let record = booking.into_booking(Utc::now());
        let inserted = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (
                id, vehicle_id, customer_id, from_pincode, to_pincode,
                start_time, end_time, estimated_ride_duration_hours, status, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#
        )
        .bind(record.id)
        .bind(record.vehicle_id)
        .bind(&record.customer_id)
        .bind(&record.from_pincode)
        .bind(&record.to_pincode)
        .bind(record.start_time)
        .bind(record.end_time)
        .bind(record.estimated_ride_duration_hours)
        .bind(record.status)
        .bind(record.created_at)
        .fetch_one(&mut *tx)
        .await;

        let inserted = match inserted {
            Ok(row) => row,
            Err(e) if is_exclusion_violation(&e) => {
                warn!("⛔ Exclusion constraint rejected booking for vehicle {}", record.vehicle_id);
                return Ok(BookingInsert::Overlap);
            }
            Err(e) => return Err(AppError::Database(e)),
        };

        tx.commit().await?;
        Ok(BookingInsert::Created(inserted))
    }

    async fn list_recent(&self, limit: i64) -> AppResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings ORDER BY created_at DESC LIMIT $1"
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    async fn delete(&self, id: Uuid) -> AppResult<Option<Booking>> {
        let deleted = sqlx::query_as::<_, Booking>("DELETE FROM bookings WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(deleted)
    }

    async fn has_live_booking(&self, vehicle_id: Uuid, now: DateTime<Utc>) -> AppResult<bool> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM bookings WHERE vehicle_id = $1 AND end_time >= $2)"
        )
        .bind(vehicle_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
