//! Ventanas de tiempo semiabiertas `[start, end)`
//!
//! Dos ventanas se solapan cuando `start_a < end_b && start_b < end_a`.
//! Ventanas que solo se tocan (`end_a == start_b`) no se solapan, y una
//! ventana vacía (`start == end`) no se solapa con nada, ni consigo misma.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Determinar si dos intervalos semiabiertos se intersectan
pub fn overlaps<T: PartialOrd>(start_a: T, end_a: T, start_b: T, end_b: T) -> bool {
    if !(start_a < end_a) || !(start_b < end_b) {
        return false;
    }
    start_a < end_b && start_b < end_a
}

/// Ventana de ocupación de un vehículo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Crear una ventana; `None` si `end` es anterior a `start`
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        overlaps(self.start, self.end, other.start, other.end)
    }

    /// La ventana sigue vigente en `now` (termina en `now` o después)
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.end >= now
    }
}
