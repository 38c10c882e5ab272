//! Exclusión mutua por vehículo
//!
//! Las operaciones que comprueban y luego escriben sobre un vehículo
//! (reservar, eliminar) se ejecutan mientras se mantiene su guard. Las
//! entradas sin guards vivos se purgan al adquirir un nuevo lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

/// Guard de la sección crítica de un vehículo
pub type VehicleGuard = OwnedMutexGuard<()>;

#[derive(Clone, Default)]
pub struct VehicleLocks {
    slots: Arc<Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>>,
}

impl VehicleLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Esperar y entrar en la sección crítica de `vehicle_id`
    pub async fn acquire(&self, vehicle_id: Uuid) -> VehicleGuard {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            // Solo el mapa referencia el slot: nadie lo usa ni lo espera
            slots.retain(|id, slot| *id == vehicle_id || Arc::strong_count(slot) > 1);
            slots.entry(vehicle_id).or_default().clone()
        };
        slot.lock_owned().await
    }

    /// Número de vehículos con slot registrado
    pub fn tracked(&self) -> usize {
        self.slots.lock().map(|s| s.len()).unwrap_or(0)
    }
}
