//! Shared occupancy registry.
//!
//! One registry per lot, shared by every gate of that lot. Holds the set of
//! authorized drivers and the set of parked license plates. Each set sits
//! behind its own `RwLock`; every method is a single atomic operation.
//!
//! Outside this crate the registry is read-only: plates move only through
//! gate validation, drivers only through the [`ParkingLot`](crate::ParkingLot)
//! admin calls.
//!
//! [`Registry::try_park`] checks for a duplicate, checks capacity and inserts
//! under one write lock, so several entry gates can share a lot without
//! overshooting capacity.

use std::collections::HashSet;

use parking_common::consts::MAX_CAPACITY;
use parking_common::io::{DriverId, LicensePlate};
use parking_lot::RwLock;

/// Result of an atomic park attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParkOutcome {
    /// Plate inserted.
    Parked,
    /// Plate was already in the lot; nothing changed.
    AlreadyParked,
    /// Lot at capacity; nothing changed.
    Full,
}

/// Authorized-driver and parked-vehicle sets for one lot.
#[derive(Debug)]
pub struct Registry {
    authorized_drivers: RwLock<HashSet<DriverId>>,
    parked_licenses: RwLock<HashSet<LicensePlate>>,
    capacity: usize,
}

impl Registry {
    /// Empty registry with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(MAX_CAPACITY)
    }

    /// Empty registry holding at most `capacity` parked vehicles.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            authorized_drivers: RwLock::new(HashSet::new()),
            parked_licenses: RwLock::new(HashSet::with_capacity(capacity.min(MAX_CAPACITY))),
            capacity,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // ── Drivers ──

    /// Add a driver. Returns `false` if already authorized.
    pub(crate) fn authorize_driver(&self, id: DriverId) -> bool {
        self.authorized_drivers.write().insert(id)
    }

    /// Remove a driver. Returns `false` if the driver was not authorized.
    pub(crate) fn revoke_driver(&self, id: &DriverId) -> bool {
        self.authorized_drivers.write().remove(id)
    }

    pub fn is_authorized(&self, id: &DriverId) -> bool {
        self.authorized_drivers.read().contains(id)
    }

    pub fn authorized_count(&self) -> usize {
        self.authorized_drivers.read().len()
    }

    // ── Parked vehicles ──

    pub fn is_parked(&self, plate: &LicensePlate) -> bool {
        self.parked_licenses.read().contains(plate)
    }

    pub fn parked_count(&self) -> usize {
        self.parked_licenses.read().len()
    }

    /// Whether another vehicle fits right now.
    pub fn has_free_slot(&self) -> bool {
        self.parked_count() < self.capacity
    }

    /// Insert `plate` if it is not parked yet and a slot is free.
    pub(crate) fn try_park(&self, plate: &LicensePlate) -> ParkOutcome {
        let mut parked = self.parked_licenses.write();
        if parked.contains(plate) {
            ParkOutcome::AlreadyParked
        } else if parked.len() >= self.capacity {
            ParkOutcome::Full
        } else {
            parked.insert(plate.clone());
            ParkOutcome::Parked
        }
    }

    /// Remove `plate`. Returns `false` if it was not parked.
    pub(crate) fn release(&self, plate: &LicensePlate) -> bool {
        self.parked_licenses.write().remove(plate)
    }

    /// Sorted snapshot of parked plates (diagnostics).
    pub fn parked_plates(&self) -> Vec<LicensePlate> {
        let mut plates: Vec<LicensePlate> = self.parked_licenses.read().iter().cloned().collect();
        plates.sort();
        plates
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
