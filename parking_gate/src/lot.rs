//! Parking lot composition root.
//!
//! Owns the one [`Registry`] of a lot and hands out gate controllers bound
//! to it. Dropping the lot releases the registry; controllers still cycling
//! afterwards fault on their next validation.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use parking_common::config::LotConfig;
use parking_common::io::DriverId;
use parking_common::state::GateDirection;
use tracing::{debug, info};

use crate::gate::GateController;
use crate::registry::Registry;

/// One parking lot: a registry plus any number of entry and exit gates.
#[derive(Debug)]
pub struct ParkingLot {
    registry: Arc<Registry>,
    entry_gates: AtomicU32,
    exit_gates: AtomicU32,
}

impl ParkingLot {
    /// Lot with the default capacity and no authorized drivers.
    pub fn new() -> Self {
        Self::from_registry(Registry::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_registry(Registry::with_capacity(capacity))
    }

    /// Lot sized and seeded from configuration.
    pub fn from_config(config: &LotConfig) -> Self {
        let lot = Self::with_capacity(config.lot.max_capacity);
        for id in &config.lot.authorized_drivers {
            lot.add_authorized_driver(id.as_str());
        }
        info!(
            capacity = config.lot.max_capacity,
            drivers = lot.registry.authorized_count(),
            "parking lot configured"
        );
        lot
    }

    fn from_registry(registry: Registry) -> Self {
        Self {
            registry: Arc::new(registry),
            entry_gates: AtomicU32::new(0),
            exit_gates: AtomicU32::new(0),
        }
    }

    /// New entry gate controller in `Idle`.
    pub fn init_entry_gate(&self) -> GateController {
        self.init_gate(GateDirection::Entry)
    }

    /// New exit gate controller in `Idle`.
    pub fn init_exit_gate(&self) -> GateController {
        self.init_gate(GateDirection::Exit)
    }

    fn init_gate(&self, direction: GateDirection) -> GateController {
        let counter = match direction {
            GateDirection::Entry => &self.entry_gates,
            GateDirection::Exit => &self.exit_gates,
        };
        let n = counter.fetch_add(1, Ordering::Relaxed) + 1;
        let name = format!("{direction}-{n}");
        debug!(gate = %name, "gate initialized");
        GateController::new(name, direction, &self.registry)
    }

    /// Authorize a driver. Idempotent, safe while gates are cycling.
    pub fn add_authorized_driver(&self, id: impl Into<DriverId>) {
        let id = id.into();
        debug!(driver = %id, "driver authorized");
        self.registry.authorize_driver(id);
    }

    /// Revoke a driver. Idempotent; vehicles already parked are unaffected.
    pub fn remove_authorized_driver(&self, id: impl Into<DriverId>) {
        let id = id.into();
        debug!(driver = %id, "driver revoked");
        self.registry.revoke_driver(&id);
    }

    /// Read access to the shared registry.
    ///
    /// Occupancy changes only through gate validation:
    ///
    /// ```compile_fail
    /// let lot = parking_gate::ParkingLot::new();
    /// lot.registry().try_park(&"GHOST-1".into());
    /// ```
    ///
    /// and drivers only through [`add_authorized_driver`](Self::add_authorized_driver):
    ///
    /// ```compile_fail
    /// let lot = parking_gate::ParkingLot::new();
    /// lot.registry().authorize_driver("SNEAK".into());
    /// ```
    #[inline]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[inline]
    pub fn parked_count(&self) -> usize {
        self.registry.parked_count()
    }
}

impl Default for ParkingLot {
    fn default() -> Self {
        Self::new()
    }
}
