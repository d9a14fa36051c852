//! # Parking Gate Library
//!
//! Scan-cycle control for parking lot entry and exit barriers. Every tick a
//! gate controller samples its sensors and credentials, consults the lot's
//! shared occupancy registry, and produces actuator and signal-light
//! commands.
//!
//! ## Layers
//!
//! 1. **Registry**: authorized drivers and parked plates, shared by all gates of a lot
//! 2. **Rules**: pure entry/exit predicates over the registry
//! 3. **GateController**: per-gate state machine, one `run_cycle` per tick
//! 4. **ParkingLot**: owns the registry, hands out controllers
//! 5. **CycleRunner**: fixed-rate read → process → write loop over a `GateIo`
//!
//! ## Example
//!
//! ```rust
//! use parking_common::io::GateInputs;
//! use parking_common::state::GateState;
//! use parking_gate::lot::ParkingLot;
//!
//! let lot = ParkingLot::new();
//! lot.add_authorized_driver("Driver1");
//!
//! let mut entry = lot.init_entry_gate();
//! let inputs = GateInputs {
//!     inductive_sensor: true,
//!     driver_id: Some("Driver1".into()),
//!     license_plate: Some("ABC-123".into()),
//!     ..Default::default()
//! };
//! entry.run_cycle(&inputs).unwrap(); // Idle → Validation
//! let out = entry.run_cycle(&inputs).unwrap(); // Validation → OpeningGate
//! assert!(out.open_gate);
//! assert_eq!(entry.state(), GateState::OpeningGate);
//! assert_eq!(lot.parked_count(), 1);
//! ```

pub mod cycle;
pub mod error;
pub mod gate;
pub mod lot;
pub mod registry;
pub mod rules;
pub mod sim;

pub use crate::error::GateError;
pub use crate::gate::GateController;
pub use crate::lot::ParkingLot;
pub use crate::registry::{ParkOutcome, Registry};
