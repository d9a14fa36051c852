//! Prelude module for common re-exports.
//!
//! ```rust
//! use parking_common::prelude::*;
//! ```

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LotConfig, SharedConfig};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{CYCLE_TIME_US, MAX_CAPACITY};

// ─── Gate State & I/O ───────────────────────────────────────────────
pub use crate::io::{DriverId, GateInputs, GateOutputs, LicensePlate, SignalLight};
pub use crate::state::{GateDirection, GateState};
