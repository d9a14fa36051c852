//! Parking Common Library
//!
//! Shared types, constants and configuration loading for the parking lot
//! workspace. Everything a gate controller exchanges with its surroundings
//! (state values, I/O snapshots, identifiers, configuration) lives here.
//!
//! # Module Structure
//!
//! - [`consts`] - Capacity and cycle-time constants
//! - [`state`] - Gate control state and gate direction
//! - [`io`] - Per-tick input/output snapshots and identifiers
//! - [`config`] - TOML configuration loading
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use parking_common::prelude::*;
//!
//! let mut outputs = GateOutputs::default();
//! outputs.set_light(SignalLight::Red);
//! assert_eq!(outputs.lit(), Some(SignalLight::Red));
//! ```

pub mod config;
pub mod consts;
pub mod io;
pub mod prelude;
pub mod state;
