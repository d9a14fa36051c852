//! Simulated field I/O.
//!
//! A barrier travel model, a [`GateIo`](crate::cycle::GateIo) implementation
//! that feeds it, and the standard drive-through scenarios used by the CLI
//! and the integration tests.

pub mod barrier;
pub mod io;
pub mod scenario;

pub use barrier::{Barrier, BarrierPosition};
pub use io::SimulatedGate;
