//! Controller fault types.
//!
//! Denied entries and exits are not errors; they are reported structurally
//! through the gate outputs. Only implementation faults end up here.

use thiserror::Error;

/// Fatal gate controller fault. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    /// The lot owning the registry was dropped while a controller was still cycling.
    #[error("gate {gate}: registry released, owning lot has been torn down")]
    RegistryReleased { gate: String },

    /// A raw state value did not decode to any `GateState`.
    #[error("gate {gate}: unknown state value {raw}")]
    UnknownState { gate: String, raw: u8 },
}
