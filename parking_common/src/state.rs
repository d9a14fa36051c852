//! Gate control state enums.
//!
//! `GateState` uses `#[repr(u8)]` so a controller state can be exported as a
//! single byte and decoded back with [`GateState::from_u8`].

use serde::{Deserialize, Serialize};
use static_assertions::assert_eq_size;

/// Control state of one gate (entry or exit).
///
/// The machine cycles indefinitely; `Emergency` is a pre-emptive overlay
/// entered from any state while the e-stop is asserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum GateState {
    /// Barrier at rest, red light, waiting for a vehicle.
    Idle = 0,
    /// Vehicle detected; credentials are evaluated on the next tick.
    Validation = 1,
    /// Barrier commanded open, waiting for the open limit switch.
    OpeningGate = 2,
    /// Barrier open, green light, waiting for the vehicle to clear.
    OpenGateWaitForCar = 3,
    /// Barrier commanded closed, waiting for the closed limit switch.
    ClosingGate = 4,
    /// E-stop asserted: actuators frozen, red light.
    Emergency = 5,
}

assert_eq_size!(GateState, u8);

impl GateState {
    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Idle),
            1 => Some(Self::Validation),
            2 => Some(Self::OpeningGate),
            3 => Some(Self::OpenGateWaitForCar),
            4 => Some(Self::ClosingGate),
            5 => Some(Self::Emergency),
            _ => None,
        }
    }

    /// Whether the barrier may be moving in this state.
    #[inline]
    pub const fn is_moving(&self) -> bool {
        matches!(self, Self::OpeningGate | Self::ClosingGate)
    }
}

impl Default for GateState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Which way a gate lets vehicles through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateDirection {
    /// Admits vehicles and reserves a parking slot.
    Entry,
    /// Releases vehicles and frees their slot.
    Exit,
}

impl GateDirection {
    /// Lowercase name used in gate identifiers and logs.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Exit => "exit",
        }
    }
}

impl std::fmt::Display for GateDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
