//! Per-tick I/O snapshots exchanged between field devices and a gate controller.
//!
//! Inputs are sampled once per scan cycle; outputs are produced fresh every
//! cycle and default to all-false before the controller writes them.

use serde::{Deserialize, Serialize};
use std::fmt;

// ─── Identifiers ────────────────────────────────────────────────────

/// Identifier read from a driver's credential (badge, card, app token).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverId(String);

/// License plate read by the plate camera.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LicensePlate(String);

macro_rules! string_id {
    ($ty:ident) => {
        impl $ty {
            #[inline]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $ty {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $ty {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(DriverId);
string_id!(LicensePlate);

// ─── Inputs ─────────────────────────────────────────────────────────

/// Sensor and credential snapshot for one scan cycle.
///
/// `None` credentials mean "no vehicle identified yet" and are an ordinary
/// value, not a fault.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateInputs {
    /// Emergency stop asserted.
    pub e_stop: bool,
    /// Vehicle present at the threshold (induction loop).
    pub inductive_sensor: bool,
    /// Vehicle present in the barrier swing / clearance zone.
    pub safety_sensor: bool,
    /// Open limit switch.
    pub gate_fully_open: bool,
    /// Closed limit switch.
    pub gate_fully_closed: bool,
    /// Driver credential, if one has been read.
    pub driver_id: Option<DriverId>,
    /// Plate, if one has been read.
    pub license_plate: Option<LicensePlate>,
}

impl GateInputs {
    /// Clear both credentials (vehicle left the reader area).
    pub fn clear_credentials(&mut self) {
        self.driver_id = None;
        self.license_plate = None;
    }
}

// ─── Outputs ────────────────────────────────────────────────────────

/// One of the three signal lamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalLight {
    Red,
    Yellow,
    Green,
}

/// Actuator and signal-light commands for one scan cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateOutputs {
    /// Drive the barrier towards open.
    pub open_gate: bool,
    /// Drive the barrier towards closed.
    pub close_gate: bool,
    pub red_light: bool,
    pub yellow_light: bool,
    pub green_light: bool,
}

impl GateOutputs {
    /// Switch on exactly `light` and switch the other two off.
    #[inline]
    pub fn set_light(&mut self, light: SignalLight) {
        self.red_light = light == SignalLight::Red;
        self.yellow_light = light == SignalLight::Yellow;
        self.green_light = light == SignalLight::Green;
    }

    /// The lamp that is on, or `None` when all are dark.
    ///
    /// With more than one lamp on the first in red → yellow → green order wins;
    /// use [`lights_exclusive`](Self::lights_exclusive) to detect that case.
    pub fn lit(&self) -> Option<SignalLight> {
        if self.red_light {
            Some(SignalLight::Red)
        } else if self.yellow_light {
            Some(SignalLight::Yellow)
        } else if self.green_light {
            Some(SignalLight::Green)
        } else {
            None
        }
    }

    /// At most one of the three lamps is on.
    #[inline]
    pub fn lights_exclusive(&self) -> bool {
        (self.red_light as u8 + self.yellow_light as u8 + self.green_light as u8) <= 1
    }

    /// Neither actuator is driven.
    #[inline]
    pub fn actuators_idle(&self) -> bool {
        !self.open_gate && !self.close_gate
    }
}
