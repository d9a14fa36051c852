//! Gate control state machine.
//!
//! Idle → Validation → OpeningGate → OpenGateWaitForCar → ClosingGate → Idle,
//! with Emergency pre-empting every state while the e-stop is asserted.
//!
//! One [`GateController::run_cycle`] call is one scan cycle: a pure function
//! of (current state, inputs, registry) that advances the state and may
//! reserve or release a parking slot. No blocking, no waiting.
//!
//! Output policy per state:
//!
//! | State              | Lights | Actuators                                   |
//! |--------------------|--------|---------------------------------------------|
//! | Idle               | red    | close while not reported fully closed       |
//! | Validation (pass)  | yellow | open                                        |
//! | Validation (fail)  | none   | none                                        |
//! | OpeningGate        | yellow / green when open | open until fully open     |
//! | OpenGateWaitForCar | green / yellow when clear | open / close when clear  |
//! | ClosingGate        | yellow / red when closed | close until fully closed  |
//! | Emergency          | red    | none                                        |

use std::sync::{Arc, Weak};

use parking_common::io::{GateInputs, GateOutputs, LicensePlate, SignalLight};
use parking_common::state::{GateDirection, GateState};
use tracing::{debug, info, warn};

use crate::error::GateError;
use crate::registry::{ParkOutcome, Registry};
use crate::rules::{self, Denial};

/// Controller for one physical gate.
#[derive(Debug)]
pub struct GateController {
    name: String,
    direction: GateDirection,
    state: GateState,
    registry: Weak<Registry>,
}

impl GateController {
    /// New controller in `Idle`, bound to `registry`.
    ///
    /// Only a weak reference is kept: the lot owns the registry.
    pub fn new(name: impl Into<String>, direction: GateDirection, registry: &Arc<Registry>) -> Self {
        Self {
            name: name.into(),
            direction,
            state: GateState::Idle,
            registry: Arc::downgrade(registry),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub const fn direction(&self) -> GateDirection {
        self.direction
    }

    #[inline]
    pub const fn state(&self) -> GateState {
        self.state
    }

    /// Re-seed the state from a raw byte (e.g. a diagnostic snapshot).
    pub fn restore_state(&mut self, raw: u8) -> Result<GateState, GateError> {
        let state = GateState::from_u8(raw).ok_or_else(|| GateError::UnknownState {
            gate: self.name.clone(),
            raw,
        })?;
        self.transition(state);
        Ok(state)
    }

    /// Run one scan cycle.
    ///
    /// # Errors
    /// `GateError::RegistryReleased` if validation runs after the owning lot
    /// was dropped.
    pub fn run_cycle(&mut self, inputs: &GateInputs) -> Result<GateOutputs, GateError> {
        let mut out = GateOutputs::default();

        if inputs.e_stop {
            if self.state != GateState::Emergency {
                warn!(gate = %self.name, from = ?self.state, "emergency stop asserted");
            }
            self.transition(GateState::Emergency);
            out.set_light(SignalLight::Red);
            out.open_gate = false;
            out.close_gate = false;
            return Ok(out);
        }

        match self.state {
            GateState::Idle => {
                out.set_light(SignalLight::Red);
                // Some barriers never report closed at rest; keep driving them closed.
                if !inputs.gate_fully_closed {
                    out.close_gate = true;
                }
                if inputs.inductive_sensor {
                    self.transition(GateState::Validation);
                }
            }

            GateState::Validation => match self.validate(inputs)? {
                Ok(()) => {
                    out.set_light(SignalLight::Yellow);
                    out.open_gate = true;
                    self.transition(GateState::OpeningGate);
                }
                Err(denial) => {
                    // All lights stay dark on the failed tick.
                    debug!(
                        gate = %self.name,
                        plate = ?inputs.license_plate,
                        driver = ?inputs.driver_id,
                        reason = %denial,
                        "validation failed"
                    );
                    self.transition(GateState::Idle);
                }
            },

            GateState::OpeningGate => {
                if inputs.gate_fully_open {
                    out.set_light(SignalLight::Green);
                    self.transition(GateState::OpenGateWaitForCar);
                } else {
                    out.open_gate = true;
                    out.set_light(SignalLight::Yellow);
                }
            }

            GateState::OpenGateWaitForCar => {
                // Both sensors must be clear: a long vehicle can straddle the safety zone.
                if !inputs.safety_sensor && !inputs.inductive_sensor {
                    out.set_light(SignalLight::Yellow);
                    out.close_gate = true;
                    self.transition(GateState::ClosingGate);
                } else {
                    out.open_gate = true;
                    out.set_light(SignalLight::Green);
                }
            }

            GateState::ClosingGate => {
                if inputs.gate_fully_closed {
                    out.set_light(SignalLight::Red);
                    self.transition(GateState::Idle);
                } else {
                    out.close_gate = true;
                    out.set_light(SignalLight::Yellow);
                }
            }

            GateState::Emergency => {
                // Barrier stays where it stopped; no recovery movement.
                out.open_gate = false;
                out.close_gate = false;
                out.set_light(SignalLight::Red);
                info!(gate = %self.name, "emergency stop released");
                self.transition(GateState::Idle);
            }
        }

        Ok(out)
    }

    /// Evaluate credentials and reserve or release the slot.
    ///
    /// The outer `Result` is a fault; the inner one is the business verdict.
    fn validate(&self, inputs: &GateInputs) -> Result<Result<(), Denial>, GateError> {
        let registry = self
            .registry
            .upgrade()
            .ok_or_else(|| GateError::RegistryReleased {
                gate: self.name.clone(),
            })?;
        let plate = inputs.license_plate.as_ref();

        let verdict = match self.direction {
            GateDirection::Entry => {
                let driver = inputs.driver_id.as_ref();
                rules::check_entry(&registry, driver, plate, inputs.inductive_sensor)
                    .and_then(|()| reserve(&registry, plate))
            }
            GateDirection::Exit => rules::check_exit(&registry, plate, inputs.inductive_sensor)
                .and_then(|()| release(&registry, plate)),
        };

        if verdict.is_ok() {
            info!(
                gate = %self.name,
                plate = ?plate.map(|p| p.as_str()),
                parked = registry.parked_count(),
                capacity = registry.capacity(),
                "{} granted",
                self.direction
            );
        }
        Ok(verdict)
    }

    fn transition(&mut self, next: GateState) {
        if self.state != next {
            debug!(gate = %self.name, from = ?self.state, to = ?next, "state transition");
            self.state = next;
        }
    }
}

/// Atomic reservation after the predicate passed; a lost race is a denial.
fn reserve(registry: &Registry, plate: Option<&LicensePlate>) -> Result<(), Denial> {
    let plate = plate.ok_or(Denial::MissingLicensePlate)?;
    match registry.try_park(plate) {
        ParkOutcome::Parked => Ok(()),
        ParkOutcome::AlreadyParked => Err(Denial::AlreadyParked),
        ParkOutcome::Full => Err(Denial::LotFull),
    }
}

fn release(registry: &Registry, plate: Option<&LicensePlate>) -> Result<(), Denial> {
    let plate = plate.ok_or(Denial::MissingLicensePlate)?;
    if registry.release(plate) {
        Ok(())
    } else {
        Err(Denial::NotParked)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
