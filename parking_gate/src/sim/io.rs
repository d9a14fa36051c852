//! Simulated gate I/O: vehicle-side inputs plus a barrier model.

use parking_common::io::{DriverId, GateInputs, GateOutputs, LicensePlate};

use super::barrier::{Barrier, BarrierPosition};
use crate::cycle::GateIo;

/// Field I/O for one simulated gate.
///
/// Vehicle-side inputs (sensors, credentials, e-stop) are set directly by the
/// caller; the limit switches always come from the barrier model.
#[derive(Debug, Clone, Default)]
pub struct SimulatedGate {
    vehicle: GateInputs,
    barrier: Barrier,
}

impl SimulatedGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_barrier(position: BarrierPosition) -> Self {
        Self {
            vehicle: GateInputs::default(),
            barrier: Barrier::new(position),
        }
    }

    #[inline]
    pub fn barrier(&self) -> &Barrier {
        &self.barrier
    }

    /// Vehicle-side inputs as they will be sampled next cycle.
    #[inline]
    pub fn vehicle(&self) -> &GateInputs {
        &self.vehicle
    }

    /// A vehicle pulls up: credentials read, no sensor triggered yet.
    pub fn arrive(&mut self, driver: Option<DriverId>, plate: Option<LicensePlate>) {
        self.vehicle = GateInputs {
            e_stop: self.vehicle.e_stop,
            driver_id: driver,
            license_plate: plate,
            ..Default::default()
        };
    }

    pub fn set_inductive(&mut self, active: bool) {
        self.vehicle.inductive_sensor = active;
    }

    pub fn set_safety(&mut self, active: bool) {
        self.vehicle.safety_sensor = active;
    }

    pub fn set_e_stop(&mut self, active: bool) {
        self.vehicle.e_stop = active;
    }

    /// Vehicle moved past the readers.
    pub fn clear_credentials(&mut self) {
        self.vehicle.clear_credentials();
    }
}

impl GateIo for SimulatedGate {
    fn read_inputs(&mut self) -> GateInputs {
        GateInputs {
            gate_fully_open: self.barrier.fully_open(),
            gate_fully_closed: self.barrier.fully_closed(),
            ..self.vehicle.clone()
        }
    }

    fn write_outputs(&mut self, outputs: &GateOutputs) {
        self.barrier.apply(outputs);
    }
}
