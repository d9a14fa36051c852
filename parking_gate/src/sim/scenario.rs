//! Drive-through scenarios against simulated gates.
//!
//! Each scenario starts from a fresh [`Rig`] (one lot, one entry and one exit
//! gate on simulated I/O) and checks the controller's observable behavior
//! tick by tick. A failed expectation is a [`ScenarioError::Violation`]; a
//! gate that never reaches the awaited condition is
//! [`ScenarioError::Stalled`].

use std::time::Duration;

use parking_common::io::{DriverId, GateOutputs, LicensePlate};
use parking_common::state::{GateDirection, GateState};
use thiserror::Error;
use tracing::info;

use super::io::SimulatedGate;
use crate::cycle::{CycleError, CycleRunner};
use crate::lot::ParkingLot;

/// Ticks a single wait may take before the gate counts as stalled.
pub const TICK_LIMIT: u64 = 32;

/// Ticks observed when a vehicle is expected to be refused.
pub const DENIAL_TICKS: u64 = 3;

pub type SimRunner = CycleRunner<SimulatedGate>;

/// Scenario failure.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Cycle(#[from] CycleError),

    #[error("{gate}: stalled after {ticks} ticks waiting for {waiting_for}")]
    Stalled {
        gate: String,
        ticks: u64,
        waiting_for: &'static str,
    },

    #[error("expectation failed: {0}")]
    Violation(String),
}

fn ensure(condition: bool, detail: impl FnOnce() -> String) -> Result<(), ScenarioError> {
    if condition {
        Ok(())
    } else {
        Err(ScenarioError::Violation(detail()))
    }
}

// ─── Rig ────────────────────────────────────────────────────────────

/// One lot with an entry and an exit gate on simulated I/O.
pub struct Rig {
    pub lot: ParkingLot,
    pub entry: SimRunner,
    pub exit: SimRunner,
    paced: bool,
}

impl Rig {
    /// Build a rig around `lot`. With `paced`, every tick sleeps out the cycle time.
    pub fn new(lot: ParkingLot, cycle_time: Duration, paced: bool) -> Self {
        let entry = CycleRunner::new(lot.init_entry_gate(), SimulatedGate::new(), cycle_time);
        let exit = CycleRunner::new(lot.init_exit_gate(), SimulatedGate::new(), cycle_time);
        Self {
            lot,
            entry,
            exit,
            paced,
        }
    }

    pub fn runner(&self, side: GateDirection) -> &SimRunner {
        match side {
            GateDirection::Entry => &self.entry,
            GateDirection::Exit => &self.exit,
        }
    }

    pub fn runner_mut(&mut self, side: GateDirection) -> &mut SimRunner {
        match side {
            GateDirection::Entry => &mut self.entry,
            GateDirection::Exit => &mut self.exit,
        }
    }

    #[inline]
    pub fn sim(&mut self, side: GateDirection) -> &mut SimulatedGate {
        self.runner_mut(side).io_mut()
    }

    #[inline]
    pub fn state(&self, side: GateDirection) -> GateState {
        self.runner(side).controller().state()
    }

    /// Run one cycle on one gate.
    pub fn tick(&mut self, side: GateDirection) -> Result<GateOutputs, ScenarioError> {
        let paced = self.paced;
        let runner = self.runner_mut(side);
        let out = if paced {
            runner.step_paced()?
        } else {
            runner.step()?
        };
        Ok(out)
    }

    /// Tick until `done` holds, at most [`TICK_LIMIT`] times.
    pub fn wait_for(
        &mut self,
        side: GateDirection,
        waiting_for: &'static str,
        done: impl Fn(&GateOutputs, GateState) -> bool,
    ) -> Result<GateOutputs, ScenarioError> {
        for _ in 0..TICK_LIMIT {
            let out = self.tick(side)?;
            if done(&out, self.state(side)) {
                return Ok(out);
            }
        }
        Err(ScenarioError::Stalled {
            gate: self.runner(side).controller().name().to_owned(),
            ticks: TICK_LIMIT,
            waiting_for,
        })
    }

    /// Full pass of one vehicle: loop on → green → safety zone → loop and
    /// readers clear → safety zone clear → barrier closed and gate idle.
    ///
    /// Returns the number of ticks the pass took.
    pub fn drive_through(
        &mut self,
        side: GateDirection,
        driver: Option<DriverId>,
        plate: Option<LicensePlate>,
    ) -> Result<u64, ScenarioError> {
        let start = self.runner(side).stats().cycle_count;
        info!(gate = self.runner(side).controller().name(), plate = ?plate, "vehicle approaching");

        let sim = self.sim(side);
        sim.arrive(driver, plate);
        sim.set_inductive(true);
        self.wait_for(side, "green light", |out, _| out.green_light)?;

        self.sim(side).set_safety(true);
        self.tick(side)?;

        let sim = self.sim(side);
        sim.set_inductive(false);
        sim.clear_credentials();
        self.tick(side)?;

        self.sim(side).set_safety(false);
        self.tick(side)?;

        self.wait_for(side, "barrier closed", |out, state| {
            state == GateState::Idle && out.red_light
        })?;

        let ticks = self.runner(side).stats().cycle_count - start;
        info!(gate = self.runner(side).controller().name(), ticks, "vehicle passed");
        Ok(ticks)
    }

    /// Present a vehicle for [`DENIAL_TICKS`] cycles and check it is never let through.
    pub fn expect_denied(
        &mut self,
        side: GateDirection,
        driver: Option<DriverId>,
        plate: Option<LicensePlate>,
    ) -> Result<(), ScenarioError> {
        let sim = self.sim(side);
        sim.arrive(driver, plate.clone());
        sim.set_inductive(true);

        for _ in 0..DENIAL_TICKS {
            let out = self.tick(side)?;
            ensure(!out.green_light && !out.open_gate, || {
                format!("{side} gate let {plate:?} through")
            })?;
        }
        ensure(
            matches!(self.state(side), GateState::Idle | GateState::Validation),
            || format!("{side} gate left the idle loop: {:?}", self.state(side)),
        )
    }
}

// ─── Scenario Catalogue ─────────────────────────────────────────────

/// Outcome of a successful scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioReport {
    pub name: &'static str,
    pub entry_cycles: u64,
    pub exit_cycles: u64,
    /// Vehicles parked when the scenario ended.
    pub parked: usize,
}

/// A named, repeatable scenario.
#[derive(Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    body: fn(&mut Rig) -> Result<(), ScenarioError>,
}

impl Scenario {
    /// Run against `rig` and summarize.
    pub fn run(&self, rig: &mut Rig) -> Result<ScenarioReport, ScenarioError> {
        info!(scenario = self.name, "scenario started");
        (self.body)(rig)?;
        Ok(ScenarioReport {
            name: self.name,
            entry_cycles: rig.entry.stats().cycle_count,
            exit_cycles: rig.exit.stats().cycle_count,
            parked: rig.lot.parked_count(),
        })
    }
}

pub const ALL: &[Scenario] = &[
    Scenario {
        name: "round-trip",
        description: "authorized car enters, then leaves through the exit gate",
        body: round_trip,
    },
    Scenario {
        name: "lot-full",
        description: "fill the lot to capacity, one more car is refused",
        body: lot_full,
    },
    Scenario {
        name: "unauthorized-driver",
        description: "unknown driver is refused at the entry gate",
        body: unauthorized_driver,
    },
    Scenario {
        name: "emergency-stop",
        description: "e-stop during validation freezes the gate, then entry resumes",
        body: emergency_stop,
    },
    Scenario {
        name: "double-entry",
        description: "a parked plate cannot enter a second time",
        body: double_entry,
    },
    Scenario {
        name: "invalid-exit",
        description: "a plate that never entered cannot leave",
        body: invalid_exit,
    },
    Scenario {
        name: "safety-sensor",
        description: "barrier stays open while the safety zone is occupied",
        body: safety_sensor_blocks_close,
    },
];

/// Look up a scenario by name.
pub fn find(name: &str) -> Option<&'static Scenario> {
    ALL.iter().find(|s| s.name == name)
}

// ─── Scenario Bodies ────────────────────────────────────────────────

use GateDirection::{Entry, Exit};

pub fn round_trip(rig: &mut Rig) -> Result<(), ScenarioError> {
    let plate = LicensePlate::from("ABC-123");
    rig.lot.add_authorized_driver("Driver1");

    rig.drive_through(Entry, Some("Driver1".into()), Some(plate.clone()))?;
    ensure(rig.lot.registry().is_parked(&plate), || {
        format!("{plate} not parked after entry")
    })?;

    rig.drive_through(Exit, None, Some(plate.clone()))?;
    ensure(!rig.lot.registry().is_parked(&plate), || {
        format!("{plate} still parked after exit")
    })?;

    for side in [Entry, Exit] {
        ensure(rig.state(side) == GateState::Idle, || {
            format!("{side} gate not idle")
        })?;
        ensure(rig.runner(side).last_outputs().red_light, || {
            format!("{side} gate not showing red")
        })?;
    }
    Ok(())
}

pub fn lot_full(rig: &mut Rig) -> Result<(), ScenarioError> {
    let driver = DriverId::from("OverflowDriver");
    rig.lot.add_authorized_driver(driver.clone());

    let capacity = rig.lot.registry().capacity();
    for i in 0..capacity {
        let plate = LicensePlate::new(format!("CAR-{i:03}"));
        rig.drive_through(Entry, Some(driver.clone()), Some(plate))?;
    }
    ensure(rig.lot.parked_count() == capacity, || {
        format!("expected {capacity} parked, found {}", rig.lot.parked_count())
    })?;

    let extra = LicensePlate::from("CAR-999");
    rig.expect_denied(Entry, Some(driver), Some(extra.clone()))?;
    ensure(!rig.lot.registry().is_parked(&extra), || {
        format!("{extra} parked beyond capacity")
    })
}

pub fn unauthorized_driver(rig: &mut Rig) -> Result<(), ScenarioError> {
    rig.expect_denied(Entry, Some("BadDriver".into()), Some("BAD-001".into()))?;
    ensure(rig.lot.parked_count() == 0, || {
        "unauthorized vehicle was registered".to_owned()
    })
}

pub fn emergency_stop(rig: &mut Rig) -> Result<(), ScenarioError> {
    let plate = LicensePlate::from("EMG-001");
    rig.lot.add_authorized_driver("SafeDriver");

    let sim = rig.sim(Entry);
    sim.arrive(Some("SafeDriver".into()), Some(plate.clone()));
    sim.set_inductive(true);
    rig.tick(Entry)?;
    ensure(rig.state(Entry) == GateState::Validation, || {
        format!("expected Validation, got {:?}", rig.state(Entry))
    })?;

    rig.sim(Entry).set_e_stop(true);
    let out = rig.tick(Entry)?;
    ensure(rig.state(Entry) == GateState::Emergency, || {
        format!("expected Emergency, got {:?}", rig.state(Entry))
    })?;
    ensure(out.actuators_idle() && out.red_light, || {
        format!("gate moved during e-stop: {out:?}")
    })?;
    ensure(!rig.lot.registry().is_parked(&plate), || {
        "slot reserved during e-stop".to_owned()
    })?;

    rig.sim(Entry).set_e_stop(false);
    let out = rig.tick(Entry)?;
    ensure(out.actuators_idle(), || {
        format!("recovery movement after e-stop: {out:?}")
    })?;
    ensure(rig.state(Entry) == GateState::Idle, || {
        format!("expected Idle after e-stop, got {:?}", rig.state(Entry))
    })?;

    rig.drive_through(Entry, Some("SafeDriver".into()), Some(plate.clone()))?;
    ensure(rig.lot.registry().is_parked(&plate), || {
        format!("{plate} not parked after resumed entry")
    })
}

pub fn double_entry(rig: &mut Rig) -> Result<(), ScenarioError> {
    let plate = LicensePlate::from("REPEAT-001");
    rig.lot.add_authorized_driver("RepeatDriver");

    rig.drive_through(Entry, Some("RepeatDriver".into()), Some(plate.clone()))?;
    rig.expect_denied(Entry, Some("RepeatDriver".into()), Some(plate))?;
    ensure(rig.lot.parked_count() == 1, || {
        format!("expected 1 parked, found {}", rig.lot.parked_count())
    })
}

pub fn invalid_exit(rig: &mut Rig) -> Result<(), ScenarioError> {
    rig.expect_denied(Exit, None, Some("UNKNOWN-999".into()))
}

pub fn safety_sensor_blocks_close(rig: &mut Rig) -> Result<(), ScenarioError> {
    rig.lot.add_authorized_driver("SafeCloseDriver");

    let sim = rig.sim(Entry);
    sim.arrive(Some("SafeCloseDriver".into()), Some("SAFE-001".into()));
    sim.set_inductive(true);
    sim.set_safety(true);
    rig.wait_for(Entry, "green light", |out, _| out.green_light)?;

    // Vehicle leaves the loop but still sits in the swing zone.
    let sim = rig.sim(Entry);
    sim.set_inductive(false);
    sim.clear_credentials();
    for _ in 0..DENIAL_TICKS {
        let out = rig.tick(Entry)?;
        ensure(!out.close_gate && out.open_gate && out.green_light, || {
            format!("gate tried to close with safety zone occupied: {out:?}")
        })?;
    }
    ensure(rig.state(Entry) == GateState::OpenGateWaitForCar, || {
        format!("expected OpenGateWaitForCar, got {:?}", rig.state(Entry))
    })?;

    rig.sim(Entry).set_safety(false);
    let out = rig.tick(Entry)?;
    ensure(out.close_gate, || "gate did not close once clear".to_owned())?;
    rig.wait_for(Entry, "barrier closed", |out, state| {
        state == GateState::Idle && out.red_light
    })?;
    Ok(())
}
