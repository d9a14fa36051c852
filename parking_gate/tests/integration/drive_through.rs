//! Integration test: full vehicle passes through entry and exit gates.
//!
//! Validates occupancy bookkeeping across both gates of one lot, the
//! at-most-one-light invariant on every tick, and refusal paths.

use std::time::Duration;

use parking_common::io::{GateInputs, GateOutputs, LicensePlate, SignalLight};
use parking_common::state::{GateDirection, GateState};

use parking_gate::GateController;
use parking_gate::cycle::{CycleRunner, GateIo};
use parking_gate::lot::ParkingLot;
use parking_gate::rules;
use parking_gate::sim::SimulatedGate;
use parking_gate::sim::scenario::Rig;

use GateDirection::{Entry, Exit};

// ── Helpers ─────────────────────────────────────────────────────────

fn rig() -> Rig {
    Rig::new(ParkingLot::new(), Duration::from_millis(10), false)
}

/// Wraps simulated I/O and records every output written.
#[derive(Default)]
struct Recording {
    sim: SimulatedGate,
    outputs: Vec<GateOutputs>,
}

impl GateIo for Recording {
    fn read_inputs(&mut self) -> GateInputs {
        self.sim.read_inputs()
    }

    fn write_outputs(&mut self, outputs: &GateOutputs) {
        self.outputs.push(*outputs);
        self.sim.write_outputs(outputs);
    }
}

/// Run one vehicle through `gate` with ideal limit switches. Returns whether it was admitted.
fn admit(gate: &mut GateController, driver: &str, plate: &str) -> bool {
    let vehicle = GateInputs {
        inductive_sensor: true,
        gate_fully_closed: true,
        driver_id: Some(driver.into()),
        license_plate: Some(plate.into()),
        ..Default::default()
    };
    gate.run_cycle(&vehicle).unwrap();
    if !gate.run_cycle(&vehicle).unwrap().open_gate {
        return false;
    }
    let open = GateInputs {
        gate_fully_open: true,
        ..Default::default()
    };
    gate.run_cycle(&open).unwrap();
    gate.run_cycle(&GateInputs::default()).unwrap();
    let closed = GateInputs {
        gate_fully_closed: true,
        ..Default::default()
    };
    gate.run_cycle(&closed).unwrap();
    assert_eq!(gate.state(), GateState::Idle);
    true
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn round_trip_parks_then_releases_plate() {
    let mut rig = rig();
    let plate = LicensePlate::from("ABC-123");
    rig.lot.add_authorized_driver("Driver1");

    rig.drive_through(Entry, Some("Driver1".into()), Some(plate.clone()))
        .unwrap();
    assert!(rig.lot.registry().is_parked(&plate));
    assert_eq!(rig.lot.parked_count(), 1);

    rig.drive_through(Exit, None, Some(plate.clone())).unwrap();
    assert!(!rig.lot.registry().is_parked(&plate));
    assert_eq!(rig.lot.parked_count(), 0);

    for side in [Entry, Exit] {
        assert_eq!(rig.state(side), GateState::Idle);
        assert_eq!(rig.runner(side).last_outputs().lit(), Some(SignalLight::Red));
        assert!(rig.runner(side).io().barrier().fully_closed());
    }
}

#[test]
fn every_tick_of_a_pass_has_at_most_one_light() {
    let lot = ParkingLot::new();
    lot.add_authorized_driver("D1");
    let mut runner = CycleRunner::new(
        lot.init_entry_gate(),
        Recording::default(),
        Duration::from_millis(10),
    );

    runner
        .io_mut()
        .sim
        .arrive(Some("D1".into()), Some("P-1".into()));
    runner.io_mut().sim.set_inductive(true);
    while !runner.step().unwrap().green_light {}
    runner.io_mut().sim.set_safety(true);
    runner.step().unwrap();
    runner.io_mut().sim.set_inductive(false);
    runner.io_mut().sim.clear_credentials();
    runner.io_mut().sim.set_safety(false);
    while runner.controller().state() != GateState::Idle {
        runner.step().unwrap();
    }

    let outputs = &runner.io().outputs;
    assert!(outputs.len() >= 6);
    assert!(outputs.iter().all(GateOutputs::lights_exclusive));
    assert!(outputs.iter().all(|o| !(o.open_gate && o.close_gate)));
    assert_eq!(lot.parked_count(), 1);
}

#[test]
fn validation_is_evaluated_on_the_tick_after_detection() {
    let lot = ParkingLot::new();
    lot.add_authorized_driver("D1");
    let mut gate = lot.init_entry_gate();
    let inputs = GateInputs {
        inductive_sensor: true,
        gate_fully_closed: true,
        driver_id: Some("D1".into()),
        license_plate: Some("P-1".into()),
        ..Default::default()
    };

    let first = gate.run_cycle(&inputs).unwrap();
    assert_eq!(gate.state(), GateState::Validation);
    assert!(!first.open_gate);
    assert_eq!(lot.parked_count(), 0);

    let second = gate.run_cycle(&inputs).unwrap();
    assert_eq!(gate.state(), GateState::OpeningGate);
    assert!(second.open_gate);
    assert_eq!(second.lit(), Some(SignalLight::Yellow));
    assert_eq!(lot.parked_count(), 1);
}

#[test]
fn denied_tick_is_dark_then_idle_resumes_red() {
    let lot = ParkingLot::new();
    let mut gate = lot.init_entry_gate();
    let inputs = GateInputs {
        inductive_sensor: true,
        gate_fully_closed: true,
        driver_id: Some("BadDriver".into()),
        license_plate: Some("BAD-001".into()),
        ..Default::default()
    };

    gate.run_cycle(&inputs).unwrap();
    let denied = gate.run_cycle(&inputs).unwrap();
    assert_eq!(denied, GateOutputs::default());
    assert_eq!(gate.state(), GateState::Idle);

    let idle = gate
        .run_cycle(&GateInputs {
            gate_fully_closed: true,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(idle.lit(), Some(SignalLight::Red));
}

#[test]
fn unauthorized_entry_never_parks_or_shows_green() {
    let mut rig = rig();
    rig.lot.add_authorized_driver("Driver1");
    rig.expect_denied(Entry, Some("BadDriver".into()), Some("BAD-001".into()))
        .unwrap();
    assert_eq!(rig.lot.parked_count(), 0);
    assert!(!rig.entry.last_outputs().green_light);
}

#[test]
fn missing_credentials_are_an_ordinary_denial() {
    let mut rig = rig();
    rig.lot.add_authorized_driver("Driver1");
    rig.expect_denied(Entry, Some("Driver1".into()), None).unwrap();
    rig.expect_denied(Entry, None, Some("NO-DRIVER".into())).unwrap();
    rig.expect_denied(Exit, None, None).unwrap();
    assert_eq!(rig.lot.parked_count(), 0);
}

#[test]
fn parked_plate_cannot_enter_again_until_it_exits() {
    let mut rig = rig();
    let plate = LicensePlate::from("REPEAT-001");
    rig.lot.add_authorized_driver("D1");

    rig.drive_through(Entry, Some("D1".into()), Some(plate.clone()))
        .unwrap();
    assert!(!rules::can_enter(
        rig.lot.registry(),
        Some(&"D1".into()),
        Some(&plate),
        true
    ));
    rig.expect_denied(Entry, Some("D1".into()), Some(plate.clone()))
        .unwrap();

    rig.drive_through(Exit, None, Some(plate.clone())).unwrap();
    rig.drive_through(Entry, Some("D1".into()), Some(plate.clone()))
        .unwrap();
    assert!(rig.lot.registry().is_parked(&plate));
}

#[test]
fn full_lot_refuses_even_authorized_drivers() {
    let mut rig = Rig::new(ParkingLot::with_capacity(3), Duration::from_millis(10), false);
    rig.lot.add_authorized_driver("D1");
    for i in 0..3 {
        rig.drive_through(Entry, Some("D1".into()), Some(format!("CAR-{i}").into()))
            .unwrap();
    }
    rig.expect_denied(Entry, Some("D1".into()), Some("CAR-X".into()))
        .unwrap();
    assert_eq!(rig.lot.parked_count(), 3);

    rig.drive_through(Exit, None, Some("CAR-1".into())).unwrap();
    rig.drive_through(Entry, Some("D1".into()), Some("CAR-X".into()))
        .unwrap();
    assert_eq!(rig.lot.parked_count(), 3);
}

#[test]
fn default_capacity_is_150() {
    let lot = ParkingLot::new();
    lot.add_authorized_driver("D1");
    let mut gate = lot.init_entry_gate();
    for i in 0..150 {
        assert!(admit(&mut gate, "D1", &format!("CAR-{i:03}")), "CAR-{i:03} refused");
    }
    assert_eq!(lot.parked_count(), 150);
    assert!(!rules::can_enter(
        lot.registry(),
        Some(&"D1".into()),
        Some(&"CAR-999".into()),
        true
    ));
    assert!(!admit(&mut gate, "D1", "CAR-999"));
    assert_eq!(lot.parked_count(), 150);
}

#[test]
fn exit_of_unknown_plate_never_opens() {
    let mut rig = rig();
    rig.expect_denied(Exit, None, Some("UNKNOWN-999".into()))
        .unwrap();
    rig.sim(Exit).set_inductive(false);
    let out = rig.tick(Exit).unwrap();
    assert!(!out.green_light);
    assert_eq!(rig.state(Exit), GateState::Idle);
}

#[test]
fn revoked_driver_is_refused_but_parked_car_can_leave() {
    let mut rig = rig();
    let plate = LicensePlate::from("REV-1");
    rig.lot.add_authorized_driver("D1");
    rig.drive_through(Entry, Some("D1".into()), Some(plate.clone()))
        .unwrap();

    rig.lot.remove_authorized_driver("D1");
    rig.expect_denied(Entry, Some("D1".into()), Some("REV-2".into()))
        .unwrap();

    rig.drive_through(Exit, None, Some(plate.clone())).unwrap();
    assert_eq!(rig.lot.parked_count(), 0);
}
