//! Integration test: emergency stop handling.
//!
//! E-stop preempts every state, holds the barrier where it is, and the gate
//! returns to the idle loop on the first cycle after release.

use std::time::Duration;

use parking_common::io::{GateInputs, SignalLight};
use parking_common::state::{GateDirection, GateState};

use parking_gate::lot::ParkingLot;
use parking_gate::sim::BarrierPosition;
use parking_gate::sim::scenario::Rig;

use GateDirection::Entry;

fn authorized_rig() -> Rig {
    let rig = Rig::new(ParkingLot::new(), Duration::from_millis(10), false);
    rig.lot.add_authorized_driver("D1");
    rig
}

/// Tick the entry gate until it reaches `state`.
fn advance_to(rig: &mut Rig, state: GateState) {
    rig.wait_for(Entry, "target state", |_, s| s == state).unwrap();
}

#[test]
fn e_stop_preempts_every_state() {
    for target in [
        GateState::Idle,
        GateState::Validation,
        GateState::OpeningGate,
        GateState::OpenGateWaitForCar,
        GateState::ClosingGate,
    ] {
        let mut rig = authorized_rig();
        rig.sim(Entry).arrive(Some("D1".into()), Some("E-1".into()));
        rig.sim(Entry).set_inductive(true);
        if target == GateState::ClosingGate {
            advance_to(&mut rig, GateState::OpenGateWaitForCar);
            rig.sim(Entry).set_inductive(false);
        }
        if target != GateState::Idle {
            advance_to(&mut rig, target);
        }

        rig.sim(Entry).set_e_stop(true);
        let out = rig.tick(Entry).unwrap();
        assert_eq!(rig.state(Entry), GateState::Emergency, "from {target:?}");
        assert_eq!(out.lit(), Some(SignalLight::Red));
        assert!(out.actuators_idle(), "from {target:?}");
    }
}

#[test]
fn barrier_holds_position_during_emergency() {
    let mut rig = authorized_rig();
    rig.sim(Entry).arrive(Some("D1".into()), Some("E-2".into()));
    rig.sim(Entry).set_inductive(true);
    advance_to(&mut rig, GateState::OpeningGate);
    let frozen = rig.runner(Entry).io().barrier().position();
    assert_ne!(frozen, BarrierPosition::Open);

    rig.sim(Entry).set_e_stop(true);
    for _ in 0..5 {
        rig.tick(Entry).unwrap();
        assert_eq!(rig.runner(Entry).io().barrier().position(), frozen);
    }
}

#[test]
fn release_returns_to_idle_and_entry_resumes() {
    let mut rig = authorized_rig();
    rig.sim(Entry).arrive(Some("D1".into()), Some("E-3".into()));
    rig.sim(Entry).set_inductive(true);
    rig.sim(Entry).set_e_stop(true);
    for _ in 0..3 {
        rig.tick(Entry).unwrap();
    }
    assert_eq!(rig.lot.parked_count(), 0);

    rig.sim(Entry).set_e_stop(false);
    let out = rig.tick(Entry).unwrap();
    assert_eq!(out.lit(), Some(SignalLight::Red));
    assert!(out.actuators_idle());
    assert_eq!(rig.state(Entry), GateState::Idle);

    rig.drive_through(Entry, Some("D1".into()), Some("E-3".into()))
        .unwrap();
    assert_eq!(rig.lot.parked_count(), 1);
}

#[test]
fn e_stop_during_validation_keeps_slot_free() {
    let lot = ParkingLot::new();
    lot.add_authorized_driver("D1");
    let mut gate = lot.init_entry_gate();
    let mut inputs = GateInputs {
        inductive_sensor: true,
        gate_fully_closed: true,
        driver_id: Some("D1".into()),
        license_plate: Some("E-4".into()),
        ..Default::default()
    };

    gate.run_cycle(&inputs).unwrap();
    assert_eq!(gate.state(), GateState::Validation);

    inputs.e_stop = true;
    gate.run_cycle(&inputs).unwrap();
    assert_eq!(gate.state(), GateState::Emergency);
    assert_eq!(lot.parked_count(), 0);
}

#[test]
fn e_stop_on_one_gate_leaves_the_other_running() {
    let mut rig = authorized_rig();
    rig.sim(Entry).set_e_stop(true);
    rig.tick(Entry).unwrap();

    rig.drive_through(GateDirection::Exit, None, Some("NOPE".into()))
        .unwrap_err();
    assert!(matches!(
        rig.state(GateDirection::Exit),
        GateState::Idle | GateState::Validation
    ));
    assert_eq!(rig.state(Entry), GateState::Emergency);
}
