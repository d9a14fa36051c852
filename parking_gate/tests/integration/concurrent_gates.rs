//! Integration test: several gates of one lot cycling on their own threads.
//!
//! Slot reservation is atomic, so concurrent entry gates can never push
//! occupancy past capacity, and administrative calls can run while gates
//! are mid-cycle.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use parking_common::io::LicensePlate;
use parking_common::state::GateState;

use parking_gate::cycle::CycleRunner;
use parking_gate::lot::ParkingLot;
use parking_gate::sim::SimulatedGate;

type Runner = CycleRunner<SimulatedGate>;

const GATES: usize = 4;
const CARS_PER_GATE: usize = 20;

fn entry_runner(lot: &ParkingLot) -> Runner {
    CycleRunner::new(lot.init_entry_gate(), SimulatedGate::new(), Duration::from_millis(1))
}

/// Present one vehicle. Returns whether the gate let it in.
fn present(runner: &mut Runner, driver: &str, plate: LicensePlate) -> bool {
    let sim = runner.io_mut();
    sim.arrive(Some(driver.into()), Some(plate));
    sim.set_inductive(true);

    let mut validating = false;
    for _ in 0..32 {
        let out = runner.step().unwrap();
        let state = runner.controller().state();
        if out.green_light {
            let sim = runner.io_mut();
            sim.set_inductive(false);
            sim.clear_credentials();
            while runner.controller().state() != GateState::Idle {
                runner.step().unwrap();
            }
            return true;
        }
        if validating && state == GateState::Idle {
            runner.io_mut().set_inductive(false);
            runner.step().unwrap();
            return false;
        }
        validating = state == GateState::Validation;
    }
    panic!("{}: no verdict within 32 ticks", runner.controller().name());
}

#[test]
fn concurrent_entry_gates_never_overshoot_capacity() {
    let capacity = 30;
    let lot = ParkingLot::with_capacity(capacity);
    lot.add_authorized_driver("D1");
    let admitted = AtomicUsize::new(0);

    thread::scope(|s| {
        for g in 0..GATES {
            let mut runner = entry_runner(&lot);
            let (lot, admitted) = (&lot, &admitted);
            s.spawn(move || {
                for c in 0..CARS_PER_GATE {
                    if present(&mut runner, "D1", format!("G{g}-C{c}").into()) {
                        admitted.fetch_add(1, Ordering::Relaxed);
                    }
                    assert!(lot.parked_count() <= capacity);
                }
            });
        }
    });

    assert_eq!(admitted.load(Ordering::Relaxed), capacity);
    assert_eq!(lot.parked_count(), capacity);
}

#[test]
fn same_plate_on_two_gates_is_admitted_once() {
    let lot = ParkingLot::new();
    lot.add_authorized_driver("D1");
    let admitted = AtomicUsize::new(0);

    thread::scope(|s| {
        for _ in 0..GATES {
            let mut runner = entry_runner(&lot);
            let admitted = &admitted;
            s.spawn(move || {
                if present(&mut runner, "D1", "TWIN-1".into()) {
                    admitted.fetch_add(1, Ordering::Relaxed);
                }
            });
        }
    });

    assert_eq!(admitted.load(Ordering::Relaxed), 1);
    assert_eq!(lot.parked_count(), 1);
}

#[test]
fn admin_calls_run_alongside_gate_cycles() {
    let lot = ParkingLot::new();
    lot.add_authorized_driver("D1");
    let done = AtomicBool::new(false);

    thread::scope(|s| {
        let mut runner = entry_runner(&lot);
        let done_ref = &done;
        let gate = s.spawn(move || {
            let mut admitted = 0;
            for c in 0..CARS_PER_GATE {
                if present(&mut runner, "D1", format!("ADM-{c}").into()) {
                    admitted += 1;
                }
            }
            done_ref.store(true, Ordering::Release);
            admitted
        });

        let mut churn = 0u32;
        while !done.load(Ordering::Acquire) {
            let id = format!("TEMP-{}", churn % 8);
            lot.add_authorized_driver(id.as_str());
            lot.remove_authorized_driver(id.as_str());
            churn += 1;
        }

        assert_eq!(gate.join().unwrap(), CARS_PER_GATE);
    });

    assert_eq!(lot.parked_count(), CARS_PER_GATE);
    assert_eq!(lot.registry().authorized_count(), 1);
}
