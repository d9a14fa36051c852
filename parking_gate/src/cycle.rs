//! Fixed-rate scan cycle: read → process → write.
//!
//! A [`CycleRunner`] pairs one [`GateController`] with one [`GateIo`]
//! implementation (field hardware or the simulator) and executes the
//! three-phase cycle body at a fixed rate.
//!
//! ## Cycle Body
//! 1. Read the input snapshot from the I/O layer.
//! 2. Run one controller step.
//! 3. Write the output snapshot back to the I/O layer.
//!
//! ## Pacing
//! [`CycleRunner::run`] sleeps away the remainder of each cycle. Overruns are
//! counted and logged; the cycle itself never blocks, so an overrun only
//! delays the next sample.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use parking_common::io::{GateInputs, GateOutputs};
use thiserror::Error;
use tracing::{info, warn};

use crate::error::GateError;
use crate::gate::GateController;

// ─── I/O Seam ───────────────────────────────────────────────────────

/// Field I/O for one gate.
pub trait GateIo {
    /// Sample all inputs for this cycle.
    fn read_inputs(&mut self) -> GateInputs;

    /// Apply this cycle's outputs.
    fn write_outputs(&mut self, outputs: &GateOutputs);
}

// ─── Cycle Statistics ───────────────────────────────────────────────

/// O(1) per-cycle timing statistics.
#[derive(Debug, Clone)]
pub struct CycleStats {
    /// Total cycles executed.
    pub cycle_count: u64,
    /// Last cycle duration [ns].
    pub last_cycle_ns: u64,
    /// Minimum cycle duration [ns].
    pub min_cycle_ns: u64,
    /// Maximum cycle duration [ns].
    pub max_cycle_ns: u64,
    /// Running sum for average computation.
    pub sum_cycle_ns: u128,
    /// Number of overruns detected.
    pub overruns: u64,
}

impl CycleStats {
    pub const fn new() -> Self {
        Self {
            cycle_count: 0,
            last_cycle_ns: 0,
            min_cycle_ns: u64::MAX,
            max_cycle_ns: 0,
            sum_cycle_ns: 0,
            overruns: 0,
        }
    }

    /// Record a cycle duration. O(1), no allocation.
    #[inline]
    pub fn record(&mut self, duration_ns: u64) {
        self.cycle_count += 1;
        self.last_cycle_ns = duration_ns;
        self.min_cycle_ns = self.min_cycle_ns.min(duration_ns);
        self.max_cycle_ns = self.max_cycle_ns.max(duration_ns);
        self.sum_cycle_ns += duration_ns as u128;
    }

    /// Average cycle time [ns] (returns 0 if no cycles).
    #[inline]
    pub fn avg_cycle_ns(&self) -> u64 {
        if self.cycle_count == 0 {
            0
        } else {
            (self.sum_cycle_ns / self.cycle_count as u128) as u64
        }
    }
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Errors ─────────────────────────────────────────────────────────

/// Errors that stop a cycle loop.
#[derive(Debug, Error)]
pub enum CycleError {
    /// Controller fault (fatal).
    #[error("controller fault: {0}")]
    Gate(#[from] GateError),
}

// ─── Cycle Runner ───────────────────────────────────────────────────

/// Drives one gate controller against one I/O layer.
pub struct CycleRunner<IO: GateIo> {
    controller: GateController,
    io: IO,
    cycle_time: Duration,
    stats: CycleStats,
    last_outputs: GateOutputs,
}

impl<IO: GateIo> CycleRunner<IO> {
    pub fn new(controller: GateController, io: IO, cycle_time: Duration) -> Self {
        Self {
            controller,
            io,
            cycle_time,
            stats: CycleStats::new(),
            last_outputs: GateOutputs::default(),
        }
    }

    #[inline]
    pub fn controller(&self) -> &GateController {
        &self.controller
    }

    #[inline]
    pub fn io(&self) -> &IO {
        &self.io
    }

    #[inline]
    pub fn io_mut(&mut self) -> &mut IO {
        &mut self.io
    }

    #[inline]
    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    /// Outputs written by the most recent cycle.
    #[inline]
    pub fn last_outputs(&self) -> &GateOutputs {
        &self.last_outputs
    }

    /// Execute one unpaced cycle and return its outputs.
    pub fn step(&mut self) -> Result<GateOutputs, CycleError> {
        let start = Instant::now();

        // ═══ READ ═══
        let inputs = self.io.read_inputs();
        // ═══ PROCESS ═══
        let outputs = self.controller.run_cycle(&inputs)?;
        // ═══ WRITE ═══
        self.io.write_outputs(&outputs);

        let elapsed_ns = start.elapsed().as_nanos() as u64;
        self.stats.record(elapsed_ns);
        if elapsed_ns > self.cycle_time.as_nanos() as u64 {
            self.stats.overruns += 1;
        }
        self.last_outputs = outputs;
        Ok(outputs)
    }

    /// Execute one cycle, then sleep until the cycle boundary.
    pub fn step_paced(&mut self) -> Result<GateOutputs, CycleError> {
        let start = Instant::now();
        let overruns = self.stats.overruns;
        let outputs = self.step()?;
        if self.stats.overruns > overruns {
            warn!(
                gate = self.controller.name(),
                actual_ns = self.stats.last_cycle_ns,
                budget_ns = self.cycle_time.as_nanos() as u64,
                "cycle overrun"
            );
        }
        if let Some(remaining) = self.cycle_time.checked_sub(start.elapsed()) {
            std::thread::sleep(remaining);
        }
        Ok(outputs)
    }

    /// Fixed-rate loop until `running` drops to false.
    ///
    /// # Errors
    /// Returns on the first controller fault.
    pub fn run(&mut self, running: &AtomicBool) -> Result<(), CycleError> {
        info!(
            gate = self.controller.name(),
            cycle_us = self.cycle_time.as_micros() as u64,
            "entering scan loop"
        );
        while running.load(Ordering::SeqCst) {
            self.step_paced()?;
        }
        info!(
            gate = self.controller.name(),
            cycles = self.stats.cycle_count,
            avg_ns = self.stats.avg_cycle_ns(),
            max_ns = self.stats.max_cycle_ns,
            overruns = self.stats.overruns,
            "scan loop stopped"
        );
        Ok(())
    }

    /// Tear down the runner, returning its parts.
    pub fn into_parts(self) -> (GateController, IO) {
        (self.controller, self.io)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
