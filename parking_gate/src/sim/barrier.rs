//! Barrier travel model.
//!
//! One command cycle moves the barrier one step: an open command goes
//! Closed → Travelling → Open, a close command Open → Travelling → Closed.
//! With no command the barrier stays where it is.

use parking_common::io::GateOutputs;
use tracing::trace;

/// Where the barrier arm is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarrierPosition {
    Closed,
    /// Between limit switches. Power-on position: the arm reports nothing.
    #[default]
    Travelling,
    Open,
}

/// Simulated barrier arm with two limit switches.
#[derive(Debug, Clone, Default)]
pub struct Barrier {
    position: BarrierPosition,
    /// Commanded movements applied so far.
    moves: u64,
}

impl Barrier {
    pub fn new(position: BarrierPosition) -> Self {
        Self { position, moves: 0 }
    }

    #[inline]
    pub fn position(&self) -> BarrierPosition {
        self.position
    }

    #[inline]
    pub fn moves(&self) -> u64 {
        self.moves
    }

    #[inline]
    pub fn fully_open(&self) -> bool {
        self.position == BarrierPosition::Open
    }

    #[inline]
    pub fn fully_closed(&self) -> bool {
        self.position == BarrierPosition::Closed
    }

    /// Apply one cycle of actuator commands.
    pub fn apply(&mut self, outputs: &GateOutputs) {
        use BarrierPosition::*;

        let next = match (outputs.open_gate, outputs.close_gate, self.position) {
            // Conflicting or absent commands: the drive holds position.
            (true, true, p) | (false, false, p) => p,
            (true, false, Closed) => Travelling,
            (true, false, Travelling | Open) => Open,
            (false, true, Open) => Travelling,
            (false, true, Travelling | Closed) => Closed,
        };

        if next != self.position {
            trace!(from = ?self.position, to = ?next, "barrier moved");
            self.moves += 1;
            self.position = next;
        }
    }
}
