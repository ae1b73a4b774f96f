//! Requester-side harness: drives the level handshake (hold start until
//! done, then drop it) and records per-transaction metrics.

use crate::metrics::Metrics;
use crate::signal::{CtrlInputs, Cycle, Operation};
use crate::system::System;

/// Harness configuration.
#[derive(Clone, Debug)]
pub struct HarnessConfig {
    /// Length of the initial reset pulse, in cycles.
    pub reset_cycles: u32,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self { reset_cycles: 2 }
    }
}

/// Outcome of one completed transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    /// Read result for a read transaction; 0 for writes.
    pub value: u64,
    /// Cycles from request assertion to the first observed done.
    pub latency: Cycle,
}

/// Protocol driver for a composed [`System`].
///
/// Each transaction holds the request lines stable until `done` is
/// observed, then drops the request for one cycle so the controller
/// traverses `Done -> Idle` before the next request. The drive loop is
/// unbounded: the memory array always acknowledges one cycle after an
/// enable, so every transaction terminates by construction.
pub struct Harness {
    system: System,
    pub metrics: Metrics,
}

impl Harness {
    /// Wraps a system and applies the initial reset pulse.
    pub fn new(system: System, config: HarnessConfig) -> Self {
        let mut harness = Self {
            system,
            metrics: Metrics::new(),
        };
        harness.reset(config.reset_cycles);
        harness
    }

    /// Default-configuration system behind a default harness.
    pub fn with_defaults() -> Self {
        Self::new(System::with_defaults(), HarnessConfig::default())
    }

    /// Hold reset high for the given number of cycles.
    pub fn reset(&mut self, cycles: u32) {
        let inputs = CtrlInputs {
            reset: true,
            ..CtrlInputs::default()
        };
        for _ in 0..cycles {
            self.system.tick(&inputs);
        }
        self.metrics.total_cycles = self.system.current_cycle();
    }

    /// Advance the clock with no request asserted.
    pub fn idle(&mut self, cycles: u32) {
        let inputs = CtrlInputs::default();
        for _ in 0..cycles {
            self.system.tick(&inputs);
        }
        self.metrics.total_cycles = self.system.current_cycle();
    }

    /// Issue a write and drive it to completion.
    pub fn write(&mut self, address: u64, value: u64) -> Completion {
        self.issue(Operation::Write, address, value)
    }

    /// Issue a read and drive it to completion.
    pub fn read(&mut self, address: u64) -> Completion {
        self.issue(Operation::Read, address, 0)
    }

    fn issue(&mut self, op: Operation, address: u64, write_value: u64) -> Completion {
        let inputs = CtrlInputs {
            reset: false,
            start: true,
            op,
            address,
            write_value,
        };
        let mut latency = 0;
        let result = loop {
            let out = self.system.tick(&inputs);
            latency += 1;
            if out.done {
                break out.read_result;
            }
        };
        // Drop the request for one cycle so the FSM returns to Idle.
        self.system.tick(&CtrlInputs::default());
        self.metrics.record_op(op, latency);
        self.metrics.total_cycles = self.system.current_cycle();
        let value = match op {
            Operation::Read => result,
            Operation::Write => 0,
        };
        Completion { value, latency }
    }

    pub fn system(&self) -> &System {
        &self.system
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}
