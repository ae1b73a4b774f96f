//! Composed system: access controller wired to the memory array, stepped
//! one clock edge at a time.

use crate::controller::{Controller, ControllerConfig};
use crate::memory::{MemoryArray, MemoryConfig};
use crate::signal::{CtrlInputs, CtrlOutputs, CtrlState, Cycle, MemResponse};

/// Controller plus memory array behind a single `tick`.
///
/// Two-phase register semantics per tick, in dependency order:
/// 1. the controller commits, observing the memory response registered at
///    the *previous* tick (never a same-cycle recomputation);
/// 2. the memory commits, observing the command the controller just
///    registered, and its response is held for the next tick.
///
/// This is what gives the minimum Idle-to-Done latency of two cycles:
/// one edge to enter Writing/Reading, one more to observe ready.
pub struct System {
    controller: Controller,
    memory: MemoryArray,
    /// Memory response as of the last clock edge.
    mem_resp: MemResponse,
    current_cycle: Cycle,
}

impl System {
    pub fn new(controller_config: ControllerConfig, memory_config: MemoryConfig) -> Self {
        Self {
            controller: Controller::new(controller_config),
            memory: MemoryArray::new(memory_config),
            mem_resp: MemResponse::default(),
            current_cycle: 0,
        }
    }

    /// A system in the default configuration: 8-bit address, 8-bit
    /// words, depth 256 (address space exactly covers the array).
    pub fn with_defaults() -> Self {
        Self::new(ControllerConfig::default(), MemoryConfig::default())
    }

    /// Advance one clock edge and return the controller's registered outputs.
    pub fn tick(&mut self, inputs: &CtrlInputs) -> CtrlOutputs {
        let outputs = self.controller.tick(inputs, &self.mem_resp);
        self.mem_resp = self.memory.tick(&self.controller.mem_command());
        self.current_cycle += 1;
        outputs
    }

    pub fn current_cycle(&self) -> Cycle {
        self.current_cycle
    }

    pub fn controller_state(&self) -> CtrlState {
        self.controller.state()
    }

    pub fn memory(&self) -> &MemoryArray {
        &self.memory
    }
}
