//! Access controller: a four-state FSM bridging the requester's level
//! handshake to the memory array's one-cycle pulse handshake.

use crate::signal::{width_mask, CtrlInputs, CtrlOutputs, CtrlState, MemCommand, MemResponse, Operation, Request};

/// Configuration for the access controller.
#[derive(Clone, Debug)]
pub struct ControllerConfig {
    /// Address line width in bits (1..=64).
    pub addr_width_bits: u32,
    /// Data line width in bits (1..=64).
    pub data_width_bits: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            addr_width_bits: 8,
            data_width_bits: 8,
        }
    }
}

/// The access controller. One request is in flight at a time: the
/// explicit `Done` state holds the FSM until the requester drops its
/// request line, which is what enforces one outstanding operation.
///
/// Outputs are registered from the state current at each edge (Moore
/// style), so every output lags its cause by one cycle.
pub struct Controller {
    config: ControllerConfig,
    addr_mask: u64,
    data_mask: u64,
    state: CtrlState,
    /// Request fields captured at the `Idle` exit; the input lines are
    /// ignored until the FSM returns to `Idle`.
    latched: Request,
    /// Registered command lines toward the memory array.
    cmd: MemCommand,
    /// Registered requester-facing outputs.
    outputs: CtrlOutputs,
}

impl Controller {
    pub fn new(config: ControllerConfig) -> Self {
        assert!(
            config.addr_width_bits >= 1 && config.addr_width_bits <= 64,
            "address width must be 1..=64 bits"
        );
        assert!(
            config.data_width_bits >= 1 && config.data_width_bits <= 64,
            "data width must be 1..=64 bits"
        );
        let addr_mask = width_mask(config.addr_width_bits);
        let data_mask = width_mask(config.data_width_bits);
        Self {
            config,
            addr_mask,
            data_mask,
            state: CtrlState::Idle,
            latched: Request::default(),
            cmd: MemCommand::default(),
            outputs: CtrlOutputs::default(),
        }
    }

    /// One clock edge. `mem` must carry the memory response as committed
    /// by the *previous* cycle, never a same-cycle recomputation.
    ///
    /// Reset has priority over all transition logic: it forces `Idle`
    /// and clears every registered output on this edge.
    pub fn tick(&mut self, inputs: &CtrlInputs, mem: &MemResponse) -> CtrlOutputs {
        if inputs.reset {
            self.state = CtrlState::Idle;
            self.latched = Request::default();
            self.cmd = MemCommand::default();
            self.outputs = CtrlOutputs::default();
            return self.outputs;
        }

        // Outputs are driven from the state current at this edge; the
        // state register then commits the transition from the same
        // snapshot.
        match self.state {
            CtrlState::Idle => {
                self.cmd = MemCommand::default();
                self.outputs.done = false;
                if inputs.start {
                    self.latched = Request {
                        op: inputs.op,
                        address: inputs.address & self.addr_mask,
                        value: inputs.write_value & self.data_mask,
                    };
                    self.state = match inputs.op {
                        Operation::Write => CtrlState::Writing,
                        Operation::Read => CtrlState::Reading,
                    };
                }
            }
            CtrlState::Writing => {
                self.cmd = MemCommand {
                    write_enable: true,
                    read_enable: false,
                    address: self.latched.address,
                    write_data: self.latched.value,
                };
                if mem.ready {
                    self.state = CtrlState::Done;
                }
            }
            CtrlState::Reading => {
                self.cmd = MemCommand {
                    write_enable: false,
                    read_enable: true,
                    address: self.latched.address,
                    write_data: 0,
                };
                // Captured every cycle in Reading; the capture that
                // coincides with ready holds the fetched word.
                self.outputs.read_result = mem.read_data;
                if mem.ready {
                    self.state = CtrlState::Done;
                }
            }
            CtrlState::Done => {
                self.cmd = MemCommand::default();
                self.outputs.done = true;
                if !inputs.start {
                    self.state = CtrlState::Idle;
                }
            }
        }
        self.outputs
    }

    /// Command lines toward the memory array, as registered at the last edge.
    pub fn mem_command(&self) -> MemCommand {
        self.cmd
    }

    pub fn state(&self) -> CtrlState {
        self.state
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl() -> Controller {
        Controller::new(ControllerConfig::default())
    }

    fn quiet() -> CtrlInputs {
        CtrlInputs::default()
    }

    fn write_req(address: u64, value: u64) -> CtrlInputs {
        CtrlInputs {
            reset: false,
            start: true,
            op: Operation::Write,
            address,
            write_value: value,
        }
    }

    fn read_req(address: u64) -> CtrlInputs {
        CtrlInputs {
            reset: false,
            start: true,
            op: Operation::Read,
            address,
            write_value: 0,
        }
    }

    fn no_mem() -> MemResponse {
        MemResponse::default()
    }

    #[test]
    fn starts_idle_with_inactive_outputs() {
        let c = ctrl();
        assert_eq!(c.state(), CtrlState::Idle);
        assert_eq!(c.mem_command(), MemCommand::default());
    }

    #[test]
    fn idle_holds_without_start() {
        let mut c = ctrl();
        let out = c.tick(&quiet(), &no_mem());
        assert_eq!(c.state(), CtrlState::Idle);
        assert!(!out.done);
    }

    #[test]
    fn start_write_enters_writing_and_drives_enables_next_edge() {
        let mut c = ctrl();
        c.tick(&write_req(0x10, 0xAB), &no_mem());
        // Transition committed; outputs this edge were still Idle's.
        assert_eq!(c.state(), CtrlState::Writing);
        assert!(!c.mem_command().write_enable);

        c.tick(&write_req(0x10, 0xAB), &no_mem());
        let cmd = c.mem_command();
        assert!(cmd.write_enable);
        assert!(!cmd.read_enable);
        assert_eq!(cmd.address, 0x10);
        assert_eq!(cmd.write_data, 0xAB);
    }

    #[test]
    fn start_read_enters_reading() {
        let mut c = ctrl();
        c.tick(&read_req(0x10), &no_mem());
        assert_eq!(c.state(), CtrlState::Reading);
        c.tick(&read_req(0x10), &no_mem());
        let cmd = c.mem_command();
        assert!(cmd.read_enable);
        assert!(!cmd.write_enable);
        assert_eq!(cmd.address, 0x10);
    }

    #[test]
    fn holds_in_writing_until_ready() {
        let mut c = ctrl();
        c.tick(&write_req(0x10, 0xAB), &no_mem());
        for _ in 0..3 {
            c.tick(&write_req(0x10, 0xAB), &no_mem());
            assert_eq!(c.state(), CtrlState::Writing);
        }
        c.tick(
            &write_req(0x10, 0xAB),
            &MemResponse {
                ready: true,
                read_data: 0,
            },
        );
        assert_eq!(c.state(), CtrlState::Done);
    }

    #[test]
    fn reading_captures_result_and_completes() {
        let mut c = ctrl();
        c.tick(&read_req(0x10), &no_mem());
        c.tick(&read_req(0x10), &no_mem());
        let out = c.tick(
            &read_req(0x10),
            &MemResponse {
                ready: true,
                read_data: 0xAB,
            },
        );
        assert_eq!(c.state(), CtrlState::Done);
        assert_eq!(out.read_result, 0xAB);
        // done is a Moore output: asserted on the next edge, for the
        // whole Done duration.
        let out = c.tick(&read_req(0x10), &no_mem());
        assert!(out.done);
        assert_eq!(out.read_result, 0xAB);
    }

    #[test]
    fn done_holds_until_start_drops() {
        let mut c = ctrl();
        c.tick(&write_req(0x10, 0xAB), &no_mem());
        c.tick(
            &write_req(0x10, 0xAB),
            &MemResponse {
                ready: true,
                read_data: 0,
            },
        );
        assert_eq!(c.state(), CtrlState::Done);
        for _ in 0..3 {
            let out = c.tick(&write_req(0x10, 0xAB), &no_mem());
            assert_eq!(c.state(), CtrlState::Done);
            assert!(out.done);
        }
        c.tick(&quiet(), &no_mem());
        assert_eq!(c.state(), CtrlState::Idle);
        let out = c.tick(&quiet(), &no_mem());
        assert!(!out.done);
    }

    #[test]
    fn busy_lockout_keeps_latched_request() {
        let mut c = ctrl();
        c.tick(&write_req(0x10, 0xAB), &no_mem());
        // A different request on the lines mid-operation must not be adopted.
        c.tick(&write_req(0x20, 0xCD), &no_mem());
        let cmd = c.mem_command();
        assert_eq!(cmd.address, 0x10);
        assert_eq!(cmd.write_data, 0xAB);
    }

    #[test]
    fn withdrawal_mid_operation_is_ignored() {
        let mut c = ctrl();
        c.tick(&write_req(0x10, 0xAB), &no_mem());
        c.tick(&quiet(), &no_mem());
        assert_eq!(c.state(), CtrlState::Writing);
        let cmd = c.mem_command();
        assert!(cmd.write_enable);
        assert_eq!(cmd.address, 0x10);
    }

    #[test]
    fn reset_forces_idle_and_clears_outputs() {
        let mut c = ctrl();
        c.tick(&write_req(0x10, 0xAB), &no_mem());
        c.tick(
            &write_req(0x10, 0xAB),
            &MemResponse {
                ready: true,
                read_data: 0,
            },
        );
        assert_eq!(c.state(), CtrlState::Done);
        let reset = CtrlInputs {
            reset: true,
            ..write_req(0x10, 0xAB)
        };
        let out = c.tick(&reset, &no_mem());
        assert_eq!(c.state(), CtrlState::Idle);
        assert!(!out.done);
        assert_eq!(out.read_result, 0);
        assert_eq!(c.mem_command(), MemCommand::default());
    }

    #[test]
    fn request_fields_are_masked_at_latch() {
        let mut c = Controller::new(ControllerConfig {
            addr_width_bits: 4,
            data_width_bits: 8,
        });
        c.tick(&write_req(0x1F, 0x1FF), &no_mem());
        c.tick(&write_req(0x1F, 0x1FF), &no_mem());
        let cmd = c.mem_command();
        assert_eq!(cmd.address, 0x0F);
        assert_eq!(cmd.write_data, 0xFF);
    }
}
