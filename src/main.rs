//! Example run: two writes and three read-backs through the full handshake,
//! with per-transaction latencies.

use memctrl_simulator::controller::ControllerConfig;
use memctrl_simulator::harness::{Harness, HarnessConfig};
use memctrl_simulator::memory::MemoryConfig;
use memctrl_simulator::system::System;

fn main() {
    let controller_config = ControllerConfig {
        addr_width_bits: 8,
        data_width_bits: 8,
    };
    let memory_config = MemoryConfig {
        data_width_bits: 8,
        depth: 256, // 2^8: address space exactly covers the array
    };
    let system = System::new(controller_config, memory_config);
    let mut harness = Harness::new(system, HarnessConfig { reset_cycles: 2 });

    println!("=== Memory Access Controller Simulation ===\n");
    println!(
        "8-bit address, 8-bit data, depth {}; reset held for 2 cycles.\n",
        harness.system().memory().depth()
    );

    let done = harness.write(0x10, 0xAB);
    println!("Write 0xAB -> [0x10]   done after {} cycles", done.latency);

    let done = harness.read(0x10);
    println!("Read  [0x10] = {:#04X}  done after {} cycles", done.value, done.latency);

    let done = harness.write(0x20, 0xCD);
    println!("Write 0xCD -> [0x20]   done after {} cycles", done.latency);

    let done = harness.read(0x20);
    println!("Read  [0x20] = {:#04X}  done after {} cycles", done.value, done.latency);

    // The first word must still be intact after the intervening write.
    let done = harness.read(0x10);
    println!("Read  [0x10] = {:#04X}  done after {} cycles", done.value, done.latency);

    let m = harness.metrics();
    println!("\n--- Summary ---");
    println!("  Controller state: {}", harness.system().controller_state());
    println!("  Total cycles:     {}", m.total_cycles);
    println!("  Writes completed: {}", m.writes);
    println!("  Reads completed:  {}", m.reads);
    println!("  Latency min/avg/max: {}/{:.1}/{} cycles", m.min_latency, m.avg_latency(), m.max_latency);
}
