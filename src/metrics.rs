//! Metrics collection: transaction counts, cycles, and handshake latencies.

use crate::signal::{Cycle, Operation};

/// Aggregate transaction metrics, recorded by the harness as each
/// request completes its handshake.
#[derive(Clone, Default, Debug)]
pub struct Metrics {
    /// Total simulation cycles consumed, including reset and recovery.
    pub total_cycles: Cycle,
    /// Completed write transactions.
    pub writes: u64,
    /// Completed read transactions.
    pub reads: u64,
    /// Sum of request-to-done latencies over all transactions.
    pub latency_cycles: Cycle,
    /// Smallest observed request-to-done latency (0 until first record).
    pub min_latency: Cycle,
    /// Largest observed request-to-done latency.
    pub max_latency: Cycle,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_op(&mut self, op: Operation, latency: Cycle) {
        match op {
            Operation::Write => self.writes += 1,
            Operation::Read => self.reads += 1,
        }
        self.latency_cycles += latency;
        if self.total_ops() == 1 || latency < self.min_latency {
            self.min_latency = latency;
        }
        if latency > self.max_latency {
            self.max_latency = latency;
        }
    }

    pub fn total_ops(&self) -> u64 {
        self.reads + self.writes
    }

    /// Mean request-to-done latency, or 0 with no transactions.
    pub fn avg_latency(&self) -> f64 {
        let ops = self.total_ops();
        if ops == 0 {
            return 0.0;
        }
        self.latency_cycles as f64 / ops as f64
    }
}
