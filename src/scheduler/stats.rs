/*
 * Run Statistics
 *
 * Aggregates the counters a scheduling run reports: per-burst wait and
 * turnaround samples, context switches and preemptions. Averages are
 * taken over the total CPU-burst count of the workload, and the average
 * CPU burst time is a property of the workload alone.
 */

use std::io::{self, Write};

use super::process::Process;
use super::types::Algorithm;

/// Counters for one algorithm's run over one workload.
#[derive(Debug, Clone)]
pub struct RunStats {
    algorithm: Algorithm,
    /// Sum of all CPU burst lengths in the workload.
    total_burst_ms: u64,
    /// Number of CPU bursts in the workload.
    burst_count: u64,
    /// Ready-queue milliseconds summed over completed bursts.
    total_wait_ms: u64,
    /// Turnaround milliseconds summed over completed bursts.
    total_turnaround_ms: u64,
    n_context_switches: u64,
    n_preemptions: u64,
}

impl RunStats {
    /// Seed the workload-derived figures from the process table.
    pub fn new(algorithm: Algorithm, table: &[Process]) -> Self {
        let mut total_burst_ms = 0;
        let mut burst_count = 0;
        for process in table {
            for burst in process.cpu_burst_lengths() {
                total_burst_ms += burst;
                burst_count += 1;
            }
        }
        Self {
            algorithm,
            total_burst_ms,
            burst_count,
            total_wait_ms: 0,
            total_turnaround_ms: 0,
            n_context_switches: 0,
            n_preemptions: 0,
        }
    }

    /// Record a completed CPU burst's accounting sample.
    pub fn record_burst(&mut self, wait_ms: u64, turnaround_ms: u64) {
        self.total_wait_ms += wait_ms;
        self.total_turnaround_ms += turnaround_ms;
    }

    pub fn count_context_switch(&mut self) {
        self.n_context_switches += 1;
    }

    pub fn count_preemption(&mut self) {
        self.n_preemptions += 1;
    }

    pub fn context_switches(&self) -> u64 {
        self.n_context_switches
    }

    pub fn preemptions(&self) -> u64 {
        self.n_preemptions
    }

    pub fn average_cpu_burst(&self) -> f64 {
        self.average(self.total_burst_ms)
    }

    pub fn average_wait(&self) -> f64 {
        self.average(self.total_wait_ms)
    }

    pub fn average_turnaround(&self) -> f64 {
        self.average(self.total_turnaround_ms)
    }

    fn average(&self, total: u64) -> f64 {
        if self.burst_count == 0 {
            0.0
        } else {
            total as f64 / self.burst_count as f64
        }
    }

    /// Append this run's summary block to the statistics file.
    pub fn write_summary(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Algorithm {}", self.algorithm.name())?;
        writeln!(
            out,
            "-- average CPU burst time: {:.3} ms",
            self.average_cpu_burst()
        )?;
        writeln!(out, "-- average wait time: {:.3} ms", self.average_wait())?;
        writeln!(
            out,
            "-- average turnaround time: {:.3} ms",
            self.average_turnaround()
        )?;
        writeln!(
            out,
            "-- total number of context switches: {}",
            self.n_context_switches
        )?;
        writeln!(
            out,
            "-- total number of preemptions: {}",
            self.n_preemptions
        )
    }
}
