/*
 * Tick Simulator - Mechanism Layer
 *
 * Drives the virtual single CPU one millisecond per tick. Every tick
 * observes the same phase order, and the order is load-bearing:
 *
 *   1. announce the previous tick's burst boundary (and recalculate tau)
 *   2. stage arrivals and finished I/O
 *   3. advance blocked processes' I/O by 1 ms
 *   4. admit the staged set through the policy
 *   5. wait-tick the ready queue
 *   6. advance or initiate context switches, evaluate preemption
 *   7. run the CPU for 1 ms
 *   8. advance the clock
 *
 * Context switches are two separate t_cs/2 halves. A finished burst
 * triggers a switch-out only; the CPU then goes idle and the next
 * dispatch pays for a full switch (a vacuous switch-out half followed
 * by the switch-in half). The very first dispatch of a run has nothing
 * to displace, not even a stale context, and pays only the switch-in
 * half. A preemption fuses both halves into one switch. The incoming
 * process is popped from the ready queue when its switch-in half
 * begins and starts running on the tick after the half completes.
 */

use std::collections::{BTreeSet, VecDeque};
use std::io::{self, Write};

use crate::report::Timeline;

use super::process::{NextState, ProcState, Process, RunOutcome};
use super::stats::RunStats;
use super::traits::SchedPolicy;
use super::types::{Algorithm, ProcIdx, SchedConfig};

/// Where a switched-out process lands when its half completes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum SwitchDest {
    /// Preemption victim; burst unfinished, re-enters the ready queue.
    Ready,
    /// CPU burst done, I/O burst next.
    Blocked,
    /// Final CPU burst done.
    Terminated,
}

/// CPU occupancy state.
#[derive(Debug, Copy, Clone)]
enum CpuState {
    Idle,
    Running(ProcIdx),
    SwitchingOut {
        outgoing: ProcIdx,
        dest: SwitchDest,
        /// Ticks left in this half.
        remaining: u64,
        /// A fused (preemption) switch continues into a switch-in half.
        then_in: bool,
    },
    SwitchingIn {
        /// Chosen once the switch-in half begins.
        incoming: Option<ProcIdx>,
        /// Ticks left; larger than t_cs/2 while the vacuous switch-out
        /// portion of a dispatch-from-idle elapses.
        remaining: u64,
    },
}

/// Burst boundary detected by the previous tick's run phase, announced
/// at the start of the next tick.
#[derive(Debug, Copy, Clone)]
struct PendingBoundary {
    idx: ProcIdx,
    next: NextState,
    burst_len: u64,
}

/// The tick simulator for one algorithm over one workload.
pub struct Simulator {
    config: SchedConfig,
    algorithm: Algorithm,
    policy: Box<dyn SchedPolicy>,
    /// Owner of all process state; everything else holds indices.
    table: Vec<Process>,
    now: u64,
    cpu: CpuState,
    ready: VecDeque<ProcIdx>,
    blocked: BTreeSet<ProcIdx>,
    /// Processes whose I/O finished last tick, staged next tick.
    io_done: Vec<ProcIdx>,
    /// Arrivals and I/O completions collected this tick.
    staged: Vec<ProcIdx>,
    pending: Option<PendingBoundary>,
    /// Milliseconds the running process has executed since install.
    ran_in_stint: u64,
    /// False until the run's first dispatch is initiated.
    has_dispatched: bool,
    /// Incoming process popped from the ready queue this tick; it was
    /// already wait-ticked in phase 5 and must not be charged twice.
    popped_this_tick: Option<ProcIdx>,
    stats: RunStats,
}

impl Simulator {
    /// Build a simulator run. Processes must be supplied in ascending
    /// ID order; any process without a tau estimate receives tau0.
    pub fn new(
        algorithm: Algorithm,
        policy: Box<dyn SchedPolicy>,
        mut table: Vec<Process>,
        config: SchedConfig,
    ) -> Self {
        assert!(
            table.windows(2).all(|w| w[0].id() < w[1].id()),
            "process table must be in ascending ID order"
        );
        let tau_zero = config.tau_zero();
        for process in &mut table {
            if process.tau() == 0 {
                process.set_tau(tau_zero);
            }
        }
        let stats = RunStats::new(algorithm, &table);
        log::debug!(
            "scheduler run: {} over {} processes (t_cs {} ms)",
            policy.name(),
            table.len(),
            config.t_cs
        );
        Self {
            config,
            algorithm,
            policy,
            table,
            now: 0,
            cpu: CpuState::Idle,
            ready: VecDeque::new(),
            blocked: BTreeSet::new(),
            io_done: Vec::new(),
            staged: Vec::new(),
            pending: None,
            ran_in_stint: 0,
            has_dispatched: false,
            popped_this_tick: None,
            stats,
        }
    }

    fn half(&self) -> u64 {
        self.config.t_cs / 2
    }

    fn id(&self, idx: ProcIdx) -> char {
        self.table[idx.as_usize()].id()
    }

    fn queue_ids(&self) -> Vec<char> {
        self.ready.iter().map(|&idx| self.id(idx)).collect()
    }

    fn all_terminated(&self) -> bool {
        self.table.iter().all(Process::is_terminated)
    }

    /// Run the simulation to completion, writing the timeline to `out`.
    pub fn run(&mut self, out: &mut dyn Write) -> io::Result<RunStats> {
        let mut timeline = Timeline::with_cutoff(out);
        timeline.event(
            0,
            &format!("Simulator started for {}", self.algorithm.name()),
            &[],
        )?;

        loop {
            self.announce_boundary(&mut timeline)?;
            self.stage_arrivals();
            self.block_tick();
            self.admit_staged(&mut timeline)?;
            self.wait_tick();
            let finished = self.dispatch(&mut timeline)?;
            if finished {
                timeline.event(
                    self.now,
                    &format!("Simulator ended for {}", self.algorithm.name()),
                    &self.queue_ids(),
                )?;
                break;
            }
            self.run_tick();
            self.now += 1;
            self.popped_this_tick = None;
        }

        log::debug!(
            "scheduler run: {} finished at {} ms ({} switches, {} preemptions)",
            self.policy.name(),
            self.now,
            self.stats.context_switches(),
            self.stats.preemptions()
        );
        Ok(self.stats.clone())
    }

    // ========================================================================
    // PHASE 1: BURST BOUNDARY ANNOUNCEMENT
    // ========================================================================

    fn announce_boundary(&mut self, timeline: &mut Timeline) -> io::Result<()> {
        let Some(boundary) = self.pending.take() else {
            return Ok(());
        };
        let id = self.id(boundary.idx);
        match boundary.next {
            NextState::Io => {
                let to_go = self.table[boundary.idx.as_usize()].cpu_bursts_to_go();
                timeline.event(
                    self.now,
                    &format!("Process {id} completed a CPU burst; {to_go} to go"),
                    &self.queue_ids(),
                )?;
            }
            NextState::Terminated => {
                timeline.event(
                    self.now,
                    &format!("Process {id} terminated"),
                    &self.queue_ids(),
                )?;
            }
        }
        if self.policy.uses_tau() {
            let process = &mut self.table[boundary.idx.as_usize()];
            let old_tau = process.tau();
            let new_tau = (self.config.alpha * boundary.burst_len as f64
                + (1.0 - self.config.alpha) * old_tau as f64)
                .ceil() as u64;
            process.set_tau(new_tau);
            timeline.event(
                self.now,
                &format!(
                    "Recalculated tau for process {id}: old tau {old_tau}ms; new tau {new_tau}ms"
                ),
                &self.queue_ids(),
            )?;
        }
        Ok(())
    }

    // ========================================================================
    // PHASES 2-3: ARRIVALS AND I/O
    // ========================================================================

    fn stage_arrivals(&mut self) {
        for (i, process) in self.table.iter().enumerate() {
            if process.arrival_time() == self.now {
                self.staged.push(ProcIdx(i));
            }
        }
        self.staged.append(&mut self.io_done);
        self.staged.sort();
    }

    fn block_tick(&mut self) {
        let mut completed = Vec::new();
        for &idx in &self.blocked {
            if self.table[idx.as_usize()].io_tick() {
                completed.push(idx);
            }
        }
        for idx in completed {
            self.blocked.remove(&idx);
            // Staged in phase 2 of the next tick.
            self.io_done.push(idx);
        }
    }

    // ========================================================================
    // PHASE 4: ADMISSION
    // ========================================================================

    fn admit_staged(&mut self, timeline: &mut Timeline) -> io::Result<()> {
        let staged = std::mem::take(&mut self.staged);
        for idx in staged {
            self.table[idx.as_usize()].begin_burst_accounting();
            self.policy.admit(&mut self.ready, &self.table, &[idx]);
            let process = &self.table[idx.as_usize()];
            let subject = if self.policy.uses_tau() {
                format!("Process {} (tau {}ms)", process.id(), process.tau())
            } else {
                format!("Process {}", process.id())
            };
            let verb = if process.arrival_time() == self.now {
                "arrived"
            } else {
                "completed I/O"
            };
            timeline.event(
                self.now,
                &format!("{subject} {verb}; added to ready queue"),
                &self.queue_ids(),
            )?;
        }
        Ok(())
    }

    // ========================================================================
    // PHASE 5: WAIT TICK
    // ========================================================================

    fn wait_tick(&mut self) {
        for &idx in &self.ready {
            self.table[idx.as_usize()].tick_wait();
        }
    }

    // ========================================================================
    // PHASE 6: DISPATCH AND SWITCH ADVANCEMENT
    // ========================================================================

    /// Returns true when the run is complete.
    fn dispatch(&mut self, timeline: &mut Timeline) -> io::Result<bool> {
        self.complete_switch_halves(timeline)?;

        if self.all_terminated() && matches!(self.cpu, CpuState::Idle) {
            return Ok(true);
        }

        self.initiate_switches(timeline)?;
        self.pop_incoming();
        self.charge_switch_tick();
        Ok(false)
    }

    /// Handle a switch half whose ticks have all elapsed: deposit the
    /// outgoing process, install the incoming one, or both in turn.
    fn complete_switch_halves(&mut self, timeline: &mut Timeline) -> io::Result<()> {
        if let CpuState::SwitchingOut {
            outgoing,
            dest,
            remaining: 0,
            then_in,
        } = self.cpu
        {
            match dest {
                SwitchDest::Ready => {
                    // The burst continues; the deposit tick is still
                    // context-switch time charged to it.
                    self.table[outgoing.as_usize()].tick_turnaround();
                    self.policy
                        .reinsert_preempted(&mut self.ready, &self.table, outgoing);
                }
                SwitchDest::Blocked => {
                    let (wait, turnaround) = self.table[outgoing.as_usize()].burst_accounting();
                    self.stats.record_burst(wait, turnaround);
                    self.blocked.insert(outgoing);
                }
                SwitchDest::Terminated => {
                    let (wait, turnaround) = self.table[outgoing.as_usize()].burst_accounting();
                    self.stats.record_burst(wait, turnaround);
                }
            }
            self.cpu = if then_in {
                CpuState::SwitchingIn {
                    incoming: None,
                    remaining: self.half(),
                }
            } else {
                CpuState::Idle
            };
        }

        if let CpuState::SwitchingIn {
            incoming: Some(idx),
            remaining: 0,
        } = self.cpu
        {
            self.cpu = CpuState::Running(idx);
            self.ran_in_stint = 0;
            self.stats.count_context_switch();
            let process = &self.table[idx.as_usize()];
            timeline.event(
                self.now,
                &format!(
                    "Process {} started using the CPU for {} ms burst",
                    process.id(),
                    process.remaining_in_burst()
                ),
                &self.queue_ids(),
            )?;
        }
        Ok(())
    }

    /// Start a switch when the dispatch conditions hold: the running
    /// process finished its burst, a preemption fired, or the CPU is
    /// idle with work waiting.
    fn initiate_switches(&mut self, timeline: &mut Timeline) -> io::Result<()> {
        if let CpuState::Running(idx) = self.cpu {
            let state = self.table[idx.as_usize()].state();
            match state {
                ProcState::Blocked => {
                    let process = &self.table[idx.as_usize()];
                    let until = self.now + self.half() + process.remaining_in_burst();
                    timeline.event(
                        self.now,
                        &format!(
                            "Process {} switching out of CPU; will block on I/O until time {}ms",
                            process.id(),
                            until
                        ),
                        &self.queue_ids(),
                    )?;
                    self.cpu = CpuState::SwitchingOut {
                        outgoing: idx,
                        dest: SwitchDest::Blocked,
                        remaining: self.half(),
                        then_in: false,
                    };
                }
                ProcState::Terminated => {
                    self.cpu = CpuState::SwitchingOut {
                        outgoing: idx,
                        dest: SwitchDest::Terminated,
                        remaining: self.half(),
                        then_in: false,
                    };
                }
                ProcState::Runnable => {
                    if self
                        .policy
                        .should_preempt(&self.ready, &self.table, idx, self.ran_in_stint)
                    {
                        self.announce_preemption(timeline, idx)?;
                        self.stats.count_preemption();
                        self.cpu = CpuState::SwitchingOut {
                            outgoing: idx,
                            dest: SwitchDest::Ready,
                            remaining: self.half(),
                            then_in: true,
                        };
                    }
                }
            }
        }

        if matches!(self.cpu, CpuState::Idle) && !self.ready.is_empty() {
            let remaining = if self.has_dispatched {
                // A stale context must be switched out first.
                self.config.t_cs
            } else {
                self.half()
            };
            self.has_dispatched = true;
            self.cpu = CpuState::SwitchingIn {
                incoming: None,
                remaining,
            };
        }
        Ok(())
    }

    fn announce_preemption(&mut self, timeline: &mut Timeline, running: ProcIdx) -> io::Result<()> {
        let message = if self.policy.uses_tau() {
            let head = *self.ready.front().expect("preemption with empty queue");
            format!(
                "Process {} (tau {}ms) will preempt {}",
                self.id(head),
                self.table[head.as_usize()].tau(),
                self.id(running)
            )
        } else {
            format!(
                "Time slice expired; process {} preempted with {} ms to go",
                self.id(running),
                self.table[running.as_usize()].remaining_in_burst()
            )
        };
        timeline.event(self.now, &message, &self.queue_ids())
    }

    /// The incoming process is chosen when the switch-in half begins.
    fn pop_incoming(&mut self) {
        let CpuState::SwitchingIn {
            incoming,
            remaining,
        } = &mut self.cpu
        else {
            return;
        };
        if incoming.is_none() && *remaining <= self.config.t_cs / 2 {
            let head = self.ready.pop_front().expect("switch-in with empty queue");
            *incoming = Some(head);
            self.popped_this_tick = Some(head);
        }
    }

    /// Spend this tick on the switch in progress and charge the
    /// off-CPU milliseconds to the affected bursts.
    fn charge_switch_tick(&mut self) {
        match &mut self.cpu {
            CpuState::SwitchingOut {
                outgoing,
                remaining,
                ..
            } => {
                debug_assert!(*remaining > 0);
                *remaining -= 1;
                self.table[outgoing.as_usize()].tick_turnaround();
            }
            CpuState::SwitchingIn {
                incoming,
                remaining,
            } => {
                debug_assert!(*remaining > 0);
                *remaining -= 1;
                if let Some(idx) = *incoming {
                    if self.popped_this_tick != Some(idx) {
                        self.table[idx.as_usize()].tick_turnaround();
                    }
                }
            }
            CpuState::Idle | CpuState::Running(_) => {}
        }
    }

    // ========================================================================
    // PHASE 7: RUN TICK
    // ========================================================================

    fn run_tick(&mut self) {
        if let CpuState::Running(idx) = self.cpu {
            self.ran_in_stint += 1;
            if let RunOutcome::CompletedBurst { burst_len, next } =
                self.table[idx.as_usize()].run_for_1ms()
            {
                self.pending = Some(PendingBoundary {
                    idx,
                    next,
                    burst_len,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::policies;
    use super::super::types::RrAdd;
    use super::*;

    fn config(t_cs: u64, t_slice: u64) -> SchedConfig {
        SchedConfig::new(t_cs, 0.5, 0.01, t_slice, RrAdd::End).unwrap()
    }

    fn run_sim(algorithm: Algorithm, table: Vec<Process>, config: SchedConfig) -> (String, RunStats) {
        let policy = policies::make(algorithm, &config);
        let mut sim = Simulator::new(algorithm, policy, table, config);
        let mut buf = Vec::new();
        let stats = sim.run(&mut buf).unwrap();
        (String::from_utf8(buf).unwrap(), stats)
    }

    #[test]
    fn initial_dispatch_costs_only_the_switch_in_half() {
        let table = vec![Process::new('A', 0, vec![10])];
        let (out, stats) = run_sim(Algorithm::Fcfs, table, config(4, 100));
        assert!(out.contains("time 2ms: Process A started using the CPU for 10 ms burst"));
        assert!(out.contains("time 12ms: Process A terminated"));
        assert_eq!(stats.context_switches(), 1);
    }

    #[test]
    fn dispatch_after_idle_costs_a_full_switch() {
        // A terminates at 12, switch-out through 13, B installed at
        // 14 + t_cs = 18.
        let table = vec![
            Process::new('A', 0, vec![10]),
            Process::new('B', 1, vec![10]),
        ];
        let (out, stats) = run_sim(Algorithm::Fcfs, table, config(4, 100));
        assert!(out.contains("time 18ms: Process B started using the CPU for 10 ms burst"));
        assert_eq!(stats.context_switches(), 2);
    }

    #[test]
    fn io_round_trip_readmits_with_io_completion_event() {
        let table = vec![Process::new('A', 0, vec![10, 20, 10])];
        let (out, _) = run_sim(Algorithm::Fcfs, table, config(4, 100));
        assert!(out.contains("time 12ms: Process A completed a CPU burst; 1 to go"));
        assert!(out.contains(
            "time 12ms: Process A switching out of CPU; will block on I/O until time 34ms"
        ));
        assert!(out.contains("time 35ms: Process A completed I/O; added to ready queue"));
    }

    #[test]
    fn simultaneous_arrivals_admit_in_id_order() {
        let table = vec![
            Process::new('A', 0, vec![10]),
            Process::new('B', 0, vec![10]),
        ];
        let (out, _) = run_sim(Algorithm::Fcfs, table, config(4, 100));
        let a_pos = out.find("Process A arrived").unwrap();
        let b_pos = out.find("Process B arrived").unwrap();
        assert!(a_pos < b_pos);
        assert!(out.contains("time 0ms: Process B arrived; added to ready queue [Q A B]"));
    }
}
