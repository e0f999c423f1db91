/*
 * Scheduler Policy Trait
 *
 * Separates scheduling policy from mechanism. The tick simulator
 * (sched_core) owns the clock, the process table, the ready queue and
 * all state transitions; a policy contributes exactly three decisions:
 *
 * 1. How staged processes are inserted into the ready queue (admit)
 * 2. Whether the running process should be preempted (should_preempt)
 * 3. Where a preemption victim re-enters the queue (reinsert_preempted)
 *
 * Policies receive the ready queue and the process table on loan; they
 * never mutate process state and never touch the clock.
 */

use std::collections::VecDeque;

use super::process::Process;
use super::types::ProcIdx;

/// Scheduling policy hooks.
pub trait SchedPolicy {
    /// Policy name used in timeline events ("FCFS", "RR", ...).
    fn name(&self) -> &'static str;

    /// Insert the staged processes into the ready queue.
    ///
    /// `staged` is pre-sorted by process ID; the policy decides the
    /// queue position of each entry. This is the only point where
    /// arrivals and I/O completions enter the ready queue.
    fn admit(&mut self, ready: &mut VecDeque<ProcIdx>, table: &[Process], staged: &[ProcIdx]);

    /// Preemption predicate, evaluated in the dispatch phase while
    /// `running` occupies the CPU mid-burst.
    ///
    /// `ran_in_stint` is the number of milliseconds the process has
    /// executed since it was last installed on the CPU.
    fn should_preempt(
        &self,
        ready: &VecDeque<ProcIdx>,
        table: &[Process],
        running: ProcIdx,
        ran_in_stint: u64,
    ) -> bool;

    /// Re-insert a preemption victim into the ready queue. Unlike
    /// `admit`, this emits no "added to ready queue" event.
    fn reinsert_preempted(
        &mut self,
        ready: &mut VecDeque<ProcIdx>,
        table: &[Process],
        victim: ProcIdx,
    );

    /// Whether the policy maintains tau estimates. Drives the
    /// "Recalculated tau" events and the "(tau Xms)" admission wording.
    fn uses_tau(&self) -> bool {
        false
    }
}
