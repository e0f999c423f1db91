/*
 * Shortest-Remaining-Time Policy
 *
 * The preemptive variant of SJF. Ordering key is the estimated time
 * left in the current burst (tau minus milliseconds already executed),
 * ties toward the smaller ID. The running process is preempted whenever
 * the ready-queue head's key is strictly smaller than its own; because
 * the dispatch phase re-evaluates the predicate every tick, a displaced
 * process that is itself outclassed by the next queue head is preempted
 * again before running a single millisecond (the preemption cascade).
 */

use std::collections::VecDeque;

use super::super::process::Process;
use super::super::traits::SchedPolicy;
use super::super::types::ProcIdx;
use super::{insert_by_key, tau_remaining_key};

pub struct SrtPolicy;

impl SrtPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SrtPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedPolicy for SrtPolicy {
    fn name(&self) -> &'static str {
        "SRT"
    }

    fn admit(&mut self, ready: &mut VecDeque<ProcIdx>, table: &[Process], staged: &[ProcIdx]) {
        for &idx in staged {
            insert_by_key(ready, idx, |i| tau_remaining_key(table, i));
        }
    }

    fn should_preempt(
        &self,
        ready: &VecDeque<ProcIdx>,
        table: &[Process],
        running: ProcIdx,
        _ran_in_stint: u64,
    ) -> bool {
        match ready.front() {
            Some(&head) => {
                table[head.as_usize()].tau_remaining()
                    < table[running.as_usize()].tau_remaining()
            }
            None => false,
        }
    }

    fn reinsert_preempted(
        &mut self,
        ready: &mut VecDeque<ProcIdx>,
        table: &[Process],
        victim: ProcIdx,
    ) {
        insert_by_key(ready, victim, |i| tau_remaining_key(table, i));
    }

    fn uses_tau(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_taus(taus: &[u64]) -> Vec<Process> {
        taus.iter()
            .enumerate()
            .map(|(i, &tau)| {
                let mut p = Process::new((b'A' + i as u8) as char, 0, vec![100]);
                p.set_tau(tau);
                p
            })
            .collect()
    }

    #[test]
    fn preempts_only_on_strictly_smaller_estimate() {
        let table = table_with_taus(&[10, 10, 5]);
        let policy = SrtPolicy::new();
        let equal = VecDeque::from([ProcIdx(1)]);
        let smaller = VecDeque::from([ProcIdx(2)]);
        assert!(!policy.should_preempt(&equal, &table, ProcIdx(0), 0));
        assert!(policy.should_preempt(&smaller, &table, ProcIdx(0), 0));
    }

    #[test]
    fn victim_reenters_by_remaining_estimate() {
        let mut table = table_with_taus(&[100, 10]);
        // A executed 95 ms of its estimated 100: 5 remaining, ahead of B.
        for _ in 0..95 {
            table[0].run_for_1ms();
        }
        let mut policy = SrtPolicy::new();
        let mut ready = VecDeque::from([ProcIdx(1)]);
        policy.reinsert_preempted(&mut ready, &table, ProcIdx(0));
        assert_eq!(ready, VecDeque::from([ProcIdx(0), ProcIdx(1)]));
    }
}
