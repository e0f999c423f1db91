/*
 * Shortest-Job-First Policy
 *
 * Non-preemptive. The ready queue is kept sorted by the smoothed burst
 * estimate tau, ties broken toward the smaller process ID. Staged
 * processes arrive ID-sorted and are placed by ordered insertion, so
 * the queue order is always total and deterministic.
 */

use std::collections::VecDeque;

use super::super::process::Process;
use super::super::traits::SchedPolicy;
use super::super::types::ProcIdx;
use super::{insert_by_key, tau_key};

pub struct SjfPolicy;

impl SjfPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SjfPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedPolicy for SjfPolicy {
    fn name(&self) -> &'static str {
        "SJF"
    }

    fn admit(&mut self, ready: &mut VecDeque<ProcIdx>, table: &[Process], staged: &[ProcIdx]) {
        for &idx in staged {
            insert_by_key(ready, idx, |i| tau_key(table, i));
        }
    }

    fn should_preempt(
        &self,
        _ready: &VecDeque<ProcIdx>,
        _table: &[Process],
        _running: ProcIdx,
        _ran_in_stint: u64,
    ) -> bool {
        false
    }

    fn reinsert_preempted(
        &mut self,
        _ready: &mut VecDeque<ProcIdx>,
        _table: &[Process],
        _victim: ProcIdx,
    ) {
        unreachable!("SJF never preempts");
    }

    fn uses_tau(&self) -> bool {
        true
    }
}
