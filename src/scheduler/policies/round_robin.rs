/*
 * Round-Robin Policy
 *
 * FIFO rotation bounded by a time slice. The insertion side is
 * configurable: END (default) appends staged and preempted processes,
 * BEGINNING prepends them. A preemption fires when the running process
 * has held the CPU for a full slice and someone is waiting.
 */

use std::collections::VecDeque;

use super::super::process::Process;
use super::super::traits::SchedPolicy;
use super::super::types::{ProcIdx, RrAdd};

pub struct RoundRobinPolicy {
    /// Time slice in ms.
    t_slice: u64,
    /// Which end of the ready queue receives insertions.
    side: RrAdd,
}

impl RoundRobinPolicy {
    pub fn new(t_slice: u64, side: RrAdd) -> Self {
        Self { t_slice, side }
    }

    fn insert(&self, ready: &mut VecDeque<ProcIdx>, idx: ProcIdx) {
        match self.side {
            RrAdd::End => ready.push_back(idx),
            RrAdd::Beginning => ready.push_front(idx),
        }
    }
}

impl SchedPolicy for RoundRobinPolicy {
    fn name(&self) -> &'static str {
        "RR"
    }

    fn admit(&mut self, ready: &mut VecDeque<ProcIdx>, _table: &[Process], staged: &[ProcIdx]) {
        for &idx in staged {
            self.insert(ready, idx);
        }
    }

    fn should_preempt(
        &self,
        ready: &VecDeque<ProcIdx>,
        _table: &[Process],
        _running: ProcIdx,
        ran_in_stint: u64,
    ) -> bool {
        ran_in_stint >= self.t_slice && !ready.is_empty()
    }

    fn reinsert_preempted(
        &mut self,
        ready: &mut VecDeque<ProcIdx>,
        _table: &[Process],
        victim: ProcIdx,
    ) {
        self.insert(ready, victim);
    }
}
