/*
 * First-Come-First-Served Policy
 *
 * Plain FIFO: staged processes append in ID order, nothing ever
 * preempts. The simplest discipline and the baseline for the others.
 */

use std::collections::VecDeque;

use super::super::process::Process;
use super::super::traits::SchedPolicy;
use super::super::types::ProcIdx;

pub struct FcfsPolicy;

impl FcfsPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FcfsPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedPolicy for FcfsPolicy {
    fn name(&self) -> &'static str {
        "FCFS"
    }

    fn admit(&mut self, ready: &mut VecDeque<ProcIdx>, _table: &[Process], staged: &[ProcIdx]) {
        ready.extend(staged.iter().copied());
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
        unreachable!("FCFS never preempts");
    }
}
