/*
 * Scheduling Policies
 *
 * One file per discipline. Construction goes through `make`, which
 * returns the policy boxed behind the SchedPolicy trait.
 */

mod fcfs;
mod round_robin;
mod sjf;
mod srt;

pub use fcfs::FcfsPolicy;
pub use round_robin::RoundRobinPolicy;
pub use sjf::SjfPolicy;
pub use srt::SrtPolicy;

use std::collections::VecDeque;

use super::process::Process;
use super::traits::SchedPolicy;
use super::types::{Algorithm, ProcIdx, SchedConfig};

/// Build the policy for an algorithm.
pub fn make(algorithm: Algorithm, config: &SchedConfig) -> Box<dyn SchedPolicy> {
    match algorithm {
        Algorithm::Fcfs => Box::new(FcfsPolicy::new()),
        Algorithm::Sjf => Box::new(SjfPolicy::new()),
        Algorithm::Srt => Box::new(SrtPolicy::new()),
        Algorithm::RoundRobin => Box::new(RoundRobinPolicy::new(config.t_slice, config.rr_add)),
    }
}

/// Insert `idx` before the first queue entry whose key exceeds the new
/// entry's key. Keys are `(estimate, process ID)` tuples, so equal
/// estimates break ties toward the smaller ID, and equal keys keep
/// insertion order stable.
pub(super) fn insert_by_key<K: Ord>(
    ready: &mut VecDeque<ProcIdx>,
    idx: ProcIdx,
    key: impl Fn(ProcIdx) -> K,
) {
    let new_key = key(idx);
    let pos = ready
        .iter()
        .position(|&other| key(other) > new_key)
        .unwrap_or(ready.len());
    ready.insert(pos, idx);
}

/// Sort-key helper: estimate plus table index (index order is ID order).
pub(super) fn tau_key(table: &[Process], idx: ProcIdx) -> (u64, usize) {
    (table[idx.as_usize()].tau(), idx.as_usize())
}

/// SRT sort-key: estimated remaining time, then ID.
pub(super) fn tau_remaining_key(table: &[Process], idx: ProcIdx) -> (u64, usize) {
    (table[idx.as_usize()].tau_remaining(), idx.as_usize())
}
