/*
 * CPU-Scheduling Core
 *
 * A virtual single CPU advancing one millisecond per tick. The process
 * table owns all process state; policies order the ready queue and
 * decide preemption behind the SchedPolicy trait; the tick simulator
 * is the mechanism that drives arrivals, I/O, context switches and
 * accounting through a fixed phase order.
 */

pub mod policies;
pub mod process;
pub mod sched_core;
pub mod stats;
pub mod traits;
pub mod types;

pub use process::{ProcState, Process};
pub use sched_core::Simulator;
pub use stats::RunStats;
pub use traits::SchedPolicy;
pub use types::{Algorithm, ProcIdx, RrAdd, SchedConfig};
