/*
 * osim - Discrete-Event Operating-System Simulator
 *
 * Two independent simulation cores over a shared notion of a process:
 *
 * - scheduler: a virtual single CPU advancing one millisecond per tick,
 *   executing FCFS, SJF, SRT or RR with context-switch overhead and full
 *   wait/turnaround accounting.
 * - memory: an event-driven placement simulator laying fixed-size
 *   processes onto a one-dimensional frame array under First-Fit,
 *   Next-Fit, Best-Fit or Non-Contiguous placement, with a
 *   defragmentation primitive costed per moved frame.
 *
 * Both cores are single-threaded and fully deterministic: identical
 * inputs produce byte-identical timelines. Diagnostics go through the
 * `log` facade to stderr; simulation output goes through an injected
 * `io::Write` sink.
 */

pub mod memory;
pub mod report;
pub mod scheduler;
pub mod utils;
pub mod workload;
