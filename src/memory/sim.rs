/*
 * Event-Driven Memory Simulator
 *
 * Unlike the scheduler, memory placement advances by events, not
 * ticks. The calendar holds one ADD and one REMOVE per occupancy,
 * sorted by time with REMOVE before ADD on ties and ascending process
 * ID after that. An ADD that cannot be satisfied even by
 * defragmentation is skipped, and its paired REMOVE is elided so the
 * calendar never carries an event for memory that was never occupied.
 *
 * Defragmentation freezes the calendar, compacts memory at a cost of
 * t_memmove per moved frame, then shifts `now` and every remaining
 * event by the total, preserving relative order.
 */

use std::collections::VecDeque;
use std::io::{self, Write};

use crate::report::Timeline;

use super::frames::FrameMap;
use super::placement;
use super::types::{Frame, MemProcess, PlacementAlgorithm};

/// Parameters of the memory experiment.
#[derive(Debug, Copy, Clone)]
pub struct MemConfig {
    /// Cells per row in memory dumps.
    pub frames_per_line: usize,
    /// Total frames of physical memory.
    pub n_frames: usize,
    /// Milliseconds to move one frame during defragmentation.
    pub t_memmove: u64,
}

/// Calendar event kinds. REMOVE sorts before ADD at equal times.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum EventKind {
    Remove,
    Add,
}

#[derive(Debug, Copy, Clone)]
struct MemEvent {
    time: u64,
    kind: EventKind,
    /// Index into the process table.
    pidx: usize,
    /// Identifies the (arrival, duration) pair that produced the
    /// event, so a skipped ADD elides exactly its own REMOVE.
    pair: usize,
}

/// The event simulator for one placement algorithm over one workload.
pub struct MemorySim {
    config: MemConfig,
    processes: Vec<MemProcess>,
}

impl MemorySim {
    pub fn new(processes: Vec<MemProcess>, config: MemConfig) -> Self {
        assert!(config.n_frames > 0 && config.frames_per_line > 0);
        Self { config, processes }
    }

    /// Time-sorted calendar over all occupancies.
    fn build_calendar(&self) -> VecDeque<MemEvent> {
        let mut events = Vec::new();
        let mut pair = 0;
        for (pidx, process) in self.processes.iter().enumerate() {
            for &(arrival, duration) in &process.schedule {
                events.push(MemEvent {
                    time: arrival,
                    kind: EventKind::Add,
                    pidx,
                    pair,
                });
                events.push(MemEvent {
                    time: arrival + duration,
                    kind: EventKind::Remove,
                    pidx,
                    pair,
                });
                pair += 1;
            }
        }
        events.sort_by_key(|e| (e.time, e.kind, self.processes[e.pidx].id));
        events.into()
    }

    /// Run the simulation to completion, writing the timeline to `out`.
    pub fn run(&self, algorithm: PlacementAlgorithm, out: &mut dyn Write) -> io::Result<()> {
        let mut timeline = Timeline::unfiltered(out);
        let mut memory = FrameMap::new(self.config.n_frames);
        let mut calendar = self.build_calendar();
        let mut now: u64 = 0;
        // Next-Fit cursor: end frame of the previous allocation.
        let mut cursor: Frame = 0;

        log::debug!(
            "memory run: {} over {} events",
            algorithm.label(),
            calendar.len()
        );
        timeline.line(0, &format!("Simulator started {}", algorithm.label()))?;

        while let Some(event) = calendar.pop_front() {
            assert!(event.time >= now, "calendar must be monotonic");
            let process = &self.processes[event.pidx];
            match event.kind {
                EventKind::Add => {
                    now = event.time;
                    timeline.line(
                        now,
                        &format!(
                            "Process {} arrived (requires {} frames)",
                            process.id, process.size
                        ),
                    )?;
                    match placement::choose(algorithm, memory.partitions(), process.size, cursor) {
                        Some(slices) => {
                            for &(start, len) in &slices {
                                memory.place(start, process.id, len);
                            }
                            let &(start, len) = slices.last().expect("placement yields slices");
                            cursor = start + len;
                            timeline.line(now, &format!("Placed process {}:", process.id))?;
                            timeline.dump(memory.cells(), self.config.frames_per_line)?;
                        }
                        None if memory.free_total() >= process.size => {
                            timeline.line(
                                now,
                                &format!(
                                    "Cannot place process {} -- starting defragmentation",
                                    process.id
                                ),
                            )?;
                            let (moved, owners) = memory.defragment();
                            let t_defrag = moved as u64 * self.config.t_memmove;
                            now += t_defrag;
                            for later in calendar.iter_mut() {
                                later.time += t_defrag;
                            }
                            let names: Vec<String> =
                                owners.iter().map(|id| id.to_string()).collect();
                            timeline.line(
                                now,
                                &format!(
                                    "Defragmentation complete (moved {} frames: {})",
                                    moved,
                                    names.join(", ")
                                ),
                            )?;
                            let free = memory.partitions()[0];
                            memory.place(free.start, process.id, process.size);
                            cursor = free.start + process.size;
                            timeline.line(now, &format!("Placed process {}:", process.id))?;
                            timeline.dump(memory.cells(), self.config.frames_per_line)?;
                        }
                        None => {
                            timeline.line(
                                now,
                                &format!("Cannot place process {} -- skipped!", process.id),
                            )?;
                            calendar
                                .retain(|e| !(e.pair == event.pair && e.kind == EventKind::Remove));
                        }
                    }
                }
                EventKind::Remove => {
                    if memory.release(process.id) > 0 {
                        now = event.time;
                        timeline.line(now, &format!("Process {} removed:", process.id))?;
                        timeline.dump(memory.cells(), self.config.frames_per_line)?;
                    }
                }
            }
            memory.check_invariants();
        }

        timeline.line(now, &format!("Simulator ended {}", algorithm.label()))
    }
}
