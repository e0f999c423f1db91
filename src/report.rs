/*
 * Timeline Reporting
 *
 * Both simulator cores narrate what they do as `time <T>ms: <message>`
 * lines. The scheduler suffixes every line with the current ready queue
 * (`[Q A B C]`, or `[Q <empty>]`) and mutes most traffic past the
 * 1000 ms mark; the memory simulator prints bare lines plus framed
 * memory dumps. `Timeline` owns those conventions so the cores only
 * decide *what* to say.
 */

use std::io::{self, Write};

/// Timestamp after which routine scheduler events are muted.
///
/// Process terminations and simulator start/end lines always print;
/// everything else is dropped once the clock passes the cutoff.
pub const EVENT_CUTOFF_MS: u64 = 1000;

/// Sequenced writer for simulator timeline output.
pub struct Timeline<'w> {
    out: &'w mut dyn Write,
    /// When set, events after this time are suppressed unless they
    /// belong to one of the always-printed classes.
    cutoff: Option<u64>,
}

impl<'w> Timeline<'w> {
    /// Timeline with the scheduler's late-run suppression enabled.
    pub fn with_cutoff(out: &'w mut dyn Write) -> Self {
        Self {
            out,
            cutoff: Some(EVENT_CUTOFF_MS),
        }
    }

    /// Timeline that prints everything (memory simulator).
    pub fn unfiltered(out: &'w mut dyn Write) -> Self {
        Self { out, cutoff: None }
    }

    fn suppressed(&self, now: u64, message: &str) -> bool {
        match self.cutoff {
            Some(cutoff) => {
                now > cutoff && !message.contains("terminated") && !message.contains("Simulator")
            }
            None => false,
        }
    }

    /// Emit a scheduler event with the ready-queue suffix.
    pub fn event(&mut self, now: u64, message: &str, queue: &[char]) -> io::Result<()> {
        if self.suppressed(now, message) {
            return Ok(());
        }
        write!(self.out, "time {now}ms: {message} [Q")?;
        if queue.is_empty() {
            write!(self.out, " <empty>")?;
        } else {
            for id in queue {
                write!(self.out, " {id}")?;
            }
        }
        writeln!(self.out, "]")
    }

    /// Emit a bare timeline line (memory simulator).
    pub fn line(&mut self, now: u64, message: &str) -> io::Result<()> {
        if self.suppressed(now, message) {
            return Ok(());
        }
        writeln!(self.out, "time {now}ms: {message}")
    }

    /// Print the frame array in rows of `per_line` cells, delimited by
    /// rows of `=` of the same width.
    pub fn dump(&mut self, cells: &[char], per_line: usize) -> io::Result<()> {
        let border: String = "=".repeat(per_line);
        writeln!(self.out, "{border}")?;
        for row in cells.chunks(per_line) {
            let line: String = row.iter().collect();
            writeln!(self.out, "{line}")?;
        }
        writeln!(self.out, "{border}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render<F: FnOnce(&mut Timeline)>(cutoff: bool, f: F) -> String {
        let mut buf = Vec::new();
        {
            let mut tl = if cutoff {
                Timeline::with_cutoff(&mut buf)
            } else {
                Timeline::unfiltered(&mut buf)
            };
            f(&mut tl);
        }
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn queue_suffix_lists_ids_in_order() {
        let out = render(true, |tl| {
            tl.event(12, "Process A arrived; added to ready queue", &['A', 'B'])
                .unwrap();
        });
        assert_eq!(
            out,
            "time 12ms: Process A arrived; added to ready queue [Q A B]\n"
        );
    }

    #[test]
    fn empty_queue_prints_placeholder() {
        let out = render(true, |tl| {
            tl.event(0, "Simulator started for FCFS", &[]).unwrap();
        });
        assert_eq!(out, "time 0ms: Simulator started for FCFS [Q <empty>]\n");
    }

    #[test]
    fn late_events_are_muted_except_surviving_classes() {
        let out = render(true, |tl| {
            tl.event(1000, "Process A started using the CPU for 5 ms burst", &[])
                .unwrap();
            tl.event(1001, "Process A started using the CPU for 5 ms burst", &[])
                .unwrap();
            tl.event(1500, "Process A terminated", &[]).unwrap();
            tl.event(2000, "Simulator ended for FCFS", &[]).unwrap();
        });
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("time 1000ms:"));
        assert!(lines[1].contains("terminated"));
        assert!(lines[2].contains("Simulator ended"));
    }

    #[test]
    fn dump_frames_rows() {
        let cells: Vec<char> = "AABB....".chars().collect();
        let out = render(false, |tl| {
            tl.dump(&cells, 4).unwrap();
        });
        assert_eq!(out, "====\nAABB\n....\n====\n");
    }
}
