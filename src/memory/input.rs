/*
 * Memory Experiment Input Parser
 *
 * Line-oriented format:
 *
 *   # comment to end of line
 *   A 8 0/100 350/50
 *   B 12 25/600
 *
 * A process line is a capital-letter ID, the size in frames, and
 * `arrival/duration` pairs, one per occupancy. Blank lines and lines
 * not introducing a process are ignored; a malformed process line is
 * skipped with a warning rather than aborting the run.
 */

use std::str::FromStr;

use thiserror::Error;

use super::types::MemProcess;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing process ID")]
    MissingId,
    #[error("missing size field")]
    MissingSize,
    #[error("bad size {0:?}: must be a positive frame count")]
    BadSize(String),
    #[error("bad arrival/duration pair {0:?}")]
    BadPair(String),
}

impl FromStr for MemProcess {
    type Err = ParseError;

    /// Parse one process line: ID, size, arrival/duration pairs.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut fields = line.split_whitespace();
        let id = fields
            .next()
            .and_then(|f| f.chars().next())
            .ok_or(ParseError::MissingId)?;
        let size_field = fields.next().ok_or(ParseError::MissingSize)?;
        let size: usize = size_field
            .parse()
            .map_err(|_| ParseError::BadSize(size_field.to_owned()))?;
        if size == 0 {
            return Err(ParseError::BadSize(size_field.to_owned()));
        }
        let mut schedule = Vec::new();
        for pair in fields {
            let (arrival, duration) = pair
                .split_once('/')
                .ok_or_else(|| ParseError::BadPair(pair.to_owned()))?;
            let arrival: u64 = arrival
                .parse()
                .map_err(|_| ParseError::BadPair(pair.to_owned()))?;
            let duration: u64 = duration
                .parse()
                .map_err(|_| ParseError::BadPair(pair.to_owned()))?;
            schedule.push((arrival, duration));
        }
        Ok(MemProcess { id, size, schedule })
    }
}

/// Parse a whole input file, skipping comments, blanks and malformed
/// process lines.
pub fn parse_input(text: &str) -> Vec<MemProcess> {
    let mut processes = Vec::new();
    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        if !line.starts_with(|c: char| c.is_ascii_uppercase()) {
            continue;
        }
        match line.parse::<MemProcess>() {
            Ok(process) => processes.push(process),
            Err(err) => {
                log::warn!("skipping malformed process line {}: {err}", lineno + 1);
            }
        }
    }
    processes
}
