/*
 * Scheduler Type Definitions
 *
 * Core types shared by the process model, the policies and the tick
 * simulator. All containers in the subsystem hold `ProcIdx` values; the
 * process table inside the simulator is the single owner of process
 * state.
 */

use thiserror::Error;

/// Index of a process in the simulator's process table.
///
/// Processes are stored in ascending ID order (`A`, `B`, ...), so
/// comparing indices is the same as comparing process IDs. Every queue
/// and set in the scheduler holds these indices, never process values.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcIdx(pub usize);

impl ProcIdx {
    /// Get the index as a usize for table lookup.
    pub fn as_usize(self) -> usize {
        self.0
    }
}

/// Scheduling discipline executed by a simulation run.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Algorithm {
    /// First-Come-First-Served, non-preemptive.
    Fcfs,
    /// Shortest-Job-First on smoothed burst estimates, non-preemptive.
    Sjf,
    /// Shortest-Remaining-Time, the preemptive variant of SJF.
    Srt,
    /// Round-Robin with a fixed time slice.
    RoundRobin,
}

impl Algorithm {
    /// Short name used in timeline events and the summary file.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Fcfs => "FCFS",
            Algorithm::Sjf => "SJF",
            Algorithm::Srt => "SRT",
            Algorithm::RoundRobin => "RR",
        }
    }

    /// All disciplines in the order a full run executes them.
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Fcfs,
        Algorithm::Sjf,
        Algorithm::Srt,
        Algorithm::RoundRobin,
    ];
}

/// Where Round-Robin inserts newly staged processes.
///
/// `End` is the classic FIFO behaviour and the default; `Beginning`
/// turns the ready queue into a LIFO for fresh arrivals. Preempted
/// processes re-enter at the same side.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RrAdd {
    #[default]
    End,
    Beginning,
}

impl std::str::FromStr for RrAdd {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "END" => Ok(RrAdd::End),
            "BEGINNING" => Ok(RrAdd::Beginning),
            _ => Err(ConfigError::BadRrAdd(s.to_owned())),
        }
    }
}

/// Invalid simulator parameters (usage-error class).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("t_cs must be a positive even number of milliseconds, got {0}")]
    BadContextSwitchTime(u64),
    #[error("alpha must lie in (0, 1), got {0}")]
    BadAlpha(f64),
    #[error("lambda must be positive, got {0}")]
    BadLambda(f64),
    #[error("t_slice must be positive, got {0}")]
    BadTimeSlice(u64),
    #[error("rr_add must be END or BEGINNING, got {0:?}")]
    BadRrAdd(String),
    #[error("process count must lie in 1..=26, got {0}")]
    BadProcessCount(usize),
}

/// Parameters shared by every scheduling run.
#[derive(Debug, Copy, Clone)]
pub struct SchedConfig {
    /// Context switch duration in ms; split into two equal halves.
    pub t_cs: u64,
    /// Smoothing factor for the tau estimate (SJF/SRT).
    pub alpha: f64,
    /// Exponential-distribution parameter; `ceil(1/lambda)` seeds tau.
    pub lambda: f64,
    /// Round-Robin time slice in ms.
    pub t_slice: u64,
    /// Round-Robin insertion side.
    pub rr_add: RrAdd,
}

impl SchedConfig {
    /// Validate the parameter ranges; violations are usage errors.
    pub fn new(
        t_cs: u64,
        alpha: f64,
        lambda: f64,
        t_slice: u64,
        rr_add: RrAdd,
    ) -> Result<Self, ConfigError> {
        if t_cs == 0 || t_cs % 2 != 0 {
            return Err(ConfigError::BadContextSwitchTime(t_cs));
        }
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(ConfigError::BadAlpha(alpha));
        }
        if lambda <= 0.0 {
            return Err(ConfigError::BadLambda(lambda));
        }
        if t_slice == 0 {
            return Err(ConfigError::BadTimeSlice(t_slice));
        }
        Ok(Self {
            t_cs,
            alpha,
            lambda,
            t_slice,
            rr_add,
        })
    }

    /// Initial tau estimate for a freshly arrived process.
    pub fn tau_zero(&self) -> u64 {
        (1.0 / self.lambda).ceil() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_odd_t_cs() {
        assert!(SchedConfig::new(3, 0.5, 0.01, 100, RrAdd::End).is_err());
        assert!(SchedConfig::new(0, 0.5, 0.01, 100, RrAdd::End).is_err());
        assert!(SchedConfig::new(4, 0.5, 0.01, 100, RrAdd::End).is_ok());
    }

    #[test]
    fn config_rejects_alpha_outside_open_interval() {
        assert!(SchedConfig::new(4, 0.0, 0.01, 100, RrAdd::End).is_err());
        assert!(SchedConfig::new(4, 1.0, 0.01, 100, RrAdd::End).is_err());
    }

    #[test]
    fn tau_zero_is_ceiled_inverse_lambda() {
        let config = SchedConfig::new(4, 0.5, 0.01, 100, RrAdd::End).unwrap();
        assert_eq!(config.tau_zero(), 100);
        let config = SchedConfig::new(4, 0.5, 0.003, 100, RrAdd::End).unwrap();
        assert_eq!(config.tau_zero(), 334);
    }

    #[test]
    fn rr_add_parses_exact_spellings() {
        assert_eq!("END".parse::<RrAdd>().unwrap(), RrAdd::End);
        assert_eq!("BEGINNING".parse::<RrAdd>().unwrap(), RrAdd::Beginning);
        assert!("end".parse::<RrAdd>().is_err());
    }
}
