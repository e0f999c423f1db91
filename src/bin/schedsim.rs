/*
 * schedsim - CPU-Scheduling Experiment CLI
 *
 * Generates one seeded synthetic workload and runs it under FCFS, SJF,
 * SRT and RR in turn. Timeline events go to stdout; per-algorithm
 * statistics are appended to simout.txt.
 */

use std::fs::OpenOptions;
use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use osim::scheduler::types::ConfigError;
use osim::scheduler::{policies, Algorithm, RrAdd, SchedConfig, Simulator};
use osim::workload::{self, Drand48};

#[derive(Parser, Debug)]
#[command(name = "schedsim", about = "Discrete-event CPU scheduling simulator")]
struct Args {
    /// Seed for the pseudo-random workload generator.
    seed: i64,
    /// Exponential-distribution parameter for interarrival and burst times.
    lambda: f64,
    /// Samples above this bound are rejected and redrawn.
    upper_bound: u64,
    /// Number of processes to simulate (1..=26).
    n: usize,
    /// Context switch duration in ms; positive and even.
    t_cs: u64,
    /// Smoothing factor in (0, 1) for burst estimation.
    alpha: f64,
    /// Round-Robin time slice in ms.
    t_slice: u64,
    /// Round-Robin insertion side: END (default) or BEGINNING.
    rr_add: Option<RrAdd>,
}

fn main() -> ExitCode {
    osim::utils::logger::init();
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if err.use_stderr() => {
            // Usage errors exit 1 per the interface contract.
            eprint!("{err}");
            return ExitCode::FAILURE;
        }
        Err(err) => {
            // --help and --version are not errors.
            print!("{err}");
            return ExitCode::SUCCESS;
        }
    };
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    if !(1..=26).contains(&args.n) {
        return Err(ConfigError::BadProcessCount(args.n).into());
    }
    let config = SchedConfig::new(
        args.t_cs,
        args.alpha,
        args.lambda,
        args.t_slice,
        args.rr_add.unwrap_or_default(),
    )?;

    let mut source = Drand48::new(args.seed);
    let table = workload::generate(&mut source, args.lambda, args.upper_bound, args.n);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for process in &table {
        writeln!(out, "{}", process.overview())?;
    }

    let mut summary = OpenOptions::new()
        .create(true)
        .append(true)
        .open("simout.txt")
        .context("opening simout.txt")?;

    for algorithm in Algorithm::ALL {
        writeln!(out)?;
        let policy = policies::make(algorithm, &config);
        let mut simulator = Simulator::new(algorithm, policy, table.clone(), config);
        let stats = simulator.run(&mut out)?;
        stats
            .write_summary(&mut summary)
            .context("writing simout.txt")?;
    }
    Ok(())
}
