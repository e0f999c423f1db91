/*
 * memsim - Memory-Placement Experiment CLI
 *
 * Parses a process schedule file and replays it under the four
 * placement disciplines in turn, printing the event timeline and
 * memory dumps to stdout.
 */

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use osim::memory::{parse_input, MemConfig, MemorySim, PlacementAlgorithm};

#[derive(Parser, Debug)]
#[command(name = "memsim", about = "Event-driven memory placement simulator")]
struct Args {
    /// Frames printed per row in memory dumps.
    frames_per_line: usize,
    /// Total frames of physical memory.
    n_frames: usize,
    /// Input file: `ID SIZE arrival/duration ...` lines.
    input_file: PathBuf,
    /// Milliseconds to move one frame during defragmentation.
    t_memmove: u64,
}

fn main() -> ExitCode {
    osim::utils::logger::init();
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if err.use_stderr() => {
            eprint!("{err}");
            return ExitCode::FAILURE;
        }
        Err(err) => {
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
    if args.frames_per_line == 0 || args.n_frames == 0 {
        anyhow::bail!("frames_per_line and n_frames must be positive");
    }
    let text = std::fs::read_to_string(&args.input_file)
        .with_context(|| format!("reading {}", args.input_file.display()))?;
    let processes = parse_input(&text);

    let simulator = MemorySim::new(
        processes,
        MemConfig {
            frames_per_line: args.frames_per_line,
            n_frames: args.n_frames,
            t_memmove: args.t_memmove,
        },
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for (i, algorithm) in PlacementAlgorithm::ALL.into_iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        simulator.run(algorithm, &mut out)?;
    }
    Ok(())
}
