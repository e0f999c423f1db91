/*
 * Memory-placement scenarios: Best-Fit skip and reuse, the
 * defragmentation time shift, non-contiguous slicing and the Next-Fit
 * cursor, plus property tests over random schedules asserting the
 * frame-map invariants and run determinism.
 */

use osim::memory::{MemConfig, MemProcess, MemorySim, PlacementAlgorithm};
use proptest::prelude::*;

fn config(n_frames: usize) -> MemConfig {
    MemConfig {
        frames_per_line: 8,
        n_frames,
        t_memmove: 1,
    }
}

fn one_shot(id: char, size: usize, arrival: u64, duration: u64) -> MemProcess {
    MemProcess {
        id,
        size,
        schedule: vec![(arrival, duration)],
    }
}

fn run(processes: Vec<MemProcess>, cfg: MemConfig, algorithm: PlacementAlgorithm) -> String {
    let sim = MemorySim::new(processes, cfg);
    let mut out = Vec::new();
    sim.run(algorithm, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn best_fit_skips_when_memory_is_full() {
    let processes = vec![
        one_shot('A', 8, 0, 100),
        one_shot('B', 8, 0, 100),
        one_shot('C', 8, 0, 100),
        one_shot('D', 8, 0, 100),
        one_shot('E', 8, 50, 10),
    ];
    let out = run(processes, config(32), PlacementAlgorithm::BestFit);

    assert!(out.contains("time 0ms: Simulator started (Contiguous -- Best-Fit)"));
    // All four initial processes stack from frame 0.
    assert!(out.contains("AAAAAAAA\nBBBBBBBB\nCCCCCCCC\nDDDDDDDD"));
    assert!(out.contains("time 50ms: Process E arrived (requires 8 frames)"));
    // No free frames at all: not even defragmentation can help.
    assert!(out.contains("time 50ms: Cannot place process E -- skipped!"));
    // The skipped ADD's REMOVE is elided.
    assert!(!out.contains("Process E removed"));
    assert!(out.contains("time 100ms: Process D removed:"));
    assert!(out.contains("time 100ms: Simulator ended (Contiguous -- Best-Fit)"));
}

#[test]
fn best_fit_reuses_the_freed_partition() {
    let processes = vec![
        one_shot('A', 8, 0, 40),
        one_shot('B', 8, 0, 100),
        one_shot('C', 8, 0, 100),
        one_shot('D', 8, 0, 100),
        one_shot('E', 1, 50, 10),
    ];
    let out = run(processes, config(32), PlacementAlgorithm::BestFit);

    assert!(out.contains("time 40ms: Process A removed:"));
    // The only fitting partition is (0, 8); E lands at frame 0.
    assert!(out.contains("time 50ms: Placed process E:"));
    assert!(out.contains("E.......\nBBBBBBBB"));
}

#[test]
fn defragmentation_compacts_and_shifts_later_events() {
    let processes = vec![
        one_shot('A', 4, 0, 20),
        one_shot('B', 4, 0, 100),
        one_shot('C', 4, 5, 100),
        one_shot('E', 5, 25, 10),
    ];
    let out = run(processes, config(16), PlacementAlgorithm::FirstFit);

    assert!(out.contains("time 20ms: Process A removed:"));
    assert!(out.contains("time 25ms: Process E arrived (requires 5 frames)"));
    // Free space is 8 frames in two holes of 4: defragment.
    assert!(out.contains("time 25ms: Cannot place process E -- starting defragmentation"));
    // B and C slide down, 8 frames at t_memmove=1 each.
    assert!(out.contains("time 33ms: Defragmentation complete (moved 8 frames: B, C)"));
    assert!(out.contains("time 33ms: Placed process E:"));
    assert!(out.contains("BBBBCCCC\nEEEEE..."));
    // Every later event is delayed by the 8 ms of defragmentation.
    assert!(out.contains("time 43ms: Process E removed:"));
    assert!(out.contains("time 108ms: Process B removed:"));
    assert!(out.contains("time 113ms: Process C removed:"));
}

#[test]
fn non_contiguous_slices_across_holes_and_restores_them() {
    let processes = vec![
        one_shot('A', 4, 0, 100),
        one_shot('B', 4, 0, 20),
        one_shot('C', 4, 0, 100),
        one_shot('D', 4, 0, 20),
        one_shot('E', 8, 25, 10),
    ];
    let out = run(processes, config(16), PlacementAlgorithm::NonContiguous);

    // After B and D leave, E's 8 frames split across the two holes.
    assert!(out.contains("time 25ms: Placed process E:"));
    assert!(out.contains("AAAAEEEE\nCCCCEEEE"));
    // E's removal frees both slices, restoring the two holes.
    assert!(out.contains("time 35ms: Process E removed:"));
    assert!(out.contains("AAAA....\nCCCC...."));
}

#[test]
fn next_fit_continues_past_the_last_allocation() {
    let processes = vec![
        one_shot('A', 4, 0, 100),
        one_shot('B', 4, 0, 10),
        one_shot('C', 4, 12, 100),
    ];
    let out = run(processes, config(16), PlacementAlgorithm::NextFit);

    assert!(out.contains("time 10ms: Process B removed:"));
    // First-Fit would reuse B's hole at frame 4; Next-Fit carries on
    // from the cursor at frame 8.
    assert!(out.contains("time 12ms: Placed process C:"));
    assert!(out.contains("AAAA....\nCCCC...."));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Random schedules keep the frame-map invariants (checked inside
    /// the simulator after every event) and never panic.
    #[test]
    fn random_schedules_preserve_invariants(
        specs in prop::collection::vec(
            (1usize..=8, prop::collection::vec((0u64..80, 1u64..40), 1..3)),
            1..6,
        )
    ) {
        let processes: Vec<MemProcess> = specs
            .into_iter()
            .enumerate()
            .map(|(i, (size, schedule))| MemProcess {
                id: (b'A' + i as u8) as char,
                size,
                schedule,
            })
            .collect();
        for algorithm in PlacementAlgorithm::ALL {
            let _ = run(processes.clone(), config(16), algorithm);
        }
    }

    /// Byte-identical output on identical inputs.
    #[test]
    fn random_schedules_are_deterministic(
        specs in prop::collection::vec(
            (1usize..=8, prop::collection::vec((0u64..80, 1u64..40), 1..3)),
            1..6,
        )
    ) {
        let processes: Vec<MemProcess> = specs
            .into_iter()
            .enumerate()
            .map(|(i, (size, schedule))| MemProcess {
                id: (b'A' + i as u8) as char,
                size,
                schedule,
            })
            .collect();
        for algorithm in PlacementAlgorithm::ALL {
            let first = run(processes.clone(), config(16), algorithm);
            let second = run(processes.clone(), config(16), algorithm);
            prop_assert_eq!(first, second);
        }
    }
}
