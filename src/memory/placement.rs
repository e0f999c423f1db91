/*
 * Placement Algorithms
 *
 * Pure queries over the free-partition list: given a request size,
 * each discipline picks where the allocation (or its slices) should
 * go. The frame map applies the result; the event simulator owns the
 * Next-Fit cursor since it is per-run state.
 */

use super::types::{Frame, Partition, PlacementAlgorithm};

/// Slices an ADD request resolves to: one `(start, len)` for the
/// contiguous disciplines, possibly several for Non-Contiguous.
pub type Placement = Vec<(Frame, usize)>;

/// First partition, in address order, large enough for the request.
pub fn first_fit(partitions: &[Partition], size: usize) -> Option<Placement> {
    partitions
        .iter()
        .find(|p| p.len >= size)
        .map(|p| vec![(p.start, size)])
}

/// First fitting position at or after the previous allocation's end,
/// wrapping around to the lowest fitting partition when nothing fits
/// above the cursor.
pub fn next_fit(partitions: &[Partition], size: usize, cursor: Frame) -> Option<Placement> {
    for p in partitions {
        let start = p.start.max(cursor);
        if start + size <= p.end() {
            return Some(vec![(start, size)]);
        }
    }
    first_fit(partitions, size)
}

/// Smallest fitting partition; ties go to the lowest start frame.
pub fn best_fit(partitions: &[Partition], size: usize) -> Option<Placement> {
    partitions
        .iter()
        .filter(|p| p.len >= size)
        .min_by_key(|p| p.len)
        .map(|p| vec![(p.start, size)])
}

/// Slice the request across partitions in address order. Succeeds iff
/// the total free space covers the request.
pub fn non_contiguous(partitions: &[Partition], size: usize) -> Option<Placement> {
    let free_total: usize = partitions.iter().map(|p| p.len).sum();
    if free_total < size {
        return None;
    }
    let mut slices = Vec::new();
    let mut outstanding = size;
    for p in partitions {
        let take = outstanding.min(p.len);
        slices.push((p.start, take));
        outstanding -= take;
        if outstanding == 0 {
            break;
        }
    }
    Some(slices)
}

/// Dispatch on the discipline. `cursor` is the Next-Fit state and is
/// ignored by the other algorithms.
pub fn choose(
    algorithm: PlacementAlgorithm,
    partitions: &[Partition],
    size: usize,
    cursor: Frame,
) -> Option<Placement> {
    match algorithm {
        PlacementAlgorithm::FirstFit => first_fit(partitions, size),
        PlacementAlgorithm::NextFit => next_fit(partitions, size, cursor),
        PlacementAlgorithm::BestFit => best_fit(partitions, size),
        PlacementAlgorithm::NonContiguous => non_contiguous(partitions, size),
    }
}
