/*
 * Frame Map
 *
 * The owning model of physical memory: a printable cell array, the
 * list of live allocations, and the sorted, coalesced list of free
 * partitions. Placement algorithms decide *where* to put things; this
 * module is the only code that mutates the arrays, and it maintains
 * the invariants the simulator relies on:
 *
 * - allocations and partitions tile the cell array exactly
 * - partitions are sorted by start and never adjacent
 * - a cell holds its owner's ID, or '.' when free
 */

use super::types::{Allocation, FREE, Frame, Partition};

#[derive(Debug, Clone)]
pub struct FrameMap {
    cells: Vec<char>,
    allocations: Vec<Allocation>,
    partitions: Vec<Partition>,
}

impl FrameMap {
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "memory must hold at least one frame");
        Self {
            cells: vec![FREE; size],
            allocations: Vec::new(),
            partitions: vec![Partition { start: 0, len: size }],
        }
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[char] {
        &self.cells
    }

    /// Free partitions, ascending by start frame.
    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    pub fn allocations(&self) -> &[Allocation] {
        &self.allocations
    }

    /// Total free frames across all partitions.
    pub fn free_total(&self) -> usize {
        self.partitions.iter().map(|p| p.len).sum()
    }

    /// Carve an allocation out of the free partition covering
    /// `[start, start + len)`.
    ///
    /// # Panics
    /// Placing over frames that are not free is an invariant violation
    /// and aborts the run.
    pub fn place(&mut self, start: Frame, owner: char, len: usize) {
        assert!(len > 0, "zero-length allocation for process {owner}");
        let pos = self
            .partitions
            .iter()
            .position(|p| p.start <= start && start + len <= p.end())
            .unwrap_or_else(|| {
                panic!("no free partition covers [{start}, {})", start + len)
            });
        let covering = self.partitions.remove(pos);
        // Left and right remainders of the split, in order.
        let mut insert_at = pos;
        if covering.start < start {
            self.partitions.insert(
                insert_at,
                Partition {
                    start: covering.start,
                    len: start - covering.start,
                },
            );
            insert_at += 1;
        }
        if start + len < covering.end() {
            self.partitions.insert(
                insert_at,
                Partition {
                    start: start + len,
                    len: covering.end() - (start + len),
                },
            );
        }
        for cell in &mut self.cells[start..start + len] {
            *cell = owner;
        }
        self.allocations.push(Allocation { start, owner, len });
        self.debug_check();
    }

    /// Free every allocation owned by `owner`. Returns the number of
    /// allocations released.
    pub fn release(&mut self, owner: char) -> usize {
        let mut released = 0;
        let mut i = 0;
        while i < self.allocations.len() {
            if self.allocations[i].owner == owner {
                let allocation = self.allocations.remove(i);
                self.free_cells(allocation);
                released += 1;
            } else {
                i += 1;
            }
        }
        self.debug_check();
        released
    }

    fn free_cells(&mut self, allocation: Allocation) {
        for cell in &mut self.cells[allocation.start..allocation.start + allocation.len] {
            *cell = FREE;
        }
        self.insert_partition(Partition {
            start: allocation.start,
            len: allocation.len,
        });
    }

    /// Insert a freed run into the partition list, merging with both
    /// neighbours so no two partitions are ever adjacent.
    fn insert_partition(&mut self, partition: Partition) {
        let pos = self
            .partitions
            .iter()
            .position(|p| p.start > partition.start)
            .unwrap_or(self.partitions.len());
        self.partitions.insert(pos, partition);
        // Merge with the right neighbour, then the left one.
        if pos + 1 < self.partitions.len() && self.partitions[pos].end() == self.partitions[pos + 1].start
        {
            self.partitions[pos].len += self.partitions[pos + 1].len;
            self.partitions.remove(pos + 1);
        }
        if pos > 0 && self.partitions[pos - 1].end() == self.partitions[pos].start {
            self.partitions[pos - 1].len += self.partitions[pos].len;
            self.partitions.remove(pos);
        }
    }

    /// Compact all live allocations toward frame 0, preserving their
    /// order. Repeatedly slides the allocation that immediately follows
    /// the leftmost free partition down to the partition's start.
    ///
    /// Returns the total moved frames and the owners moved, in move
    /// order (an owner repeats if several of its allocations moved).
    pub fn defragment(&mut self) -> (usize, Vec<char>) {
        let mut moved_frames = 0;
        let mut moved_owners = Vec::new();
        loop {
            // Partitions are coalesced, so any partition short of the
            // memory end is immediately followed by an occupied cell.
            let Some(gap) = self
                .partitions
                .iter()
                .find(|p| p.end() < self.size())
                .copied()
            else {
                break;
            };
            let idx = self
                .allocations
                .iter()
                .position(|a| a.start == gap.end())
                .unwrap_or_else(|| {
                    panic!("no allocation starts at occupied frame {}", gap.end())
                });
            let allocation = self.allocations.remove(idx);
            self.free_cells(allocation);
            self.place(gap.start, allocation.owner, allocation.len);
            moved_frames += allocation.len;
            moved_owners.push(allocation.owner);
        }
        assert!(
            self.partitions.len() <= 1,
            "defragmentation must leave a single free partition"
        );
        (moved_frames, moved_owners)
    }

    /// Assert the tiling invariants; cheap enough to run after every
    /// mutation in debug builds.
    pub fn check_invariants(&self) {
        let alloc_total: usize = self.allocations.iter().map(|a| a.len).sum();
        assert_eq!(
            alloc_total + self.free_total(),
            self.size(),
            "allocations and partitions must tile memory"
        );
        for pair in self.partitions.windows(2) {
            assert!(
                pair[0].end() < pair[1].start,
                "partitions must be sorted and non-adjacent: {pair:?}"
            );
        }
        for partition in &self.partitions {
            assert!(
                self.cells[partition.start..partition.end()]
                    .iter()
                    .all(|&c| c == FREE),
                "partition cells must be free"
            );
        }
        for allocation in &self.allocations {
            assert!(
                self.cells[allocation.start..allocation.start + allocation.len]
                    .iter()
                    .all(|&c| c == allocation.owner),
                "allocation cells must carry the owner ID"
            );
        }
    }

    fn debug_check(&self) {
        if cfg!(debug_assertions) {
            self.check_invariants();
        }
    }
}
