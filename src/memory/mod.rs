/*
 * Memory-Placement Core
 *
 * An event-driven simulator laying fixed-size processes onto a
 * one-dimensional frame array. The frame map owns the cell, allocation
 * and partition state; the placement module decides where requests go;
 * the simulator drives the sorted event calendar and narrates it.
 */

pub mod frames;
pub mod input;
pub mod placement;
pub mod sim;
pub mod types;

pub use frames::FrameMap;
pub use input::parse_input;
pub use sim::{MemConfig, MemorySim};
pub use types::{Allocation, MemProcess, Partition, PlacementAlgorithm};
