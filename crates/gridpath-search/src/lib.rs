//! Step-wise search over an editable 2D grid.
//!
//! This crate provides the domain model of the gridpath visualizer:
//!
//! - [`SearchGrid`] — a flat arena of cells carrying a user-edited *label*
//!   (empty / wall / start / end) and transient search *state*
//!   (unvisited / visited / path / highlight), plus index-based predecessor
//!   links and g/f scores.
//! - [`SearchEngine`] — a resumable engine advancing one of three traversal
//!   strategies by exactly one discrete [`step`](SearchEngine::step) per
//!   call: breadth-first, depth-first, or best-first with the Manhattan
//!   heuristic. The best-first open set is kept in insertion order and f
//!   ties break toward the earliest-inserted member, so runs are
//!   deterministic.
//! - [`scatter_walls`] — random wall placement for quickly building test
//!   terrain.
//!
//! The engine never blocks and holds no reference to the grid between
//! steps, so a caller can interleave stepping with grid edits and painting
//! at animation-frame granularity.

mod distance;
mod engine;
mod grid;
mod scatter;

pub use distance::manhattan;
pub use engine::{Algorithm, SearchEngine, Step};
pub use grid::{Label, SearchGrid, Spot, SpotState, UNREACHABLE};
pub use scatter::scatter_walls;
