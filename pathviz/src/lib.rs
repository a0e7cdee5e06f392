//! pathviz — an interactive grid pathfinding visualizer built on gridpath.

pub mod colors;
pub mod model;

pub use model::{PathvizModel, SCATTER_DENSITY, STEPS_PER_TICK};
