//! **gridpath-core** — core types for the gridpath visualizer.
//!
//! Provides the foundational pieces shared by the gridpath crates: integer
//! geometry, styled display cells, a double-bufferable display grid with
//! frame diffing, input messages, and the update/draw application loop.

pub mod app;
pub mod cell;
pub mod geom;
pub mod grid;
pub mod messages;
pub mod style;

pub use app::{App, AppConfig, Context, Driver, Effect, Model};
pub use cell::Cell;
pub use geom::Point;
pub use grid::{compute_frame, Frame, FrameCell, Grid};
pub use messages::{Key, ModMask, MouseAction, Msg};
pub use style::{AttrMask, Color, Style};
