//! Color palette for the visualizer.
//!
//! Matches the original canvas look: grey unvisited cells on an off-white
//! background, yellow visited cells, blue path, orange in-progress
//! highlight, and black/green/red for walls and markers.

use gridpath_core::style::Color;

/// Canvas background behind the grid lines.
pub const BACKGROUND: Color = Color::from_rgb(0xF5, 0xF5, 0xF5);

// -- Cell state colours --

pub const UNVISITED: Color = Color::from_rgb(150, 150, 150);
pub const VISITED: Color = Color::from_rgb(0xF5, 0xDD, 0x42);
pub const PATH: Color = Color::from_rgb(0x48, 0x42, 0xF5);
pub const HIGHLIGHT: Color = Color::from_rgb(255, 150, 0);

// -- Cell label colours (drawn over state colours) --

pub const WALL: Color = Color::from_rgb(0, 0, 0);
pub const START: Color = Color::from_rgb(0x42, 0xF5, 0x63);
pub const END: Color = Color::from_rgb(0xF5, 0x42, 0x42);

// -- Status bar --

pub const STATUS_FG: Color = Color::from_rgb(248, 248, 242);
pub const STATUS_BG: Color = Color::from_rgb(40, 42, 54);
/// Marker glyph foreground, readable on the bright marker backgrounds.
pub const MARKER_FG: Color = Color::from_rgb(0, 0, 0);
