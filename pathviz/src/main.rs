//! pathviz — an interactive grid pathfinding visualizer for the terminal.
//!
//! Draw walls with the mouse, drag the start/end markers, and watch BFS,
//! DFS, or best-first search explore the grid frame by frame.

use gridpath_core::app::{App, AppConfig};
use gridpath_crossterm::{terminal_size, CrosstermDriver};
use pathviz_lib::PathvizModel;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (width, height) = terminal_size()?;
    let model = PathvizModel::new(width, height);
    let driver = CrosstermDriver::new();
    let mut app = App::new(AppConfig {
        model,
        driver,
        width,
        height,
    });
    app.run()?;
    Ok(())
}
