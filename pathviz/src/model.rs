//! The visualizer model: per-frame stepping and pointer/keyboard handling.

use gridpath_core::{
    Cell, Point,
    app::Effect,
    grid::Grid,
    messages::{Key, ModMask, MouseAction, Msg},
    style::{AttrMask, Style},
};
use gridpath_search::{scatter_walls, Algorithm, Label, SearchEngine, SearchGrid, SpotState, Step};

use crate::colors::*;

/// Upper bound on engine steps performed per animation tick.
pub const STEPS_PER_TICK: usize = 150;
/// How many frames a freshly placed wall stays visually emphasized.
pub const PULSE_FRAMES: i32 = 3;
/// Fraction of empty cells turned into walls by the scatter action.
pub const SCATTER_DENSITY: f64 = 0.3;
/// Rows reserved below the grid for the status bar.
const STATUS_ROWS: i32 = 1;

/// What the visualizer is currently doing with its search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    /// No search result on screen.
    Idle,
    /// A run is advancing a bounded number of steps per tick.
    Animating,
    /// A finished result (path or no-path) is displayed; grid edits
    /// recompute it instantly.
    Showing,
}

/// The drag mode, decided by the first cell touched and held until the
/// pointer is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Drag {
    PlaceWalls,
    RemoveWalls,
    MoveStart,
    MoveEnd,
}

/// The application model. Owns the search grid, the engine, and all
/// interaction state; none of it is global.
pub struct PathvizModel {
    grid: SearchGrid,
    engine: SearchEngine,
    run: RunState,
    drag: Option<Drag>,
    /// Arena index whose chain was highlighted last tick.
    prev_highlight: Option<usize>,
    /// Recently placed walls and their remaining pulse frames.
    pulses: Vec<(Point, i32)>,
}

impl PathvizModel {
    /// Build a model for a `width` x `height` character viewport. The grid
    /// takes every row except the status bar.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            grid: SearchGrid::new(Point::new(width, height - STATUS_ROWS)),
            engine: SearchEngine::new(),
            run: RunState::Idle,
            drag: None,
            prev_highlight: None,
            pulses: Vec::new(),
        }
    }

    // -------------------------------------------------------------------
    // Run control
    // -------------------------------------------------------------------

    fn start_run(&mut self, algorithm: Algorithm) {
        log::debug!("starting {} run", algorithm.name());
        self.prev_highlight = None;
        self.engine.start(&mut self.grid, algorithm);
        self.run = RunState::Animating;
    }

    /// Clear the displayed search (and, if `walls_too`, every wall).
    fn clear(&mut self, walls_too: bool) {
        self.prev_highlight = None;
        self.grid.reset_scores();
        self.run = RunState::Idle;
        if walls_too {
            self.grid.clear_walls();
        }
    }

    /// Re-run the last algorithm to completion within this frame, so an
    /// edit updates the displayed result without visible animation.
    fn recompute(&mut self) {
        self.prev_highlight = None;
        let algorithm = self.engine.algorithm();
        self.engine.start(&mut self.grid, algorithm);
        if !self.engine.run_to_end(&mut self.grid) {
            log::debug!("recompute: no path");
        }
        self.run = RunState::Showing;
    }

    fn scatter(&mut self) {
        if self.run == RunState::Animating {
            return;
        }
        let placed = scatter_walls(&mut self.grid, &mut rand::rng(), SCATTER_DENSITY);
        log::debug!("scattered {placed} walls");
        if self.run == RunState::Showing {
            self.recompute();
        }
    }

    // -------------------------------------------------------------------
    // Animation
    // -------------------------------------------------------------------

    fn tick(&mut self) {
        // Decay wall-placement pulses.
        for pulse in &mut self.pulses {
            pulse.1 -= 1;
        }
        self.pulses.retain(|&(_, frames)| frames > 0);

        if self.run != RunState::Animating {
            return;
        }

        // Drop the previous frame's in-progress highlight back to plain
        // visited marks.
        if let Some(pi) = self.prev_highlight.take() {
            self.grid.mark_chain(pi, SpotState::Visited);
        }

        let mut current = None;
        for _ in 0..STEPS_PER_TICK {
            if self.engine.exhausted() {
                break;
            }
            match self.engine.step(&mut self.grid) {
                Step::Advanced(p) => current = Some(p),
                Step::Done(_) => {
                    log::debug!(
                        "{} found a path of {} steps",
                        self.engine.algorithm().name(),
                        self.grid.path_cells().saturating_sub(1)
                    );
                    self.run = RunState::Showing;
                    return;
                }
                Step::Exhausted => break,
            }
        }

        if self.engine.exhausted() {
            // The end is unreachable: stop animating, keep the visited
            // marks on screen.
            log::debug!("{}: no path", self.engine.algorithm().name());
            self.run = RunState::Showing;
            return;
        }

        // Highlight the chain being explored right now.
        if let Some(ci) = current.and_then(|p| self.grid.idx(p)) {
            self.grid.mark_chain(ci, SpotState::Highlight);
            self.prev_highlight = Some(ci);
        }
    }

    // -------------------------------------------------------------------
    // Pointer input
    // -------------------------------------------------------------------

    fn handle_pointer(&mut self, pos: Point) {
        // Edits are ignored mid-animation, and out-of-grid positions
        // (including the status bar) are no-ops.
        if self.run == RunState::Animating || !self.grid.contains(pos) {
            return;
        }

        let mut edited = false;
        match self.drag {
            None => match self.grid.label(pos) {
                Some(Label::Empty) => {
                    self.drag = Some(Drag::PlaceWalls);
                    if self.grid.place_wall(pos) {
                        self.pulses.push((pos, PULSE_FRAMES));
                        edited = true;
                    }
                }
                Some(Label::Wall) => {
                    self.drag = Some(Drag::RemoveWalls);
                    edited = self.grid.remove_wall(pos);
                }
                Some(Label::Start) => self.drag = Some(Drag::MoveStart),
                Some(Label::End) => self.drag = Some(Drag::MoveEnd),
                None => {}
            },
            Some(Drag::PlaceWalls) => {
                if self.grid.place_wall(pos) {
                    self.pulses.push((pos, PULSE_FRAMES));
                    edited = true;
                }
            }
            Some(Drag::RemoveWalls) => edited = self.grid.remove_wall(pos),
            Some(Drag::MoveStart) => edited = self.grid.move_start(pos),
            Some(Drag::MoveEnd) => edited = self.grid.move_end(pos),
        }

        if edited && self.run == RunState::Showing {
            self.recompute();
        }
    }

    // -------------------------------------------------------------------
    // Keyboard input
    // -------------------------------------------------------------------

    fn handle_key(&mut self, key: Key, modifiers: ModMask) -> Option<Effect> {
        if modifiers.contains(ModMask::CTRL) {
            return match key {
                Key::Char('c') => Some(Effect::End),
                _ => None,
            };
        }
        match key {
            Key::Char('b') => self.start_run(Algorithm::Bfs),
            Key::Char('d') => self.start_run(Algorithm::Dfs),
            Key::Char('a') => self.start_run(Algorithm::BestFirst),
            Key::Char('c') => self.clear(false),
            Key::Char('C') => self.clear(true),
            Key::Char('w') => self.scatter(),
            Key::Char('q') | Key::Escape => return Some(Effect::End),
            _ => {}
        }
        None
    }

    /// Rebuild everything for a new viewport size, discarding walls and any
    /// in-progress run.
    fn resize(&mut self, width: i32, height: i32) {
        self.grid = SearchGrid::new(Point::new(width, height - STATUS_ROWS));
        self.engine = SearchEngine::new();
        self.run = RunState::Idle;
        self.drag = None;
        self.prev_highlight = None;
        self.pulses.clear();
    }

    // -------------------------------------------------------------------
    // Status
    // -------------------------------------------------------------------

    fn status_text(&self) -> String {
        let keys = " [b]fs  [d]fs  [a]*  [c]lear  [C]lear walls  [w]alls  [q]uit";
        let outcome = match self.run {
            RunState::Idle => String::new(),
            RunState::Animating => format!("{}: searching...", self.engine.algorithm().name()),
            RunState::Showing => {
                let cells = self.grid.path_cells();
                if cells > 0 {
                    format!("{}: path of {} steps", self.engine.algorithm().name(), cells - 1)
                } else {
                    format!("{}: no path", self.engine.algorithm().name())
                }
            }
        };
        if outcome.is_empty() {
            keys.to_string()
        } else {
            format!("{keys}  |  {outcome}")
        }
    }
}

impl gridpath_core::app::Model for PathvizModel {
    fn update(&mut self, msg: Msg) -> Option<Effect> {
        match msg {
            Msg::Init => None,
            Msg::Tick { .. } => {
                self.tick();
                None
            }
            Msg::KeyDown { key, modifiers, .. } => self.handle_key(key, modifiers),
            Msg::Mouse { action, pos, .. } => {
                match action {
                    MouseAction::Main => self.handle_pointer(pos),
                    // A drag continues an active gesture only; plain mouse
                    // motion does nothing.
                    MouseAction::Move => {
                        if self.drag.is_some() {
                            self.handle_pointer(pos);
                        }
                    }
                    MouseAction::Release => self.drag = None,
                    MouseAction::Secondary => {}
                }
                None
            }
            Msg::Screen { width, height, .. } => {
                self.resize(width, height);
                None
            }
            Msg::Quit => Some(Effect::End),
        }
    }

    fn draw(&self, display: &mut Grid) {
        display.fill(Cell::default().with_style(Style::default().with_bg(BACKGROUND)));

        // Grid cells: state colour first, label colour on top.
        let size = self.grid.size();
        for y in 0..size.y {
            for x in 0..size.x {
                let p = Point::new(x, y);
                let Some(i) = self.grid.idx(p) else { continue };
                let spot = self.grid.spot(i);

                let bg = match spot.label {
                    Label::Wall => WALL,
                    Label::Start => START,
                    Label::End => END,
                    Label::Empty => match spot.state {
                        SpotState::Unvisited => UNVISITED,
                        SpotState::Visited => VISITED,
                        SpotState::Path => PATH,
                        SpotState::Highlight => HIGHLIGHT,
                    },
                };

                let (ch, fg) = match spot.label {
                    Label::Start => ('S', MARKER_FG),
                    Label::End => ('E', MARKER_FG),
                    _ => (' ', MARKER_FG),
                };

                display.set(p, Cell::default().with_char(ch).with_style(
                    Style::default().with_fg(fg).with_bg(bg),
                ));
            }
        }

        // Freshly placed walls pulse for a few frames.
        for &(p, _) in &self.pulses {
            let cell = display.at(p);
            let style = cell.style.with_attrs(AttrMask::REVERSE | AttrMask::BOLD);
            display.set(p, cell.with_style(style));
        }

        // Status bar on the bottom row.
        let status_y = display.height() - 1;
        let style = Style::default().with_fg(STATUS_FG).with_bg(STATUS_BG);
        for x in 0..display.width() {
            display.set(
                Point::new(x, status_y),
                Cell::default().with_char(' ').with_style(style),
            );
        }
        for (x, ch) in self.status_text().chars().enumerate() {
            if (x as i32) >= display.width() {
                break;
            }
            display.set(
                Point::new(x as i32, status_y),
                Cell::default().with_char(ch).with_style(style),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridpath_core::app::Model;

    fn press(model: &mut PathvizModel, p: Point) {
        model.update(Msg::mouse(MouseAction::Main, p));
    }

    fn drag_to(model: &mut PathvizModel, p: Point) {
        model.update(Msg::mouse(MouseAction::Move, p));
    }

    fn release(model: &mut PathvizModel) {
        model.update(Msg::mouse(MouseAction::Release, Point::ZERO));
    }

    fn tick(model: &mut PathvizModel) {
        model.update(Msg::tick());
    }

    fn run_until_shown(model: &mut PathvizModel) {
        for _ in 0..1000 {
            if model.run == RunState::Showing {
                return;
            }
            tick(model);
        }
        panic!("run did not settle");
    }

    /// 12x11 viewport: a 12x10 grid plus the status row. Start (3, 5),
    /// end (9, 5).
    fn model() -> PathvizModel {
        let m = PathvizModel::new(12, 11);
        assert_eq!(m.grid.size(), Point::new(12, 10));
        m
    }

    #[test]
    fn wall_drag_mode_is_fixed_per_gesture() {
        let mut m = model();
        let a = Point::new(0, 0);
        let b = Point::new(1, 0);
        press(&mut m, a);
        assert_eq!(m.drag, Some(Drag::PlaceWalls));
        assert_eq!(m.grid.label(a), Some(Label::Wall));
        // Dragging over an existing wall in place-mode does not remove it.
        drag_to(&mut m, a);
        assert_eq!(m.grid.label(a), Some(Label::Wall));
        drag_to(&mut m, b);
        assert_eq!(m.grid.label(b), Some(Label::Wall));
        release(&mut m);
        assert_eq!(m.drag, None);

        // A new gesture starting on a wall removes walls instead.
        press(&mut m, a);
        assert_eq!(m.drag, Some(Drag::RemoveWalls));
        assert_eq!(m.grid.label(a), Some(Label::Empty));
        // ... and dragging over empty cells in remove-mode places nothing.
        drag_to(&mut m, Point::new(2, 0));
        assert_eq!(m.grid.label(Point::new(2, 0)), Some(Label::Empty));
    }

    #[test]
    fn marker_drag_moves_only_onto_empty() {
        let mut m = model();
        let start = m.grid.start();
        let wall = Point::new(4, 5);
        press(&mut m, wall); // places a wall
        release(&mut m);

        press(&mut m, start);
        assert_eq!(m.drag, Some(Drag::MoveStart));
        drag_to(&mut m, wall);
        assert_eq!(m.grid.start(), start, "marker must not land on a wall");
        drag_to(&mut m, Point::new(3, 6));
        assert_eq!(m.grid.start(), Point::new(3, 6));
        assert_eq!(m.grid.label(start), Some(Label::Empty));
    }

    #[test]
    fn animation_is_bounded_per_tick() {
        let mut m = PathvizModel::new(40, 21); // 800 grid cells
        m.update(Msg::key(Key::Char('b')));
        assert_eq!(m.run, RunState::Animating);
        tick(&mut m);
        let visited = (0..m.grid.len())
            .filter(|&i| m.grid.spot(i).state != SpotState::Unvisited)
            .count();
        assert!(visited > 0);
        // One tick can touch at most the step bound plus the highlight
        // chain it repaints.
        assert!(visited <= 2 * STEPS_PER_TICK);
        assert_eq!(m.run, RunState::Animating);
    }

    #[test]
    fn run_completes_and_reports_path() {
        let mut m = model();
        m.update(Msg::key(Key::Char('b')));
        run_until_shown(&mut m);
        assert!(m.grid.path_cells() > 0);
        assert!(m.status_text().contains("path of 6 steps"));
    }

    #[test]
    fn edit_after_run_recomputes_instantly() {
        let mut m = model();
        m.update(Msg::key(Key::Char('b')));
        run_until_shown(&mut m);
        let before = m.grid.path_cells();
        assert_eq!(before - 1, 6);

        // Wall the direct corridor cell; the recompute happens inside the
        // pointer update, before the next paint.
        press(&mut m, Point::new(5, 5));
        release(&mut m);
        assert_eq!(m.run, RunState::Showing);
        let after = m.grid.path_cells();
        assert_eq!(after - 1, 8, "detour around one wall adds two steps");
    }

    #[test]
    fn edits_are_ignored_mid_animation() {
        let mut m = PathvizModel::new(40, 21);
        m.update(Msg::key(Key::Char('b')));
        tick(&mut m);
        assert_eq!(m.run, RunState::Animating);
        let p = Point::new(0, 0);
        press(&mut m, p);
        assert_eq!(m.grid.label(p), Some(Label::Empty));
        assert_eq!(m.drag, None);
    }

    #[test]
    fn clear_keeps_walls_clear_all_removes_them() {
        let mut m = model();
        press(&mut m, Point::new(0, 0));
        release(&mut m);
        m.update(Msg::key(Key::Char('b')));
        run_until_shown(&mut m);

        m.update(Msg::key(Key::Char('c')));
        assert_eq!(m.run, RunState::Idle);
        assert_eq!(m.grid.path_cells(), 0);
        assert_eq!(m.grid.label(Point::new(0, 0)), Some(Label::Wall));

        m.update(Msg::key(Key::Char('C')));
        assert_eq!(m.grid.label(Point::new(0, 0)), Some(Label::Empty));
    }

    #[test]
    fn no_path_outcome_still_recomputes_on_edit() {
        let mut m = model();
        // Enclose the start.
        for n in m.grid.start().neighbors_4() {
            press(&mut m, n);
            release(&mut m);
        }
        m.update(Msg::key(Key::Char('a')));
        run_until_shown(&mut m);
        assert_eq!(m.grid.path_cells(), 0);
        assert!(m.status_text().contains("no path"));

        // Opening the enclosure recomputes and finds a path again.
        let gap = m.grid.start().shift(1, 0);
        press(&mut m, gap);
        release(&mut m);
        assert!(m.grid.path_cells() > 0);
    }

    #[test]
    fn pulses_decay_over_frames() {
        let mut m = model();
        press(&mut m, Point::new(0, 0));
        release(&mut m);
        assert_eq!(m.pulses.len(), 1);
        for _ in 0..PULSE_FRAMES {
            tick(&mut m);
        }
        assert!(m.pulses.is_empty());
    }

    #[test]
    fn resize_rebuilds_the_grid() {
        let mut m = model();
        press(&mut m, Point::new(0, 0));
        release(&mut m);
        m.update(Msg::Screen {
            width: 20,
            height: 16,
            time: std::time::Instant::now(),
        });
        assert_eq!(m.grid.size(), Point::new(20, 15));
        assert_eq!(m.grid.label(Point::new(0, 0)), Some(Label::Empty));
        assert_eq!(m.run, RunState::Idle);
    }

    #[test]
    fn quit_keys_end_the_app() {
        let mut m = model();
        assert_eq!(m.update(Msg::key(Key::Char('q'))), Some(Effect::End));
        assert_eq!(m.update(Msg::key(Key::Escape)), Some(Effect::End));
        assert_eq!(
            m.update(Msg::KeyDown {
                key: Key::Char('c'),
                modifiers: ModMask::CTRL,
                time: std::time::Instant::now(),
            }),
            Some(Effect::End)
        );
    }

    #[test]
    fn draw_paints_status_and_markers() {
        let mut m = model();
        let mut display = Grid::new(12, 11);
        m.update(Msg::Init);
        m.draw(&mut display);
        assert_eq!(display.at(m.grid.start()).ch, 'S');
        assert_eq!(display.at(m.grid.end()).ch, 'E');
        assert_eq!(display.at(Point::new(0, 10)).style.bg, STATUS_BG);
        assert_eq!(display.at(Point::new(1, 0)).style.bg, UNVISITED);
    }
}
