//! The editable [`SearchGrid`] arena.

use gridpath_core::Point;

use crate::distance::manhattan;

/// Sentinel score meaning "not yet reached".
pub const UNREACHABLE: i32 = i32::MAX;

/// Transient search-progress marker of a cell. Reset between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpotState {
    #[default]
    Unvisited,
    Visited,
    Path,
    /// The in-progress chain highlighted while a run animates. Set and
    /// cleared by the render loop, never by the engine.
    Highlight,
}

/// A cell's fixed role, edited only by user interaction. Survives runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Label {
    #[default]
    Empty,
    Wall,
    Start,
    End,
}

/// One grid cell. Predecessors are indices into the owning grid's arena,
/// forming the path-reconstruction chain back to the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spot {
    pub state: SpotState,
    pub label: Label,
    pub prev: Option<usize>,
    pub g: i32,
    pub f: i32,
}

impl Default for Spot {
    fn default() -> Self {
        Self {
            state: SpotState::Unvisited,
            label: Label::Empty,
            prev: None,
            g: UNREACHABLE,
            f: UNREACHABLE,
        }
    }
}

/// A 2D grid of [`Spot`]s stored as a flat arena, plus the start and end
/// markers.
///
/// Invariant: on a non-empty grid, exactly one cell has [`Label::Start`]
/// and exactly one has [`Label::End`]. The raw [`set_label`](Self::set_label)
/// escape hatch does not enforce this; the marker-moving and wall-editing
/// methods do.
#[derive(Debug, Clone)]
pub struct SearchGrid {
    size: Point,
    spots: Vec<Spot>,
    start: Point,
    end: Point,
}

impl SearchGrid {
    /// Create a grid of the given size (x = columns, y = rows).
    ///
    /// The start marker is placed at `(cols / 4, rows / 2)` and the end
    /// marker at `(3 * (cols / 4), rows / 2)`. Negative dimensions are
    /// clamped to zero; a degenerate empty grid is accepted and simply has
    /// no cells (and no markers).
    pub fn new(size: Point) -> Self {
        let size = Point::new(size.x.max(0), size.y.max(0));
        let start = Point::new(size.x / 4, size.y / 2);
        let end = Point::new(3 * (size.x / 4), size.y / 2);
        let mut grid = Self {
            size,
            spots: vec![Spot::default(); (size.x * size.y) as usize],
            start,
            end,
        };
        grid.set_label(start, Label::Start);
        grid.set_label(end, Label::End);
        grid.reset_scores();
        grid
    }

    /// Grid size (x = columns, y = rows).
    #[inline]
    pub fn size(&self) -> Point {
        self.size
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.spots.len()
    }

    /// Whether the grid has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    /// Whether `p` is inside the grid.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.in_bounds(self.size)
    }

    /// Convert a point to a flat arena index. `None` if out of bounds.
    #[inline]
    pub fn idx(&self, p: Point) -> Option<usize> {
        if self.contains(p) {
            Some((p.y * self.size.x + p.x) as usize)
        } else {
            None
        }
    }

    /// Convert a flat arena index back to a point.
    #[inline]
    pub fn point(&self, i: usize) -> Point {
        let i = i as i32;
        Point::new(i % self.size.x, i / self.size.x)
    }

    /// The start marker position.
    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    /// The end marker position.
    #[inline]
    pub fn end(&self) -> Point {
        self.end
    }

    /// Arena index of the start cell, if the grid is non-empty.
    #[inline]
    pub fn start_idx(&self) -> Option<usize> {
        self.idx(self.start)
    }

    /// Borrow the spot at arena index `i`.
    #[inline]
    pub fn spot(&self, i: usize) -> &Spot {
        &self.spots[i]
    }

    /// Mutably borrow the spot at arena index `i`.
    #[inline]
    pub fn spot_mut(&mut self, i: usize) -> &mut Spot {
        &mut self.spots[i]
    }

    /// The label at `p`, or `None` if out of bounds.
    #[inline]
    pub fn label(&self, p: Point) -> Option<Label> {
        self.idx(p).map(|i| self.spots[i].label)
    }

    /// The state at `p`, or `None` if out of bounds.
    #[inline]
    pub fn state(&self, p: Point) -> Option<SpotState> {
        self.idx(p).map(|i| self.spots[i].state)
    }

    /// Set the label at `p` without any invariant checking. No-op if out of
    /// bounds.
    pub fn set_label(&mut self, p: Point, label: Label) {
        if let Some(i) = self.idx(p) {
            self.spots[i].label = label;
        }
    }

    /// In-bounds cardinal neighbors of `p` as arena indices.
    ///
    /// No wall or state filtering happens here: breadth/depth-first and
    /// best-first exclude different cells, so the filtering stays with
    /// each algorithm.
    pub fn neighbors4(&self, p: Point) -> impl Iterator<Item = usize> + '_ {
        p.neighbors_4().into_iter().filter_map(|n| self.idx(n))
    }

    // -----------------------------------------------------------------------
    // Run lifecycle
    // -----------------------------------------------------------------------

    /// Reset all transient search state: every cell becomes unvisited with
    /// no predecessor and unreachable scores, then the start cell's g score
    /// is set to 0 and its f score to the heuristic distance to the end.
    /// Labels (walls, markers) are untouched. Idempotent.
    pub fn reset_scores(&mut self) {
        for spot in &mut self.spots {
            spot.state = SpotState::Unvisited;
            spot.prev = None;
            spot.g = UNREACHABLE;
            spot.f = UNREACHABLE;
        }
        if let Some(si) = self.idx(self.start) {
            self.spots[si].g = 0;
            self.spots[si].f = manhattan(self.start, self.end);
        }
    }

    /// Walk the predecessor chain from arena index `from` back to the start
    /// (the first cell with no predecessor), setting every cell touched to
    /// `state`. The start cell itself is re-marked too.
    pub fn mark_chain(&mut self, from: usize, state: SpotState) {
        let mut cur = Some(from);
        while let Some(i) = cur {
            self.spots[i].state = state;
            cur = self.spots[i].prev;
        }
    }

    /// Number of cells currently marked [`SpotState::Path`].
    pub fn path_cells(&self) -> usize {
        self.spots
            .iter()
            .filter(|s| s.state == SpotState::Path)
            .count()
    }

    // -----------------------------------------------------------------------
    // Label edits (invariant-preserving)
    // -----------------------------------------------------------------------

    /// Place a wall at `p`. Only empty cells accept a wall; returns whether
    /// the edit happened.
    pub fn place_wall(&mut self, p: Point) -> bool {
        if self.label(p) == Some(Label::Empty) {
            self.set_label(p, Label::Wall);
            true
        } else {
            false
        }
    }

    /// Remove a wall at `p`. Returns whether the edit happened.
    pub fn remove_wall(&mut self, p: Point) -> bool {
        if self.label(p) == Some(Label::Wall) {
            self.set_label(p, Label::Empty);
            true
        } else {
            false
        }
    }

    /// Move the start marker to `p`. Only empty cells accept the marker
    /// (never a wall, the end, or out-of-bounds); returns whether it moved.
    pub fn move_start(&mut self, p: Point) -> bool {
        if self.label(p) != Some(Label::Empty) {
            return false;
        }
        self.set_label(self.start, Label::Empty);
        self.set_label(p, Label::Start);
        self.start = p;
        true
    }

    /// Move the end marker to `p`. Same acceptance rule as
    /// [`move_start`](Self::move_start).
    pub fn move_end(&mut self, p: Point) -> bool {
        if self.label(p) != Some(Label::Empty) {
            return false;
        }
        self.set_label(self.end, Label::Empty);
        self.set_label(p, Label::End);
        self.end = p;
        true
    }

    /// Turn every wall back into an empty cell.
    pub fn clear_walls(&mut self) {
        for spot in &mut self.spots {
            if spot.label == Label::Wall {
                spot.label = Label::Empty;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_marker_placement() {
        let g = SearchGrid::new(Point::new(10, 10));
        assert_eq!(g.start(), Point::new(2, 5));
        assert_eq!(g.end(), Point::new(6, 5));
        assert_eq!(g.label(g.start()), Some(Label::Start));
        assert_eq!(g.label(g.end()), Some(Label::End));
        // Exactly one of each.
        let starts = (0..g.len())
            .filter(|&i| g.spot(i).label == Label::Start)
            .count();
        let ends = (0..g.len())
            .filter(|&i| g.spot(i).label == Label::End)
            .count();
        assert_eq!((starts, ends), (1, 1));
    }

    #[test]
    fn degenerate_grid_has_no_cells() {
        let g = SearchGrid::new(Point::new(0, 24));
        assert!(g.is_empty());
        assert_eq!(g.start_idx(), None);
        assert_eq!(g.label(Point::ZERO), None);
        // Negative sizes clamp to empty as well.
        let g = SearchGrid::new(Point::new(-3, 7));
        assert!(g.is_empty());
    }

    #[test]
    fn reset_scores_is_idempotent() {
        let mut g = SearchGrid::new(Point::new(8, 8));
        let wall = Point::new(4, 4);
        g.place_wall(wall);
        g.spot_mut(0).state = SpotState::Visited;
        g.spot_mut(1).prev = Some(0);

        g.reset_scores();
        let once = g.clone();
        g.reset_scores();

        for i in 0..g.len() {
            assert_eq!(g.spot(i), once.spot(i));
        }
        // Walls persist; start scores are seeded.
        assert_eq!(g.label(wall), Some(Label::Wall));
        let si = g.start_idx().unwrap();
        assert_eq!(g.spot(si).g, 0);
        assert_eq!(g.spot(si).f, manhattan(g.start(), g.end()));
    }

    #[test]
    fn wall_place_remove_round_trip() {
        let mut g = SearchGrid::new(Point::new(8, 8));
        let p = Point::new(1, 1);
        let before = *g.spot(g.idx(p).unwrap());
        assert!(g.place_wall(p));
        assert!(g.remove_wall(p));
        assert_eq!(*g.spot(g.idx(p).unwrap()), before);
        // Removing again is rejected.
        assert!(!g.remove_wall(p));
    }

    #[test]
    fn walls_rejected_on_markers() {
        let mut g = SearchGrid::new(Point::new(8, 8));
        assert!(!g.place_wall(g.start()));
        assert!(!g.place_wall(g.end()));
        assert_eq!(g.label(g.start()), Some(Label::Start));
    }

    #[test]
    fn marker_move_onto_wall_rejected() {
        let mut g = SearchGrid::new(Point::new(8, 8));
        let wall = Point::new(3, 3);
        g.place_wall(wall);
        let old = g.start();
        assert!(!g.move_start(wall));
        assert_eq!(g.start(), old);
        assert_eq!(g.label(old), Some(Label::Start));
        assert_eq!(g.label(wall), Some(Label::Wall));
        // Out of bounds is rejected too.
        assert!(!g.move_end(Point::new(-1, 0)));
    }

    #[test]
    fn marker_move_onto_empty_clears_old_cell() {
        let mut g = SearchGrid::new(Point::new(8, 8));
        let old = g.start();
        let target = Point::new(0, 0);
        assert!(g.move_start(target));
        assert_eq!(g.start(), target);
        assert_eq!(g.label(target), Some(Label::Start));
        assert_eq!(g.label(old), Some(Label::Empty));
    }

    #[test]
    fn clear_walls_only_touches_walls() {
        let mut g = SearchGrid::new(Point::new(8, 8));
        g.place_wall(Point::new(1, 1));
        g.place_wall(Point::new(2, 2));
        g.clear_walls();
        assert_eq!(g.label(Point::new(1, 1)), Some(Label::Empty));
        assert_eq!(g.label(g.start()), Some(Label::Start));
        assert_eq!(g.label(g.end()), Some(Label::End));
    }

    #[test]
    fn mark_chain_includes_start() {
        let mut g = SearchGrid::new(Point::new(8, 8));
        let a = g.idx(Point::new(0, 0)).unwrap();
        let b = g.idx(Point::new(1, 0)).unwrap();
        let c = g.idx(Point::new(2, 0)).unwrap();
        g.spot_mut(b).prev = Some(a);
        g.spot_mut(c).prev = Some(b);
        g.mark_chain(c, SpotState::Path);
        assert_eq!(g.spot(a).state, SpotState::Path);
        assert_eq!(g.spot(b).state, SpotState::Path);
        assert_eq!(g.spot(c).state, SpotState::Path);
        assert_eq!(g.path_cells(), 3);
    }

    #[test]
    fn neighbors4_clips_at_edges() {
        let g = SearchGrid::new(Point::new(4, 4));
        assert_eq!(g.neighbors4(Point::new(0, 0)).count(), 2);
        assert_eq!(g.neighbors4(Point::new(1, 1)).count(), 4);
        assert_eq!(g.neighbors4(Point::new(3, 3)).count(), 2);
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn spot_round_trip() {
        let spot = Spot {
            state: SpotState::Visited,
            label: Label::Wall,
            prev: Some(7),
            g: 3,
            f: 9,
        };
        let json = serde_json::to_string(&spot).unwrap();
        let back: Spot = serde_json::from_str(&json).unwrap();
        assert_eq!(spot, back);
    }
}
