//! The display [`Grid`] and frame diffing.
//!
//! A `Grid` owns a flat buffer of styled [`Cell`]s. The application loop
//! keeps two of them (previous and current frame) and flushes only the
//! cells that differ, via [`compute_frame`].

use crate::cell::Cell;
use crate::geom::Point;

/// A 2D grid of display [`Cell`]s with owned storage.
#[derive(Debug, Clone)]
pub struct Grid {
    cells: Vec<Cell>,
    width: i32,
    height: i32,
}

impl Grid {
    /// Create a new grid of the given dimensions, filled with default cells.
    /// Negative dimensions are clamped to zero.
    pub fn new(width: i32, height: i32) -> Self {
        let w = width.max(0);
        let h = height.max(0);
        Self {
            cells: vec![Cell::default(); (w * h) as usize],
            width: w,
            height: h,
        }
    }

    /// Size of the grid as a `Point` (x = width, y = height).
    #[inline]
    pub fn size(&self) -> Point {
        Point::new(self.width, self.height)
    }

    /// Width.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Whether `p` is inside the grid.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.in_bounds(self.size())
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if self.contains(p) {
            Some((p.y * self.width + p.x) as usize)
        } else {
            None
        }
    }

    /// Read the cell at `p`. Returns `Cell::default()` if `p` is outside
    /// bounds.
    pub fn at(&self, p: Point) -> Cell {
        self.index(p).map(|i| self.cells[i]).unwrap_or_default()
    }

    /// Set the cell at `p`. No-op if `p` is outside bounds.
    pub fn set(&mut self, p: Point, cell: Cell) {
        if let Some(i) = self.index(p) {
            self.cells[i] = cell;
        }
    }

    /// Fill every cell with `cell`.
    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Discard the contents and adopt new dimensions.
    pub fn resize(&mut self, width: i32, height: i32) {
        *self = Grid::new(width, height);
    }

    /// Copy the full contents of `src`, adopting its dimensions.
    pub fn copy_from(&mut self, src: &Grid) {
        self.cells.clear();
        self.cells.extend_from_slice(&src.cells);
        self.width = src.width;
        self.height = src.height;
    }

    /// Row-major iterator over `(Point, Cell)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Cell)> + '_ {
        let w = self.width;
        self.cells.iter().enumerate().map(move |(i, &c)| {
            let i = i as i32;
            (Point::new(i % w, i / w), c)
        })
    }
}

// ---------------------------------------------------------------------------
// Frame / FrameCell / compute_frame
// ---------------------------------------------------------------------------

/// A single cell that changed between frames.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameCell {
    pub cell: Cell,
    pub pos: Point,
}

/// A set of cell changes (a diff frame).
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    pub cells: Vec<FrameCell>,
    pub width: i32,
    pub height: i32,
}

/// Compute the difference between the previous and current frame.
///
/// If the grids have different dimensions (e.g. right after a resize),
/// every cell of `curr` is reported.
pub fn compute_frame(prev: &Grid, curr: &Grid) -> Frame {
    let mut cells = Vec::new();
    let resized = prev.size() != curr.size();
    for (p, cc) in curr.iter() {
        if resized || prev.at(p) != cc {
            cells.push(FrameCell { cell: cc, pos: p });
        }
    }
    Frame {
        cells,
        width: curr.width(),
        height: curr.height(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_new_and_at() {
        let g = Grid::new(4, 3);
        assert_eq!(g.size(), Point::new(4, 3));
        assert_eq!(g.at(Point::new(0, 0)), Cell::default());
        // out of bounds returns default
        assert_eq!(g.at(Point::new(10, 10)), Cell::default());
    }

    #[test]
    fn grid_set_and_get() {
        let mut g = Grid::new(4, 3);
        let c = Cell::default().with_char('X');
        g.set(Point::new(2, 1), c);
        assert_eq!(g.at(Point::new(2, 1)).ch, 'X');
        // out-of-bounds set is a no-op
        g.set(Point::new(-1, 0), c);
        g.set(Point::new(4, 0), c);
    }

    #[test]
    fn grid_fill_and_iter() {
        let mut g = Grid::new(3, 2);
        g.fill(Cell::default().with_char('.'));
        assert_eq!(g.iter().count(), 6);
        for (_, cell) in g.iter() {
            assert_eq!(cell.ch, '.');
        }
    }

    #[test]
    fn compute_frame_diff() {
        let a = Grid::new(3, 2);
        let mut b = Grid::new(3, 2);
        b.set(Point::new(1, 0), Cell::default().with_char('A'));
        let frame = compute_frame(&a, &b);
        assert_eq!(frame.cells.len(), 1);
        assert_eq!(frame.cells[0].pos, Point::new(1, 0));
        assert_eq!(frame.cells[0].cell.ch, 'A');
    }

    #[test]
    fn compute_frame_identical_is_empty() {
        let a = Grid::new(3, 2);
        let b = a.clone();
        assert!(compute_frame(&a, &b).cells.is_empty());
    }

    #[test]
    fn compute_frame_after_resize_is_full() {
        let a = Grid::new(2, 2);
        let b = Grid::new(3, 2);
        assert_eq!(compute_frame(&a, &b).cells.len(), 6);
    }

    #[test]
    fn degenerate_grid_is_empty() {
        let g = Grid::new(0, 5);
        assert_eq!(g.iter().count(), 0);
        assert!(!g.contains(Point::ZERO));
    }
}
