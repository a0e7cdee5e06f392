//! Random wall scatter for quickly building terrain.

use rand::{Rng, RngExt};

use crate::grid::{Label, SearchGrid};

/// Turn roughly `density` of the empty cells into walls. Start and end
/// markers (and existing walls) are never touched. Returns the number of
/// walls placed.
pub fn scatter_walls<R: Rng>(grid: &mut SearchGrid, rng: &mut R, density: f64) -> usize {
    let density = density.clamp(0.0, 1.0);
    let mut placed = 0;
    for i in 0..grid.len() {
        if grid.spot(i).label == Label::Empty && rng.random_bool(density) {
            let p = grid.point(i);
            grid.set_label(p, Label::Wall);
            placed += 1;
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridpath_core::Point;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn scatter_spares_markers() {
        let mut g = SearchGrid::new(Point::new(20, 20));
        let mut rng = StdRng::seed_from_u64(7);
        let placed = scatter_walls(&mut g, &mut rng, 0.5);
        assert!(placed > 0);
        assert_eq!(g.label(g.start()), Some(Label::Start));
        assert_eq!(g.label(g.end()), Some(Label::End));
        let walls = (0..g.len())
            .filter(|&i| g.spot(i).label == Label::Wall)
            .count();
        assert_eq!(walls, placed);
    }

    #[test]
    fn full_density_fills_everything_else() {
        let mut g = SearchGrid::new(Point::new(6, 6));
        let mut rng = StdRng::seed_from_u64(0);
        let placed = scatter_walls(&mut g, &mut rng, 1.0);
        assert_eq!(placed, g.len() - 2);
    }

    #[test]
    fn zero_density_is_a_no_op() {
        let mut g = SearchGrid::new(Point::new(6, 6));
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(scatter_walls(&mut g, &mut rng, 0.0), 0);
    }
}
