use gridpath_core::Point;

/// Manhattan (L1) distance between two points.
///
/// Admissible and consistent for 4-connected unit-cost grids, which is what
/// the best-first search relies on to return shortest paths.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_is_symmetric() {
        let a = Point::new(2, 5);
        let b = Point::new(7, 1);
        assert_eq!(manhattan(a, b), 9);
        assert_eq!(manhattan(b, a), 9);
        assert_eq!(manhattan(a, a), 0);
    }
}
