//! Random placement of new entities on free cells

use rand::Rng;

use super::state::Position;

/// Upper bound on random probes per placement. A dense grid may run out of
/// attempts; the caller treats that as "nothing spawned this time".
pub const MAX_PLACEMENT_ATTEMPTS: usize = 100;

/// Anything that can block a grid cell
pub trait Occupancy {
    fn occupies(&self, pos: Position) -> bool;
}

/// Probe up to [`MAX_PLACEMENT_ATTEMPTS`] uniform cells of a `width` x `height`
/// grid and return the first one no obstacle occupies.
pub fn find_free_cell<R: Rng + ?Sized>(
    rng: &mut R,
    width: usize,
    height: usize,
    obstacles: &[&dyn Occupancy],
) -> Option<Position> {
    if width == 0 || height == 0 {
        return None;
    }

    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let pos = Position::new(
            rng.gen_range(0..width) as i32,
            rng.gen_range(0..height) as i32,
        );

        if !obstacles.iter().any(|o| o.occupies(pos)) {
            return Some(pos);
        }
    }

    tracing::trace!(width, height, "placement search exhausted");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    struct Cells(HashSet<Position>);

    impl Occupancy for Cells {
        fn occupies(&self, pos: Position) -> bool {
            self.0.contains(&pos)
        }
    }

    /// Every cell except one
    fn all_but(width: i32, height: i32, hole: Position) -> Cells {
        let mut set = HashSet::new();
        for x in 0..width {
            for y in 0..height {
                let pos = Position::new(x, y);
                if pos != hole {
                    set.insert(pos);
                }
            }
        }
        Cells(set)
    }

    #[test]
    fn test_empty_grid_yields_in_bounds_cell() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..50 {
            let pos = find_free_cell(&mut rng, 4, 3, &[]).unwrap();
            assert!(pos.in_bounds(4, 3));
        }
    }

    #[test]
    fn test_zero_sized_grid_yields_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert!(find_free_cell(&mut rng, 0, 5, &[]).is_none());
        assert!(find_free_cell(&mut rng, 5, 0, &[]).is_none());
    }

    #[test]
    fn test_full_grid_exhausts_attempts() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let full = Cells((0..2).flat_map(|x| (0..2).map(move |y| Position::new(x, y))).collect());
        assert!(find_free_cell(&mut rng, 2, 2, &[&full]).is_none());
    }

    #[test]
    fn test_only_free_cell_is_found() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let hole = Position::new(1, 0);
        let blocked = all_but(2, 2, hole);
        // Four cells, one free: 100 probes miss it with probability (3/4)^100
        assert_eq!(find_free_cell(&mut rng, 2, 2, &[&blocked]), Some(hole));
    }

    #[test]
    fn test_every_obstacle_is_consulted() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let left = Cells([Position::new(0, 0)].into_iter().collect());
        let right = Cells([Position::new(1, 0)].into_iter().collect());
        for _ in 0..20 {
            let pos = find_free_cell(&mut rng, 3, 1, &[&left, &right]).unwrap();
            assert_eq!(pos, Position::new(2, 0));
        }
    }
}
