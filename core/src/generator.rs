use ndarray::Array2;
use rand::prelude::*;

use crate::{BoardConfig, Coord, Space};

/// Deterministic mine placement.
///
/// Layouts are a pure function of `(seed, origin, board dimensions, mine
/// count)`: the indices are drawn by sequential sampling without replacement
/// over the eligible spaces, then resolved against a row-major walk of the
/// grid. Saving the seed is enough to rebuild the exact same minefield.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MineGenerator {
    seed: u64,
    origin: Option<Space>,
}

impl MineGenerator {
    /// Spaces in the clipped 3x3 neighborhood of `origin` (the origin
    /// itself included) never receive a mine.
    pub fn new(seed: u64, origin: Option<Space>) -> Self {
        Self { seed, origin }
    }

    pub fn generate(self, config: &BoardConfig) -> Array2<bool> {
        let mut mines =
            Array2::from_elem((config.height as usize, config.width as usize), false);

        let safe_count = match self.origin {
            Some(origin) => exclusion_size(origin, config.width, config.height),
            None => 0,
        };
        let pool_size = config.total_spaces() - safe_count;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        for placed in 0..config.mines.min(pool_size) {
            // one fewer candidate each round, the walk skips placed mines
            let index = rng.random_range(0..pool_size - placed);
            place_mine(&mut mines, self.origin, index);
        }

        log::debug!(
            "generated {} mines with seed {} around {:?}",
            config.mines.min(pool_size),
            self.seed,
            self.origin
        );
        mines
    }
}

fn in_exclusion(origin: Space, space: Space) -> bool {
    (space.x - origin.x).abs() <= 1 && (space.y - origin.y).abs() <= 1
}

/// How many board spaces the exclusion neighborhood actually covers: 4 in a
/// corner, 6 on an edge, 9 in the interior, less if the origin hangs off
/// the board entirely.
fn exclusion_size(origin: Space, width: Coord, height: Coord) -> usize {
    let x0 = (origin.x - 1).max(0);
    let x1 = (origin.x + 1).min(width - 1);
    let y0 = (origin.y - 1).max(0);
    let y1 = (origin.y + 1).min(height - 1);

    if x0 > x1 || y0 > y1 {
        return 0;
    }
    ((x1 - x0 + 1) * (y1 - y0 + 1)) as usize
}

/// Walks the grid row-major, counting one slot per eligible empty space,
/// and drops a mine on the space matching `index`. Excluded spaces and
/// spaces that already hold a mine do not consume a slot.
fn place_mine(mines: &mut Array2<bool>, origin: Option<Space>, index: usize) {
    let mut slot = 0;
    for ((row, col), cell) in mines.indexed_iter_mut() {
        let space = Space::new(col as Coord, row as Coord);
        if origin.is_some_and(|origin| in_exclusion(origin, space)) {
            continue;
        }
        if *cell {
            continue;
        }

        if slot == index {
            *cell = true;
            return;
        }
        slot += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(width: Coord, height: Coord, mines: usize) -> BoardConfig {
        BoardConfig::new(width, height, mines, 0)
    }

    fn mine_total(mines: &Array2<bool>) -> usize {
        mines.iter().filter(|&&mine| mine).count()
    }

    #[test]
    fn places_exactly_the_requested_mines() {
        let mines = MineGenerator::new(7, Some(Space::new(4, 4))).generate(&config(9, 9, 10));
        assert_eq!(mine_total(&mines), 10);
    }

    #[test]
    fn never_places_inside_the_exclusion_neighborhood() {
        let origin = Space::new(4, 4);
        for seed in 0..32 {
            let mines = MineGenerator::new(seed, Some(origin)).generate(&config(9, 9, 10));
            for ((row, col), &mine) in mines.indexed_iter() {
                let space = Space::new(col as Coord, row as Coord);
                if in_exclusion(origin, space) {
                    assert!(!mine, "seed {seed} put a mine at {space:?}");
                }
            }
        }
    }

    #[test]
    fn same_inputs_reproduce_the_same_layout() {
        let origin = Some(Space::new(0, 0));
        let first = MineGenerator::new(42, origin).generate(&config(16, 16, 40));
        let second = MineGenerator::new(42, origin).generate(&config(16, 16, 40));
        assert_eq!(first, second);
    }

    #[test]
    fn different_seeds_change_the_layout() {
        let layouts: Vec<_> = (1..=3)
            .map(|seed| MineGenerator::new(seed, None).generate(&config(9, 9, 10)))
            .collect();
        assert!(
            layouts[0] != layouts[1] || layouts[1] != layouts[2],
            "three seeds in a row produced identical layouts"
        );
    }

    #[test]
    fn without_origin_every_space_is_eligible() {
        // capacity on a 4x4 board is 7 mines, the full pool minus the
        // safe-zone reserve
        let mines = MineGenerator::new(11, None).generate(&config(4, 4, 7));
        assert_eq!(mine_total(&mines), 7);
    }

    #[test]
    fn exclusion_size_clips_at_corners_and_edges() {
        assert_eq!(exclusion_size(Space::new(0, 0), 9, 9), 4);
        assert_eq!(exclusion_size(Space::new(4, 0), 9, 9), 6);
        assert_eq!(exclusion_size(Space::new(0, 4), 9, 9), 6);
        assert_eq!(exclusion_size(Space::new(4, 4), 9, 9), 9);
        assert_eq!(exclusion_size(Space::new(40, 40), 9, 9), 0);
    }

    #[test]
    fn zero_mines_generates_an_empty_field() {
        let mines = MineGenerator::new(1, None).generate(&config(5, 5, 0));
        assert_eq!(mine_total(&mines), 0);
    }
}
