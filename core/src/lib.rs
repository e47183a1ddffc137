//! Minefield simulation engine: deterministic mine placement with a
//! safe-zone guarantee on the first click, flood-fill reveals, flag and
//! mark cycling, win/loss detection, and a limited cheat budget.
//!
//! Rendering, input handling, and persistence all live elsewhere; the
//! engine is plain serializable data driven through [`Board::handle_click`].

use serde::{Deserialize, Serialize};

pub use board::*;
pub use error::*;
pub use generator::*;
pub use piece::*;
pub use types::*;

mod board;
mod error;
mod generator;
mod piece;
mod types;

/// Board construction parameters. `new` silently clamps out-of-range
/// values instead of failing, so a misbehaving settings dialog can never
/// produce an unplayable board.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub width: Coord,
    pub height: Coord,
    pub mines: usize,
    pub cheats: u32,
}

impl BoardConfig {
    /// Caller guarantees the values are already in range.
    pub const fn new_unchecked(width: Coord, height: Coord, mines: usize, cheats: u32) -> Self {
        Self {
            width,
            height,
            mines,
            cheats,
        }
    }

    pub fn new(width: Coord, height: Coord, mines: usize, cheats: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        // always keep room for the 3x3 safe zone of the first click
        let capacity = (width as usize) * (height as usize);
        let mines = mines.min(capacity.saturating_sub(9));
        Self::new_unchecked(width, height, mines, cheats)
    }

    pub const fn total_spaces(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_clamps_degenerate_dimensions() {
        let config = BoardConfig::new(0, -3, 50, 1);
        assert_eq!((config.width, config.height), (1, 1));
        assert_eq!(config.mines, 0);
    }

    #[test]
    fn config_reserves_the_safe_zone() {
        let config = BoardConfig::new(10, 10, 95, 2);
        assert_eq!(config.mines, 91);
        assert_eq!(config.cheats, 2);

        let untouched = BoardConfig::new(9, 9, 10, 1);
        assert_eq!(untouched.mines, 10);
    }
}
