use serde::{Deserialize, Serialize};

/// Everything that can sit on a board space once the player has touched it.
///
/// An untouched space carries no piece at all (`Option::None` at the board
/// level). There is no behavior here beyond four flat predicates; the board
/// decides what happens on a click.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Piece {
    /// Revealed space showing its adjacent mine count, 0 through 8.
    Number(u8),
    /// Mine shown when the game is lost.
    Mine,
    /// The specific mine whose reveal lost the game.
    MineRed,
    /// Defused mine: shown by a cheat, or on every unflagged mine of a won game.
    MineGreen,
    /// Player-placed flag claiming a mine below.
    Flag,
    /// Flag proven wrong once the game ends.
    FlagNot,
    MarkRed,
    MarkGreen,
    MarkBlue,
}

impl Piece {
    /// Piece for a revealed space with `count` adjacent mines.
    pub fn from_number(count: u8) -> Self {
        debug_assert!(count <= 8, "a space has at most 8 neighbors");
        Self::Number(count)
    }

    pub const fn number(self) -> Option<u8> {
        match self {
            Self::Number(count) => Some(count),
            _ => None,
        }
    }

    pub const fn is_number(self) -> bool {
        matches!(self, Self::Number(_))
    }

    pub const fn is_mark(self) -> bool {
        matches!(self, Self::MarkRed | Self::MarkGreen | Self::MarkBlue)
    }

    /// Whether another action may overwrite this piece. Only marks give way;
    /// numbers, shown mines, and flags all pin their space.
    pub const fn is_replaceable(self) -> bool {
        self.is_mark()
    }

    /// Whether the space still renders raised. Revealed numbers and shown
    /// mines appear pressed, everything else pops back up.
    pub const fn is_enabled(self) -> bool {
        use Piece::*;
        match self {
            Number(_) => false,
            Mine | MineRed | MineGreen => false,
            Flag | FlagNot => true,
            MarkRed | MarkGreen | MarkBlue => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_pressed_and_pinned() {
        for count in 0..=8 {
            let piece = Piece::from_number(count);
            assert!(piece.is_number());
            assert_eq!(piece.number(), Some(count));
            assert!(!piece.is_replaceable());
            assert!(!piece.is_enabled());
        }
    }

    #[test]
    fn only_marks_are_replaceable() {
        use Piece::*;
        for piece in [MarkRed, MarkGreen, MarkBlue] {
            assert!(piece.is_mark());
            assert!(piece.is_replaceable());
            assert!(piece.is_enabled());
        }
        for piece in [Mine, MineRed, MineGreen, Flag, FlagNot] {
            assert!(!piece.is_mark());
            assert!(!piece.is_replaceable());
        }
    }

    #[test]
    fn shown_mines_appear_pressed() {
        use Piece::*;
        for piece in [Mine, MineRed, MineGreen] {
            assert!(!piece.is_enabled());
        }
        for piece in [Flag, FlagNot] {
            assert!(piece.is_enabled());
        }
    }
}
