use std::collections::{BTreeSet, VecDeque};
use std::mem;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::{
    AllSpaces, BoardConfig, BoardError, Coord, MineGenerator, NeighborIter, Piece, Result, Space,
};

/// What a single pointer interaction means to the engine. Buttons pass one
/// of these along instead of a pile of modifier booleans.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickAction {
    /// Normal click, reveals spaces.
    Default,
    /// Places or cycles away a flag.
    Flag,
    /// Cycles the color of a mark.
    Mark,
    /// Safely probes a space, budget permitting.
    Cheat,
}

/// One game of minesweeper from first click to win or loss.
///
/// The board is a closed state machine: `handle_click` is the only gameplay
/// entry point, everything else is construction, reset, or read access.
/// Spaces outside the board and clicks after the game ended are silently
/// ignored, so callers never need to pre-validate input.
///
/// Every piece change is recorded in a pending-update set for the display
/// layer to drain after each action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    config: BoardConfig,
    mines: Array2<bool>,
    pieces: Array2<Option<Piece>>,
    flag_count: usize,
    game_over: bool,
    victory: bool,
    first_click_done: bool,
    cheats_remaining: u32,
    seed: u64,
    pending_updates: BTreeSet<Space>,
}

impl Board {
    /// Creates a board with no mines placed yet; the minefield grows on the
    /// first default click so that click is always safe.
    pub fn new(config: BoardConfig) -> Self {
        // normalize again in case the caller built the config by hand
        let config = BoardConfig::new(config.width, config.height, config.mines, config.cheats);
        let dim = (config.height as usize, config.width as usize);
        Self {
            config,
            mines: Array2::from_elem(dim, false),
            pieces: Array2::from_elem(dim, None),
            flag_count: 0,
            game_over: false,
            victory: false,
            first_click_done: false,
            cheats_remaining: config.cheats,
            seed: 0,
            pending_updates: BTreeSet::new(),
        }
    }

    /// Builds a board around an explicit mine layout, mostly useful for
    /// tests and for collaborators replaying a stored game. The layout is
    /// taken as ground truth: no safe zone is reserved and the first click
    /// plays it as-is.
    pub fn with_mine_coords(
        width: Coord,
        height: Coord,
        mine_coords: &[Space],
        cheats: u32,
    ) -> Result<Self> {
        let mut board = Self::new(BoardConfig::new(width, height, 0, cheats));
        if mine_coords.len() > board.config.total_spaces() {
            return Err(BoardError::TooManyMines);
        }

        for &space in mine_coords {
            if !board.is_valid(space) {
                return Err(BoardError::InvalidCoords);
            }
            let index = board.grid_index(space);
            board.mines[index] = true;
        }

        // duplicates collapse, count what actually landed
        board.config.mines = board.mines.iter().filter(|&&mine| mine).count();
        board.first_click_done = true;
        Ok(board)
    }

    /* Main logic */

    /// Replaces the minefield with the layout derived from `seed`, keeping
    /// the clipped 3x3 neighborhood of `origin` clear. Stores the seed so
    /// the layout can be reproduced later.
    pub fn generate_mines(&mut self, seed: u64, origin: Option<Space>) {
        self.seed = seed;
        self.mines = MineGenerator::new(seed, origin).generate(&self.config);
        self.first_click_done = true;
    }

    /// Dispatches a click. Does nothing once the game is over.
    pub fn handle_click(&mut self, space: Space, action: ClickAction) {
        if self.game_over {
            return;
        }

        match action {
            ClickAction::Default => self.handle_default_click(space),
            ClickAction::Flag => self.handle_flag_click(space),
            ClickAction::Mark => self.handle_mark_click(space),
            ClickAction::Cheat => self.handle_cheat_click(space),
        }
    }

    /// Starts a new game on the same dimensions: the minefield is cleared
    /// and regenerated lazily on the next default click.
    pub fn new_game(&mut self) {
        self.mines.fill(false);
        self.reset_data();

        let spaces = self.all_spaces();
        self.pending_updates.extend(spaces);
    }

    /// Restarts the current game, keeping the minefield. Does nothing
    /// before the first click since there is no layout to restart from.
    pub fn restart(&mut self) {
        if !self.first_click_done {
            return;
        }

        self.reset_data();
        // the layout already exists, the next click must not regenerate it
        self.first_click_done = true;

        let spaces = self.all_spaces();
        self.pending_updates.extend(spaces);
    }

    fn reset_data(&mut self) {
        self.pieces.fill(None);
        self.game_over = false;
        self.victory = false;
        self.first_click_done = false;
        self.cheats_remaining = self.config.cheats;
        self.flag_count = 0;
    }

    /* Clicking */

    fn handle_default_click(&mut self, space: Space) {
        if !self.is_valid(space) {
            return;
        }

        // the first click of a game grows the minefield around itself
        if !self.first_click_done {
            self.generate_mines(rand::random(), Some(space));
        }

        if let Some(number) = self.piece_at(space).and_then(Piece::number) {
            let flags = self
                .neighbors(space)
                .filter(|&neighbor| self.piece_at(neighbor) == Some(Piece::Flag))
                .count();

            // chord: with as many flags as the number says, open the rest.
            // A risky move when a flag is wrong.
            if flags == usize::from(number) {
                for neighbor in self.neighbors(space) {
                    self.reveal_space(neighbor);
                }
            }
        } else {
            self.reveal_space(space);
        }

        // check just once at the end, not per cascaded space
        self.check_victory();
    }

    /// Reveal primitive shared by default and cheat clicks. Flags, numbers,
    /// and shown mines pin their space and are skipped; a mine loses the
    /// game; a zero-count reveal floods its neighbors.
    fn reveal_space(&mut self, space: Space) {
        if !self.is_replaceable(space) {
            return;
        }
        if self.is_mine(space) {
            self.lose_game(space);
            return;
        }

        // worklist flood fill: revealed spaces stop being replaceable, so
        // no space is ever processed twice
        let mut to_visit = VecDeque::from([space]);
        while let Some(visit) = to_visit.pop_front() {
            if !self.is_replaceable(visit) {
                continue;
            }

            let count = self.adjacent_mines(visit);
            self.set_piece(visit, Some(Piece::from_number(count)));

            if count == 0 {
                // none of the neighbors can be a mine, open them all
                log::trace!("flooding neighbors of {visit:?}");
                to_visit.extend(
                    self.neighbors(visit)
                        .filter(|&neighbor| self.is_replaceable(neighbor)),
                );
            }
        }
    }

    fn handle_flag_click(&mut self, space: Space) {
        if !self.is_valid(space) {
            return;
        }

        match self.piece_at(space) {
            // a flag steps down to a mark
            Some(Piece::Flag) => {
                self.set_piece(space, Some(Piece::MarkRed));
                self.flag_count -= 1;
            }
            // marks clear entirely
            Some(piece) if piece.is_mark() => self.set_piece(space, None),
            // blank spaces take the flag
            None => {
                self.set_piece(space, Some(Piece::Flag));
                self.flag_count += 1;
            }
            // numbers and shown mines stay put
            _ => {}
        }
    }

    fn handle_mark_click(&mut self, space: Space) {
        if !self.is_valid(space) {
            return;
        }

        match self.piece_at(space) {
            Some(Piece::MarkRed) => self.set_piece(space, Some(Piece::MarkGreen)),
            Some(Piece::MarkGreen) => self.set_piece(space, Some(Piece::MarkBlue)),
            Some(Piece::MarkBlue) => self.set_piece(space, Some(Piece::MarkRed)),
            Some(Piece::Flag) => {
                self.set_piece(space, Some(Piece::MarkRed));
                self.flag_count -= 1;
            }
            None => self.set_piece(space, Some(Piece::MarkRed)),
            _ => {}
        }
    }

    fn handle_cheat_click(&mut self, space: Space) {
        if !self.is_valid(space) || !self.can_cheat() {
            return;
        }

        // cheating before the first click wastes the safe-zone guarantee:
        // the minefield is generated with no excluded origin
        if !self.first_click_done {
            self.generate_mines(rand::random(), None);
        }

        // only blank and marked spaces are eligible, so a stray cheat never
        // burns itself on a flag or an open number
        if self.piece_at(space).is_some_and(|piece| !piece.is_mark()) {
            return;
        }

        if self.is_mine(space) {
            log::debug!("cheat defused the mine at {space:?}");
            self.set_piece(space, Some(Piece::MineGreen));
        } else {
            self.reveal_space(space);
        }
        self.cheats_remaining -= 1;

        // could have been the last safe space
        self.check_victory();
    }

    /* Victory and loss */

    /// The game is won once every space without a mine shows a number;
    /// flags and marks sitting on mines are irrelevant.
    fn check_victory(&mut self) {
        for space in self.all_spaces() {
            if !self.is_mine(space)
                && !self.piece_at(space).is_some_and(|piece| piece.is_number())
            {
                return;
            }
        }

        log::debug!("all safe spaces revealed, game won");
        self.victory = true;
        self.game_over = true;
        self.show_mines(None, true);
    }

    fn lose_game(&mut self, clicked: Space) {
        log::debug!("mine hit at {clicked:?}, game lost");
        self.game_over = true;
        self.show_mines(Some(clicked), false);
    }

    /// End-of-game sweep: reveal the minefield and grade the flags.
    fn show_mines(&mut self, clicked: Option<Space>, victory: bool) {
        // on a win the remaining mines show as defused
        let mine_piece = if victory { Piece::MineGreen } else { Piece::Mine };

        // the mine that was clicked takes the blame
        if let Some(clicked) = clicked {
            if self.is_mine(clicked) {
                self.set_piece(clicked, Some(Piece::MineRed));
            }
        }

        for space in self.all_spaces() {
            if Some(space) == clicked {
                continue;
            }

            let piece = self.piece_at(space);
            if self.is_mine(space) {
                // a flagged mine keeps its flag, wrong marks are overwritten
                if piece.is_none_or(Piece::is_mark) {
                    self.set_piece(space, Some(mine_piece));
                }
            } else if piece == Some(Piece::Flag) {
                self.set_piece(space, Some(Piece::FlagNot));
            }
        }
    }

    /* Helpers */

    fn grid_index(&self, space: Space) -> [usize; 2] {
        [space.y as usize, space.x as usize]
    }

    fn set_piece(&mut self, space: Space, piece: Option<Piece>) {
        if !self.is_valid(space) {
            return;
        }
        let index = self.grid_index(space);
        self.pieces[index] = piece;
        self.pending_updates.insert(space);
    }

    fn is_replaceable(&self, space: Space) -> bool {
        self.is_valid(space) && self.piece_at(space).is_none_or(Piece::is_replaceable)
    }

    fn adjacent_mines(&self, space: Space) -> u8 {
        self.neighbors(space)
            .filter(|&neighbor| self.is_mine(neighbor))
            .count() as u8
    }

    /* Queries */

    /// Whether the space lies on this board at all.
    pub fn is_valid(&self, space: Space) -> bool {
        space.in_bounds(self.config.width, self.config.height)
    }

    /// The piece currently shown on a space, `None` for untouched or
    /// out-of-bounds spaces.
    pub fn piece_at(&self, space: Space) -> Option<Piece> {
        if !self.is_valid(space) {
            return None;
        }
        self.pieces[self.grid_index(space)]
    }

    pub fn is_mine(&self, space: Space) -> bool {
        if !self.is_valid(space) {
            return false;
        }
        self.mines[self.grid_index(space)]
    }

    /// Whether the space still renders raised; false only for revealed
    /// numbers and shown mines.
    pub fn is_enabled(&self, space: Space) -> bool {
        self.is_valid(space) && self.piece_at(space).is_none_or(Piece::is_enabled)
    }

    pub fn width(&self) -> Coord {
        self.config.width
    }

    pub fn height(&self) -> Coord {
        self.config.height
    }

    pub fn mine_count(&self) -> usize {
        self.config.mines
    }

    /// Mines not yet flagged. Goes negative when the player flags more
    /// spaces than there are mines.
    pub fn remaining_mines(&self) -> isize {
        self.config.mines as isize - self.flag_count as isize
    }

    pub fn can_cheat(&self) -> bool {
        self.cheats_remaining > 0
    }

    pub fn cheats_allowed(&self) -> u32 {
        self.config.cheats
    }

    pub fn cheats_remaining(&self) -> u32 {
        self.cheats_remaining
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn has_won(&self) -> bool {
        self.victory
    }

    /// Whether the minefield exists yet, i.e. some click already generated
    /// it (or the board was built around an explicit layout).
    pub fn is_started(&self) -> bool {
        self.first_click_done
    }

    /// The seed behind the current minefield, for saving and replaying.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Lazy row-major walk over every space of the board.
    pub fn all_spaces(&self) -> AllSpaces {
        AllSpaces::new(self.config.width, self.config.height)
    }

    /// The up-to-8 in-bounds neighbors of a space.
    pub fn neighbors(&self, space: Space) -> NeighborIter {
        NeighborIter::new(space, self.config.width, self.config.height)
    }

    /// Hands over the set of spaces whose piece changed since the last
    /// drain, leaving the pending set empty.
    pub fn drain_updates(&mut self) -> BTreeSet<Space> {
        mem::take(&mut self.pending_updates)
    }
}
