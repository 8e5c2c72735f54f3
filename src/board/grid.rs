//! The game board.
//!
//! A `GameBoard` is a `height x width` grid stored row-major in a single
//! `Vec<Cell>`. Clients address cells by linear index `row * width + col`,
//! so the storage order is also the wire order.
//!
//! ## Example
//!
//! ```
//! use fungus_engine::board::GameBoard;
//! use fungus_engine::pieces::BITE_LARGE;
//!
//! let board = GameBoard::new(8, 4);
//! assert_eq!(board.index_1d(1, 0), 8);
//! assert_eq!(board.index_2d(9), (1, 1));
//! assert_eq!(board.piece_indices(2, BITE_LARGE).as_slice(), &[2, 3, 10, 11]);
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::cell::Cell;
use crate::core::config::{BONUS_BITE_AWARD, BONUS_REROLL_AWARD};
use crate::core::{PlayerId, PlayerMap};
use crate::pieces::PieceMask;

/// Linear indices covered by one placed mask. Most pieces have four cells
/// or fewer.
pub type PieceIndices = SmallVec<[usize; 8]>;

/// Resources earned by claiming bonus cells during one placement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BonusClaim {
    pub bites: u32,
    pub rerolls: u32,
}

impl BonusClaim {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bites == 0 && self.rerolls == 0
    }
}

/// Rectangular grid of cells.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameBoard {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl GameBoard {
    /// Empty board. Panics if either dimension is zero.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "board must be at least 1x1, got {width}x{height}");
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; width * height],
        }
    }

    /// Empty `size x size` board.
    #[must_use]
    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    /// Build a board from raw packed rows, top row first.
    ///
    /// Panics if the rows are empty or ragged.
    ///
    /// ```
    /// use fungus_engine::board::GameBoard;
    ///
    /// let board = GameBoard::from_rows(&[
    ///     [0x101, 0, 0],
    ///     [0, 2, 0],
    /// ]);
    /// assert_eq!((board.width(), board.height()), (3, 2));
    /// assert!(board.cell(0).is_home());
    /// assert_eq!(board.cell(4).owner_token(), 2);
    /// ```
    #[must_use]
    pub fn from_rows<R: AsRef<[u16]>>(rows: &[R]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let mut board = Self::new(width, height);

        for (r, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            assert_eq!(row.len(), width, "row {r} has {} cells, expected {width}", row.len());
            for (c, &bits) in row.iter().enumerate() {
                board.cells[r * width + c] = Cell::from_bits(bits);
            }
        }
        board
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell at a linear index. Panics if out of range.
    #[must_use]
    pub fn cell(&self, index: usize) -> Cell {
        self.cells[index]
    }

    /// Cell at `(row, col)`. Panics if out of range.
    #[must_use]
    pub fn cell_at(&self, row: usize, col: usize) -> Cell {
        self.cells[self.index_1d(row, col)]
    }

    pub fn set_cell(&mut self, index: usize, cell: Cell) {
        self.cells[index] = cell;
    }

    /// Change a cell's owner, keeping its flags.
    pub fn set_owner(&mut self, index: usize, owner: Option<PlayerId>) {
        self.cells[index] = self.cells[index].with_owner(owner);
    }

    #[must_use]
    pub fn contains_index(&self, index: usize) -> bool {
        index < self.cells.len()
    }

    /// Linear index of `(row, col)`.
    #[must_use]
    pub fn index_1d(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// `(row, col)` of a linear index.
    #[must_use]
    pub fn index_2d(&self, index: usize) -> (usize, usize) {
        (index / self.width, index % self.width)
    }

    /// Index reached by moving `(d_row, d_col)` from `index`, or `None` past
    /// an edge.
    #[must_use]
    pub fn step(&self, index: usize, d_row: isize, d_col: isize) -> Option<usize> {
        let (row, col) = self.index_2d(index);
        let row = row.checked_add_signed(d_row)?;
        let col = col.checked_add_signed(d_col)?;
        (row < self.height && col < self.width).then(|| self.index_1d(row, col))
    }

    /// In-bounds orthogonal neighbours (up, right, down, left).
    #[must_use]
    pub fn orthogonal_neighbors(&self, index: usize) -> SmallVec<[usize; 4]> {
        [(-1, 0), (0, 1), (1, 0), (0, -1)]
            .into_iter()
            .filter_map(|(dr, dc)| self.step(index, dr, dc))
            .collect()
    }

    /// Whether the mask's bounding box, anchored at `origin`, fits on the
    /// board. `origin` itself must be a valid index.
    #[must_use]
    pub fn fits(&self, origin: usize, mask: PieceMask) -> bool {
        if !self.contains_index(origin) {
            return false;
        }
        let (row, col) = self.index_2d(origin);
        let (rows, cols) = mask.size();
        row + rows <= self.height && col + cols <= self.width
    }

    /// Linear index of every occupied mask cell anchored at `origin`, in
    /// row-major mask order. Callers check [`fits`](Self::fits) first.
    #[must_use]
    pub fn piece_indices(&self, origin: usize, mask: PieceMask) -> PieceIndices {
        let (row, col) = self.index_2d(origin);
        mask.cells()
            .map(|(r, c)| self.index_1d(row + r, col + c))
            .collect()
    }

    /// Write `owner` into every masked cell, keeping flags. `None` clears
    /// ownership.
    ///
    /// A claiming owner collects any bonus flags under the mask; the flags are
    /// removed and the award is returned for the caller to credit.
    pub fn place_mask(&mut self, owner: Option<PlayerId>, origin: usize, mask: PieceMask) -> BonusClaim {
        let mut claim = BonusClaim::default();

        for index in self.piece_indices(origin, mask) {
            let mut cell = self.cells[index].with_owner(owner);

            if owner.is_some() {
                if cell.has_flag(Cell::BONUS_BITE) {
                    cell = cell.without_flag(Cell::BONUS_BITE);
                    claim.bites += BONUS_BITE_AWARD;
                }
                if cell.has_flag(Cell::BONUS_REROLL) {
                    cell = cell.without_flag(Cell::BONUS_REROLL);
                    claim.rerolls += BONUS_REROLL_AWARD;
                }
            }

            self.cells[index] = cell;
        }

        claim
    }

    /// Cells owned by each of the first `player_count` players.
    ///
    /// Panics if a cell carries an owner token outside the roster.
    #[must_use]
    pub fn owner_counts(&self, player_count: usize) -> PlayerMap<u32> {
        let mut counts = PlayerMap::with_value(player_count, 0u32);
        for owner in self.cells.iter().filter_map(|cell| cell.owner()) {
            counts[owner] += 1;
        }
        counts
    }

    /// Home cells owned by `player`.
    pub fn home_cells(&self, player: PlayerId) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, cell)| cell.is_home() && cell.is_owned_by(player))
            .map(|(i, _)| i)
    }

    /// Raw packed cells for the wire.
    #[must_use]
    pub fn to_bits(&self) -> Vec<u16> {
        self.cells.iter().map(|c| c.bits()).collect()
    }
}

impl std::fmt::Display for GameBoard {
    /// Debug grid: owner digit or `.`, then `H`, `B`, `R` markers, padded to
    /// three columns.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.chunks(self.width) {
            for cell in row {
                let mut text = String::with_capacity(4);
                match cell.owner_token() {
                    0 => text.push('.'),
                    token => text.push_str(&token.to_string()),
                }
                if cell.is_home() {
                    text.push('H');
                }
                if cell.has_flag(Cell::BONUS_BITE) {
                    text.push('B');
                }
                if cell.has_flag(Cell::BONUS_REROLL) {
                    text.push('R');
                }
                write!(f, "{text:<2} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
