//! Line captures.
//!
//! A straight run of opponent cells bracketed on both ends by a player's
//! cells flips to that player. Runs may be horizontal, vertical or diagonal.
//! Flips change only the owner; cell flags stay put.
//!
//! Two resolution strategies exist:
//!
//! - [`capture_cells_from_piece`]: start from the cells just placed and
//!   follow every capture outward, letting newly flipped cells capture too.
//! - [`capture_cells`]: sweep the whole board, flipping the longest run
//!   first, until nothing is left to capture.

use std::collections::VecDeque;

use crate::board::GameBoard;
use crate::core::PlayerId;
use crate::pieces::PieceMask;

/// A step on the board. Positive rows go down, positive columns go right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Direction {
    row: isize,
    col: isize,
}

impl Direction {
    pub const RIGHT: Self = Self { row: 0, col: 1 };
    pub const DOWN_RIGHT: Self = Self { row: 1, col: 1 };
    pub const DOWN: Self = Self { row: 1, col: 0 };
    pub const DOWN_LEFT: Self = Self { row: 1, col: -1 };
    pub const LEFT: Self = Self { row: 0, col: -1 };
    pub const UP_LEFT: Self = Self { row: -1, col: -1 };
    pub const UP: Self = Self { row: -1, col: 0 };
    pub const UP_RIGHT: Self = Self { row: -1, col: 1 };

    /// Panics on the zero vector, which would never leave its cell.
    #[must_use]
    pub fn new(row: isize, col: isize) -> Self {
        assert!(row != 0 || col != 0, "direction must not be (0, 0)");
        Self { row, col }
    }

    #[must_use]
    pub fn row(self) -> isize {
        self.row
    }

    #[must_use]
    pub fn col(self) -> isize {
        self.col
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:+}, {:+})", self.row, self.col)
    }
}

/// Directions checked around each placed or flipped cell.
const PIECE_SCAN_ORDER: [Direction; 8] = [
    Direction::DOWN_LEFT,
    Direction::LEFT,
    Direction::UP_LEFT,
    Direction::UP,
    Direction::UP_RIGHT,
    Direction::RIGHT,
    Direction::DOWN_RIGHT,
    Direction::DOWN,
];

/// Directions checked by the full-board sweep. Each line is covered from
/// its top or left end, so the other four are redundant.
const SWEEP_SCAN_ORDER: [Direction; 4] = [
    Direction::RIGHT,
    Direction::DOWN,
    Direction::DOWN_RIGHT,
    Direction::DOWN_LEFT,
];

/// Look for a capturable run starting next to `index` in `direction`.
///
/// Returns `None` unless `index` is `player`'s. Otherwise walks while cells
/// belong to opponents: reaching an unowned cell or the edge yields `None`,
/// reaching another `player` cell yields the run walked over (possibly
/// empty).
#[must_use]
pub fn scan_for_capture(
    board: &GameBoard,
    player: PlayerId,
    index: usize,
    direction: Direction,
) -> Option<Vec<usize>> {
    assert!(
        direction.row != 0 || direction.col != 0,
        "scan direction must not be (0, 0)"
    );

    if !board.cell(index).is_owned_by(player) {
        return None;
    }

    let mut run = Vec::new();
    let mut current = index;
    loop {
        current = board.step(current, direction.row, direction.col)?;
        let cell = board.cell(current);
        if !cell.is_owned() {
            return None;
        }
        if cell.is_owned_by(player) {
            return Some(run);
        }
        run.push(current);
    }
}

fn flip(board: &mut GameBoard, player: PlayerId, run: &[usize]) {
    for &index in run {
        board.set_owner(index, Some(player));
    }
}

/// Resolve captures reachable from a freshly placed mask.
///
/// Works through a FIFO queue seeded with the placed cells. Every run found
/// is flipped immediately and its cells are queued in turn, so captures
/// cascade. Returns the flipped indices in flip order.
#[tracing::instrument(level = "trace", skip(board), ret)]
pub fn capture_cells_from_piece(
    board: &mut GameBoard,
    player: PlayerId,
    origin: usize,
    mask: PieceMask,
) -> Vec<usize> {
    let mut queue: VecDeque<usize> = board.piece_indices(origin, mask).into_iter().collect();
    let mut updates = Vec::new();

    while let Some(index) = queue.pop_front() {
        for direction in PIECE_SCAN_ORDER {
            if let Some(run) = scan_for_capture(board, player, index, direction) {
                flip(board, player, &run);
                queue.extend(run.iter().copied());
                updates.extend(run);
            }
        }
    }

    updates
}

/// Sweep the whole board for `player`'s captures.
///
/// Each pass scans every cell in row-major order and keeps the first run
/// that is strictly longer than any seen before it; that run is flipped and
/// the sweep repeats. Stops after a pass that finds nothing. Returns the
/// flipped indices in flip order.
#[tracing::instrument(level = "trace", skip(board), ret)]
pub fn capture_cells(board: &mut GameBoard, player: PlayerId) -> Vec<usize> {
    let mut updates = Vec::new();

    loop {
        let mut longest: Vec<usize> = Vec::new();

        for index in 0..board.len() {
            for direction in SWEEP_SCAN_ORDER {
                if let Some(run) = scan_for_capture(board, player, index, direction) {
                    if run.len() > longest.len() {
                        longest = run;
                    }
                }
            }
        }

        if longest.is_empty() {
            return updates;
        }

        flip(board, player, &longest);
        updates.extend(longest);
    }
}
