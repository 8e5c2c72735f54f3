//! Placement predicates.
//!
//! Pure checks over a board, an anchor index and a mask. None of them
//! mutate; the game runs them in a fixed order and rejects the action at the
//! first failure. All but [`is_in_bounds`] assume the mask already fits.

use crate::board::GameBoard;
use crate::core::PlayerId;
use crate::pieces::PieceMask;

/// The mask's bounding box, anchored at `origin`, lies on the board.
#[must_use]
pub fn is_in_bounds(board: &GameBoard, origin: usize, mask: PieceMask) -> bool {
    board.fits(origin, mask)
}

/// Every masked cell is unowned.
#[must_use]
pub fn is_on_free_space(board: &GameBoard, origin: usize, mask: PieceMask) -> bool {
    board
        .piece_indices(origin, mask)
        .into_iter()
        .all(|i| !board.cell(i).is_owned())
}

/// At least one masked cell belongs to someone other than `player`.
#[must_use]
pub fn is_on_opponent_space(board: &GameBoard, origin: usize, mask: PieceMask, player: PlayerId) -> bool {
    board
        .piece_indices(origin, mask)
        .into_iter()
        .any(|i| board.cell(i).is_opponent_of(player))
}

/// Some masked cell touches a cell owned by `player` orthogonally.
#[must_use]
pub fn is_adjacent_to_player(board: &GameBoard, origin: usize, mask: PieceMask, player: PlayerId) -> bool {
    board
        .piece_indices(origin, mask)
        .into_iter()
        .any(|i| touches(board, i, player))
}

/// Some opponent-owned masked cell touches a cell owned by `player`.
///
/// Masked cells that are unowned or already `player`'s do not count, so a
/// bite cannot reach an opponent through the biter's own territory.
#[must_use]
pub fn is_bite_adjacent_to_player(board: &GameBoard, origin: usize, mask: PieceMask, player: PlayerId) -> bool {
    board
        .piece_indices(origin, mask)
        .into_iter()
        .filter(|&i| board.cell(i).is_opponent_of(player))
        .any(|i| touches(board, i, player))
}

fn touches(board: &GameBoard, index: usize, player: PlayerId) -> bool {
    board
        .orthogonal_neighbors(index)
        .into_iter()
        .any(|n| board.cell(n).is_owned_by(player))
}
