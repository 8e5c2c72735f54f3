//! Initial board setup: home cells and bonus cells.

use super::cell::Cell;
use super::grid::GameBoard;
use crate::core::{GameConfig, GameRng, PlayerId};

/// Home cells sit `size / START_OFFSET_DIVISOR` cells in from the edges.
const START_OFFSET_DIVISOR: usize = 5;

/// Tries to find a flag-free cell for each bonus-reroll cell.
const REROLL_PLACEMENT_ATTEMPTS: usize = 5;

/// Candidate home cells as `(row, col)`: top-left, bottom-right, top-right,
/// bottom-left, top-middle, right-middle, bottom-middle, left-middle.
#[must_use]
pub fn start_positions(height: usize, width: usize) -> [(usize, usize); 8] {
    let max_r = height - 1;
    let max_c = width - 1;
    let off_r = height / START_OFFSET_DIVISOR;
    let off_c = width / START_OFFSET_DIVISOR;

    [
        (off_r, off_c),
        (max_r - off_r, max_c - off_c),
        (off_r, max_c - off_c),
        (max_r - off_r, off_c),
        (off_r, max_c / 2),
        (max_r / 2, max_c - off_c),
        (max_r - off_r, max_c / 2),
        (max_r / 2, off_c),
    ]
}

/// Mark one home cell per player, in layout order or shuffled.
pub fn place_home_cells(board: &mut GameBoard, player_count: usize, randomize: bool, rng: &mut GameRng) {
    let mut positions = start_positions(board.height(), board.width());
    assert!(
        player_count <= positions.len(),
        "{player_count} players but only {} start positions",
        positions.len()
    );

    if randomize {
        rng.shuffle(&mut positions);
    }

    for (player, &(row, col)) in PlayerId::all(player_count).zip(positions.iter()) {
        let index = board.index_1d(row, col);
        board.set_cell(index, Cell::owned_by(player).with_flag(Cell::HOME));
    }
}

/// Flag the four corners as bonus-bite cells.
pub fn place_bonus_bite_cells(board: &mut GameBoard) {
    let max_r = board.height() - 1;
    let max_c = board.width() - 1;
    for (row, col) in [(0, 0), (0, max_c), (max_r, 0), (max_r, max_c)] {
        let index = board.index_1d(row, col);
        board.set_cell(index, board.cell(index).with_flag(Cell::BONUS_BITE));
    }
}

/// Flag `count` random cells as bonus-reroll cells. Each cell gets a few
/// tries to land on a flag-free square; the last try is used regardless.
pub fn place_bonus_reroll_cells(board: &mut GameBoard, count: usize, rng: &mut GameRng) {
    for _ in 0..count {
        let mut index = 0;
        for _ in 0..REROLL_PLACEMENT_ATTEMPTS {
            index = rng.gen_range_usize(0..board.len());
            if board.cell(index).flags() == 0 {
                break;
            }
        }
        board.set_cell(index, board.cell(index).with_flag(Cell::BONUS_REROLL));
    }
}

/// Fresh `size x size` board for `player_count` players.
#[must_use]
pub fn build_board(config: &GameConfig, player_count: usize, rng: &mut GameRng) -> GameBoard {
    let mut board = GameBoard::square(config.size);

    place_home_cells(&mut board, player_count, config.randomize_start_positions, rng);
    if config.bonus_bite_cells {
        place_bonus_bite_cells(&mut board);
    }
    place_bonus_reroll_cells(&mut board, config.bonus_reroll_cells, rng);

    board
}
