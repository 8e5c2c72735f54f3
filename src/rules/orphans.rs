//! Connectivity pruning.
//!
//! Territory survives only while it connects orthogonally, through cells of
//! the same owner, to one of that owner's home cells. Everything else is
//! released back to unowned.

use crate::board::GameBoard;

/// Release every owned cell with no same-owner path to a home cell.
///
/// Flags are kept. Returns the released indices in row-major order.
#[must_use = "released cells are reported to observers"]
pub fn handle_orphaned_cells(board: &mut GameBoard) -> Vec<usize> {
    let mut reached = vec![false; board.len()];
    let mut stack = Vec::new();

    for (index, cell) in board.cells().iter().enumerate() {
        if cell.is_owned() && cell.is_home() && !reached[index] {
            reached[index] = true;
            stack.push(index);
        }
    }

    while let Some(index) = stack.pop() {
        let owner = board.cell(index).owner_token();
        for neighbor in board.orthogonal_neighbors(index) {
            if !reached[neighbor] && board.cell(neighbor).owner_token() == owner {
                reached[neighbor] = true;
                stack.push(neighbor);
            }
        }
    }

    let released: Vec<usize> = (0..board.len())
        .filter(|&i| board.cell(i).is_owned() && !reached[i])
        .collect();

    for &index in &released {
        board.set_owner(index, None);
    }

    released
}
