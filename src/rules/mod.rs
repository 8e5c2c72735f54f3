//! Move legality and board resolution.
//!
//! - [`validate`]: placement predicates, checked before any mutation
//! - [`capture`]: line captures after a placement
//! - [`orphans`]: releasing territory cut off from its home cells
//!
//! Everything here works on a bare [`GameBoard`](crate::board::GameBoard);
//! turn order, scores and resources live in [`game`](crate::game).

pub mod validate;
pub mod capture;
pub mod orphans;

pub use capture::{capture_cells, capture_cells_from_piece, scan_for_capture, Direction};
pub use orphans::handle_orphaned_cells;
pub use validate::{
    is_adjacent_to_player, is_bite_adjacent_to_player, is_in_bounds, is_on_free_space,
    is_on_opponent_space,
};
