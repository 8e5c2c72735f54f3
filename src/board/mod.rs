//! Board and cell model.
//!
//! - [`cell`]: packed owner token plus flags
//! - [`grid`]: the row-major grid and its indexing
//! - [`layout`]: home and bonus cell placement for a new game

pub mod cell;
pub mod grid;
pub mod layout;

pub use cell::Cell;
pub use grid::{BonusClaim, GameBoard, PieceIndices};
pub use layout::{build_board, start_positions};
