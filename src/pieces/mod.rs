//! Placeable shapes.
//!
//! - [`mask`]: the 5x5 bitmask and its rotation algebra
//! - [`catalog`]: rotation families, weights and weighted draws

pub mod mask;
pub mod catalog;

pub use mask::{bite_cost_of, MaskOutOfBox, PieceMask, BITE_LARGE, BITE_SMALL, PIECE_MASK_LEN};
pub use catalog::{Piece, PieceCatalog, PieceSpec};
