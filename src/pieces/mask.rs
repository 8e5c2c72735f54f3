//! 5x5 occupancy bitmask for placeable shapes.
//!
//! ## Bit layout
//!
//! Cell `(row, col)` is bit `(4 - row) * 5 + (4 - col)`. The top-left cell is
//! the most significant of the 25 used bits, so a binary literal grouped in
//! fives reads like the shape itself:
//!
//! ```
//! use fungus_engine::pieces::PieceMask;
//!
//! let t = PieceMask::from_bits(0b11100_01000_00000_00000_00000).unwrap();
//! assert!(t.has(0, 0) && t.has(0, 2) && t.has(1, 1));
//! assert_eq!(t.size(), (2, 3));
//! assert_eq!(t.to_string(), "0b11100_01000_00000_00000_00000");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Edge length of the mask box.
pub const PIECE_MASK_LEN: usize = 5;

const ROW_BITS: u32 = (1 << PIECE_MASK_LEN) - 1;
const FIRST_ROW: u32 = ROW_BITS << (PIECE_MASK_LEN * (PIECE_MASK_LEN - 1));
const FIRST_COLUMN: u32 = 0b10000_10000_10000_10000_10000;
const FULL: u32 = (1 << (PIECE_MASK_LEN * PIECE_MASK_LEN)) - 1;

/// Mask with bits outside the 25-bit box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("mask {0:#x} has bits outside the 5x5 box")]
pub struct MaskOutOfBox(pub u32);

/// Occupied cells of a shape inside a 5x5 box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PieceMask(u32);

/// Single-cell bite.
pub const BITE_SMALL: PieceMask = PieceMask(0b10000 << (PIECE_MASK_LEN * (PIECE_MASK_LEN - 1)));
/// 2x2 bite.
pub const BITE_LARGE: PieceMask = PieceMask(0b11000_11000 << (PIECE_MASK_LEN * (PIECE_MASK_LEN - 2)));

const BITE_COSTS: [(PieceMask, u32); 2] = [
    (BITE_SMALL, BITE_SMALL.bite_cost()),
    (BITE_LARGE, BITE_LARGE.bite_cost()),
];

/// Cost of a predefined bite shape, or `None` if `mask` is not one.
#[must_use]
pub fn bite_cost_of(mask: PieceMask) -> Option<u32> {
    BITE_COSTS
        .iter()
        .find(|(bite, _)| *bite == mask)
        .map(|&(_, cost)| cost)
}

impl PieceMask {
    /// The empty mask.
    pub const EMPTY: Self = Self(0);

    /// Build a mask, rejecting bits outside the box.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Option<Self> {
        if bits & !FULL != 0 {
            None
        } else {
            Some(Self(bits))
        }
    }

    /// Build a mask, discarding bits outside the box.
    #[must_use]
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Self(bits & FULL)
    }

    /// Raw bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Mask with only `(row, col)` set.
    #[must_use]
    pub const fn at(row: usize, col: usize) -> Self {
        Self(1 << ((PIECE_MASK_LEN - 1 - row) * PIECE_MASK_LEN + (PIECE_MASK_LEN - 1 - col)))
    }

    /// Whether `(row, col)` is occupied. Cells outside the box never are.
    #[must_use]
    pub const fn has(self, row: usize, col: usize) -> bool {
        if row >= PIECE_MASK_LEN || col >= PIECE_MASK_LEN {
            return false;
        }
        self.0 & Self::at(row, col).0 != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of occupied cells.
    #[must_use]
    pub const fn cell_count(self) -> u32 {
        self.0.count_ones()
    }

    /// Cost of using this shape as a bite: `n - n / 4` for `n` cells.
    #[must_use]
    pub const fn bite_cost(self) -> u32 {
        let n = self.cell_count();
        n - n / 4
    }

    /// Rows and columns spanned from the top-left corner to the last
    /// occupied row and column.
    #[must_use]
    pub fn size(self) -> (usize, usize) {
        let mut rows = 0;
        let mut cols = 0;
        for i in 0..PIECE_MASK_LEN {
            if self.0 & (FIRST_ROW >> (PIECE_MASK_LEN * i)) != 0 {
                rows = i + 1;
            }
            if self.0 & (FIRST_COLUMN >> i) != 0 {
                cols = i + 1;
            }
        }
        (rows, cols)
    }

    /// Occupied `(row, col)` pairs in row-major order.
    pub fn cells(self) -> impl Iterator<Item = (usize, usize)> {
        (0..PIECE_MASK_LEN)
            .flat_map(|r| (0..PIECE_MASK_LEN).map(move |c| (r, c)))
            .filter(move |&(r, c)| self.has(r, c))
    }

    /// Move the shape flush to the top-left corner.
    #[must_use]
    pub fn shift_up(self) -> Self {
        let mut bits = self.0;

        for _ in 0..PIECE_MASK_LEN - 1 {
            if bits & FIRST_ROW != 0 {
                break;
            }
            bits <<= PIECE_MASK_LEN;
        }

        // column 0 is empty, so a one-bit shift never carries into the previous row
        for _ in 0..PIECE_MASK_LEN - 1 {
            if bits & FIRST_COLUMN != 0 {
                break;
            }
            bits <<= 1;
        }

        Self(bits & FULL)
    }

    /// Rotate 90 degrees clockwise, then shift to the top-left.
    #[must_use]
    pub fn rotate90(self) -> Self {
        let rotated = self
            .cells()
            .fold(0, |acc, (r, c)| acc | Self::at(c, PIECE_MASK_LEN - 1 - r).0);
        Self(rotated).shift_up()
    }

    /// The canonical mask followed by its 90, 180 and 270 degree rotations.
    #[must_use]
    pub fn rotations(self) -> [Self; 4] {
        let first = self.shift_up();
        let second = first.rotate90();
        let third = second.rotate90();
        let fourth = third.rotate90();
        [first, second, third, fourth]
    }

    /// Multi-line rendering for debug logs.
    #[must_use]
    pub fn to_string_2d(self) -> String {
        (0..PIECE_MASK_LEN)
            .map(|r| {
                (0..PIECE_MASK_LEN)
                    .map(|c| if self.has(r, c) { "1" } else { "0" })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl TryFrom<u32> for PieceMask {
    type Error = MaskOutOfBox;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        Self::from_bits(bits).ok_or(MaskOutOfBox(bits))
    }
}

impl From<PieceMask> for u32 {
    fn from(mask: PieceMask) -> Self {
        mask.0
    }
}

impl std::fmt::Display for PieceMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("0b")?;
        for r in 0..PIECE_MASK_LEN {
            if r > 0 {
                f.write_str("_")?;
            }
            for c in 0..PIECE_MASK_LEN {
                f.write_str(if self.has(r, c) { "1" } else { "0" })?;
            }
        }
        Ok(())
    }
}
