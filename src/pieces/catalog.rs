//! Piece catalog and weighted draws.
//!
//! A `Piece` is a rotation family plus a draw weight. The `PieceCatalog`
//! holds every piece a game can offer and picks the next one with
//! probability proportional to its weight.
//!
//! ## Example
//!
//! ```
//! use fungus_engine::core::GameRng;
//! use fungus_engine::pieces::{PieceCatalog, PieceMask};
//!
//! let catalog = PieceCatalog::standard();
//! let mut rng = GameRng::new(3);
//!
//! let piece = catalog.draw(&mut rng).unwrap();
//! for mask in piece.masks {
//!     assert!(piece.has(mask));
//!     assert_eq!(mask.shift_up(), mask);
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::mask::PieceMask;
use crate::core::GameRng;

/// Built-in shapes written flush to the bottom-right of the box, with
/// their draw weights. `Piece::new` canonicalizes them.
const STANDARD_PIECES: [(u32, f64); 20] = [
    (0b10000, 100.0),
    (0b10000_10000, 40.0),
    (0b10000_10000_10000, 100.0),
    (0b10000_10000_10000_10000, 12.0),
    (0b11000_11000, 100.0),
    (0b10000_11000, 100.0),
    (0b11100_01000_00000, 20.0),
    (0b11000_01100_00000, 12.0),
    (0b01100_11000_00000, 12.0),
    (0b10000_10000_11000, 8.0),
    (0b11100_00100_00000, 8.0),
    (0b11100_11000_00000, 4.0),
    (0b11100_10100_00000, 4.0),
    (0b01100_11100_00000, 4.0),
    (0b10000_00000_10000, 4.0),
    (0b10000_01000_10000, 1.0),
    (0b10100_01000_10100, 1.0),
    (0b10000_01000_00000, 5.0),
    (0b10000_01000_00100, 3.0),
    (0b10000_01000_00100_00010, 2.0),
];

/// A custom catalog entry as supplied in configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PieceSpec {
    /// Raw 25-bit mask, any orientation or offset.
    pub mask: u32,
    /// Relative draw weight.
    pub weight: f64,
}

/// A shape in all four orientations.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    /// Canonical mask followed by its 90, 180 and 270 degree rotations.
    pub masks: [PieceMask; 4],
    /// Relative draw weight. Always positive.
    pub weight: f64,
}

impl Piece {
    /// Build a piece from any orientation of its shape.
    ///
    /// Panics if `weight` is not positive or `mask` is empty.
    #[must_use]
    pub fn new(mask: PieceMask, weight: f64) -> Self {
        assert!(weight > 0.0, "piece weight must be positive, got {weight}");
        assert!(!mask.is_empty(), "piece mask must not be empty");
        Self {
            masks: mask.rotations(),
            weight,
        }
    }

    /// Whether `mask` is one of this piece's orientations.
    #[must_use]
    pub fn has(&self, mask: PieceMask) -> bool {
        self.masks.contains(&mask)
    }

    /// Canonical orientation.
    #[must_use]
    pub fn canonical(&self) -> PieceMask {
        self.masks[0]
    }

    /// Whether two pieces describe the same rotation family.
    #[must_use]
    pub fn same_shape(&self, other: &Piece) -> bool {
        self.has(other.canonical())
    }
}

/// Every piece a game may offer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PieceCatalog {
    pieces: Vec<Piece>,
}

impl PieceCatalog {
    /// The built-in catalog.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            pieces: STANDARD_PIECES
                .iter()
                .map(|&(bits, weight)| Piece::new(PieceMask::from_bits_truncate(bits), weight))
                .collect(),
        }
    }

    /// Build a catalog from configuration, dropping unusable entries.
    ///
    /// Entries with a non-positive weight, an empty mask, or bits outside the
    /// 5x5 box are skipped. The result may be empty.
    #[must_use]
    pub fn from_specs(specs: &[PieceSpec]) -> Self {
        let pieces = specs
            .iter()
            .filter_map(|spec| {
                let mask = match PieceMask::from_bits(spec.mask) {
                    Some(mask) if !mask.is_empty() => mask,
                    _ => {
                        tracing::debug!(mask = spec.mask, "dropping custom piece with unusable mask");
                        return None;
                    }
                };
                // NaN fails this comparison too
                if spec.weight > 0.0 {
                    Some(Piece::new(mask, spec.weight))
                } else {
                    tracing::debug!(
                        mask = spec.mask,
                        weight = spec.weight,
                        "dropping custom piece with non-positive weight"
                    );
                    None
                }
            })
            .collect();

        Self { pieces }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Iterate over all pieces.
    pub fn iter(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter()
    }

    /// Weighted draw over the whole catalog. `None` only if empty.
    pub fn draw(&self, rng: &mut GameRng) -> Option<Piece> {
        Self::draw_from(self.pieces.iter(), rng)
    }

    /// Weighted draw over every piece except `current`'s shape.
    ///
    /// Returns `None` when `current` is the only shape in the catalog.
    pub fn draw_excluding(&self, current: &Piece, rng: &mut GameRng) -> Option<Piece> {
        Self::draw_from(self.pieces.iter().filter(|p| !p.same_shape(current)), rng)
    }

    fn draw_from<'a>(pieces: impl Iterator<Item = &'a Piece>, rng: &mut GameRng) -> Option<Piece> {
        let candidates: Vec<&Piece> = pieces.collect();
        let weights: Vec<f64> = candidates.iter().map(|p| p.weight).collect();
        rng.choose_weighted(&weights).map(|i| *candidates[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::BITE_LARGE;

    #[test]
    fn test_standard_catalog() {
        let catalog = PieceCatalog::standard();
        assert_eq!(catalog.len(), 20);

        for piece in catalog.iter() {
            assert!(piece.weight > 0.0);
            for mask in piece.masks {
                assert_eq!(mask.shift_up(), mask);
                assert_eq!(mask.rotate90().rotate90().rotate90().rotate90(), mask);
            }
            let [m0, m1, m2, m3] = piece.masks;
            assert_eq!(m0.rotate90(), m1);
            assert_eq!(m1.rotate90(), m2);
            assert_eq!(m2.rotate90(), m3);
        }
    }

    #[test]
    fn test_square_piece_rotations_collapse() {
        let catalog = PieceCatalog::standard();
        let square = catalog.iter().find(|p| p.canonical() == BITE_LARGE).unwrap();
        assert!(square.masks.iter().all(|&m| m == BITE_LARGE));
    }

    #[test]
    fn test_from_specs_filters() {
        let specs = [
            PieceSpec { mask: 0b11000_11000, weight: 2.0 },
            PieceSpec { mask: 0, weight: 1.0 },
            PieceSpec { mask: 1 << 25, weight: 1.0 },
            PieceSpec { mask: 0b10000, weight: 0.0 },
            PieceSpec { mask: 0b10000, weight: -3.0 },
            PieceSpec { mask: 0b10000, weight: f64::NAN },
        ];
        let catalog = PieceCatalog::from_specs(&specs);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.iter().next().unwrap().canonical(), BITE_LARGE);

        assert!(PieceCatalog::from_specs(&[]).is_empty());
    }

    #[test]
    fn test_draw_excluding() {
        let catalog = PieceCatalog::from_specs(&[
            PieceSpec { mask: 0b10000, weight: 1.0 },
            PieceSpec { mask: 0b11000_11000, weight: 1.0 },
        ]);
        let mut rng = GameRng::new(11);

        let current = catalog.draw(&mut rng).unwrap();
        for _ in 0..20 {
            let next = catalog.draw_excluding(&current, &mut rng).unwrap();
            assert!(!next.same_shape(&current));
        }

        let single = PieceCatalog::from_specs(&[PieceSpec { mask: 0b10000, weight: 1.0 }]);
        let only = single.draw(&mut rng).unwrap();
        assert!(single.draw_excluding(&only, &mut rng).is_none());
    }

    #[test]
    fn test_draw_deterministic() {
        let catalog = PieceCatalog::standard();
        let mut a = GameRng::new(99);
        let mut b = GameRng::new(99);
        for _ in 0..50 {
            assert_eq!(catalog.draw(&mut a), catalog.draw(&mut b));
        }
    }

    #[test]
    fn test_rotated_custom_piece_matches() {
        let vertical = PieceCatalog::from_specs(&[PieceSpec { mask: 0b10000_10000_10000, weight: 1.0 }]);
        let piece = *vertical.iter().next().unwrap();
        let horizontal = PieceMask::from_bits(0b11100 << 20).unwrap();
        assert!(piece.has(horizontal));
    }
}
