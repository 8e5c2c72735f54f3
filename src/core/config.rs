//! Game configuration.
//!
//! A `GameConfig` is fixed for the lifetime of a game; `reset` rebuilds the
//! board from it. Every field has a default, so transports can deserialize a
//! partial option set:
//!
//! ```
//! use fungus_engine::core::{CaptureMode, GameConfig};
//!
//! let config: GameConfig = serde_json::from_str(r#"{"size": 12, "capture_mode": 2}"#).unwrap();
//! assert_eq!(config.size, 12);
//! assert_eq!(config.capture_mode, CaptureMode::AnywhereAllPlayers);
//! assert_eq!(config.starting_bites, 4);
//! ```

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::pieces::{PieceCatalog, PieceSpec, PIECE_MASK_LEN};

/// Default board edge length.
pub const DEFAULT_BOARD_SIZE: usize = 20;
/// Smallest accepted board edge length (one more than the largest piece).
pub const MIN_BOARD_SIZE: usize = PIECE_MASK_LEN + 1;
/// Largest accepted board edge length.
pub const MAX_BOARD_SIZE: usize = 128;

/// Bites granted for claiming a bonus-bite cell.
pub const BONUS_BITE_AWARD: u32 = 3;
/// Rerolls granted for claiming a bonus-reroll cell.
pub const BONUS_REROLL_AWARD: u32 = 1;

/// Which captures run after a piece is placed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CaptureMode {
    /// Only runs reachable from the just-placed cells, cascading.
    #[default]
    FromPiece,
    /// Full-board sweep for the acting player.
    AnywhereCurrentPlayer,
    /// Full-board sweep for every player, acting player last.
    AnywhereAllPlayers,
}

impl TryFrom<u8> for CaptureMode {
    type Error = ConfigError;

    fn try_from(selector: u8) -> Result<Self, Self::Error> {
        match selector {
            0 => Ok(Self::FromPiece),
            1 => Ok(Self::AnywhereCurrentPlayer),
            2 => Ok(Self::AnywhereAllPlayers),
            other => Err(ConfigError::InvalidCaptureMode(other)),
        }
    }
}

impl From<CaptureMode> for u8 {
    fn from(mode: CaptureMode) -> Self {
        match mode {
            CaptureMode::FromPiece => 0,
            CaptureMode::AnywhereCurrentPlayer => 1,
            CaptureMode::AnywhereAllPlayers => 2,
        }
    }
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board edge length; boards are `size x size`.
    pub size: usize,

    /// Shuffle the start-position layout instead of the fixed order.
    pub randomize_start_positions: bool,

    /// Bites each player starts with.
    pub starting_bites: u32,

    /// Rerolls each player starts with.
    pub starting_rerolls: u32,

    /// Flag the four corners as bonus-bite cells.
    pub bonus_bite_cells: bool,

    /// Number of randomly placed bonus-reroll cells.
    pub bonus_reroll_cells: usize,

    /// How often territory gains grant a bite. The threshold is
    /// `size * 2 / factor` cells; zero or negative disables the bonus.
    pub new_bites_freq_factor: f64,

    /// Capture behavior after placement.
    pub capture_mode: CaptureMode,

    /// Custom piece catalog. `None` uses the standard catalog.
    pub pieces: Option<Vec<PieceSpec>>,

    /// RNG seed. `None` draws one at creation.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_BOARD_SIZE,
            randomize_start_positions: false,
            starting_bites: 4,
            starting_rerolls: 3,
            bonus_bite_cells: true,
            bonus_reroll_cells: 3,
            new_bites_freq_factor: 1.0,
            capture_mode: CaptureMode::FromPiece,
            pieces: None,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Set the board size.
    #[must_use]
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Shuffle start positions.
    #[must_use]
    pub fn with_randomized_start(mut self, randomize: bool) -> Self {
        self.randomize_start_positions = randomize;
        self
    }

    /// Set starting bite and reroll balances.
    #[must_use]
    pub fn with_starting_resources(mut self, bites: u32, rerolls: u32) -> Self {
        self.starting_bites = bites;
        self.starting_rerolls = rerolls;
        self
    }

    /// Configure bonus cells.
    #[must_use]
    pub fn with_bonus_cells(mut self, bite_corners: bool, reroll_cells: usize) -> Self {
        self.bonus_bite_cells = bite_corners;
        self.bonus_reroll_cells = reroll_cells;
        self
    }

    /// Set the bonus-bite frequency factor.
    #[must_use]
    pub fn with_new_bites_freq_factor(mut self, factor: f64) -> Self {
        self.new_bites_freq_factor = factor;
        self
    }

    /// Set the capture mode.
    #[must_use]
    pub fn with_capture_mode(mut self, mode: CaptureMode) -> Self {
        self.capture_mode = mode;
        self
    }

    /// Use a custom piece catalog.
    #[must_use]
    pub fn with_pieces(mut self, pieces: Vec<PieceSpec>) -> Self {
        self.pieces = Some(pieces);
        self
    }

    /// Fix the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the board size bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.size) {
            return Err(ConfigError::SizeOutOfBounds {
                size: self.size,
                min: MIN_BOARD_SIZE,
                max: MAX_BOARD_SIZE,
            });
        }
        Ok(())
    }

    /// Number of net new cells that earn one bite, or `None` if disabled.
    #[must_use]
    pub fn bite_threshold(&self) -> Option<u32> {
        if self.new_bites_freq_factor <= 0.0 {
            return None;
        }
        let threshold = (self.size as f64 * 2.0 / self.new_bites_freq_factor) as u32;
        (threshold > 0).then_some(threshold)
    }

    /// Build the piece catalog this game draws from.
    pub fn piece_catalog(&self) -> Result<PieceCatalog, ConfigError> {
        match &self.pieces {
            None => Ok(PieceCatalog::standard()),
            Some(specs) => {
                let catalog = PieceCatalog::from_specs(specs);
                if catalog.is_empty() {
                    Err(ConfigError::EmptyPieceCatalog)
                } else {
                    Ok(catalog)
                }
            }
        }
    }
}
