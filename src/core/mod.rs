//! Core engine types: players, RNG, configuration and errors.
//!
//! These are the building blocks shared by the board, rules and game
//! modules. None of them hold game state on their own.

pub mod player;
pub mod rng;
pub mod config;
pub mod error;

pub use player::{Participant, ParticipantId, PlayerId, PlayerMap, MAX_PLAYERS};
pub use rng::GameRng;
pub use config::{
    CaptureMode, GameConfig, BONUS_BITE_AWARD, BONUS_REROLL_AWARD, DEFAULT_BOARD_SIZE,
    MAX_BOARD_SIZE, MIN_BOARD_SIZE,
};
pub use error::{ConfigError, DeliveryError, MoveError};
