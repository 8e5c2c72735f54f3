//! Error types reported to engine callers.
//!
//! Configuration errors abort game creation; move errors abort a single
//! action and leave the game untouched; delivery errors detach one observer.
//! Broken internal invariants are not represented here: they panic.

use std::time::Duration;

use thiserror::Error;

/// Rejected game configuration. No game is registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("at least two active participants required (got {active})")]
    NotEnoughParticipants { active: usize },
    #[error("at most {max} active participants supported (got {active})")]
    TooManyParticipants { active: usize, max: usize },
    #[error("size out of bounds: {size} (allowed {min}..={max})")]
    SizeOutOfBounds { size: usize, min: usize, max: usize },
    #[error("invalid capture mode selector {0}")]
    InvalidCaptureMode(u8),
    #[error("custom piece catalog has no usable pieces")]
    EmptyPieceCatalog,
}

/// Rejected action. The board is left unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("game over")]
    GameOver,
    #[error("not a participant of this game")]
    NotAParticipant,
    #[error("not player's turn")]
    NotYourTurn,
    #[error("index {0} out of bounds")]
    IndexOutOfBounds(usize),
    #[error("shape does not fit on the board")]
    OutOfBounds,
    #[error("piece overlaps occupied space")]
    Occupied,
    #[error("piece not adjacent to player's territory")]
    NotAdjacent,
    #[error("unexpected game piece")]
    UnexpectedPiece,
    #[error("bite does not overlap an opponent's space")]
    NoOpponentSpace,
    #[error("bite not adjacent to player's territory")]
    BiteNotAdjacent,
    #[error("invalid bite mask")]
    InvalidBite,
    #[error("not enough bites remaining (need {needed}, have {available})")]
    InsufficientBites { needed: u32, available: u32 },
    #[error("no rerolls remaining")]
    NoRerolls,
}

/// A snapshot could not be handed to an observer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("delivery timed out after {0:?}")]
    TimedOut(Duration),
    #[error("observer closed: {0}")]
    Closed(String),
}
