//! # fungus-engine
//!
//! Authoritative game-state engine for a 2-4 player territory-capture board
//! game. Players grow territory from a home cell by placing polyomino-like
//! pieces, capture opponent cells by enclosing straight runs, spend bites to
//! clear opponent cells, and are eliminated when they hold no cells.
//!
//! ## Design Principles
//!
//! 1. **Validate, then mutate**: every action checks all of its rules
//!    before touching the board. A rejected action changes nothing.
//!
//! 2. **N-Player First**: per-player state lives in `PlayerMap`, indexed by
//!    `PlayerId`. Nothing assumes two players.
//!
//! 3. **Deterministic when seeded**: board layout and piece draws come from
//!    one seeded `GameRng`, so a seed plus an action log replays a game.
//!
//! ## Modules
//!
//! - `core`: players, RNG, configuration and errors
//! - `pieces`: 5x5 shape masks, rotations and the weighted catalog
//! - `board`: packed cells, the grid and the starting layout
//! - `rules`: placement predicates, captures and orphan release
//! - `game`: the `Game` aggregate, records and observer snapshots
//! - `server`: locked game handles, observer fan-out and the registry
//!
//! ## Example
//!
//! ```
//! use fungus_engine::{Game, GameConfig, Participant, ParticipantId};
//!
//! let roster = vec![
//!     Participant::new(ParticipantId(1), "alice"),
//!     Participant::new(ParticipantId(2), "bob"),
//! ];
//! let game = Game::new(roster, GameConfig::default().with_seed(42)).unwrap();
//!
//! assert_eq!(game.board().width(), 20);
//! assert_eq!(game.scores().values().sum::<u32>(), 2);
//! assert!(game.offered_piece().is_some());
//! ```

pub mod core;
pub mod pieces;
pub mod board;
pub mod rules;
pub mod game;
pub mod server;

// Re-export commonly used types
pub use crate::core::{
    CaptureMode, ConfigError, DeliveryError, GameConfig, GameRng, MoveError,
    Participant, ParticipantId, PlayerId, PlayerMap, MAX_PLAYERS,
};

pub use crate::pieces::{Piece, PieceCatalog, PieceMask, PieceSpec, BITE_LARGE, BITE_SMALL};

pub use crate::board::{Cell, GameBoard};

pub use crate::game::{Game, GameSnapshot, PlayerSnapshot, WinLossDraw};

pub use crate::server::{
    BroadcastConfig, BroadcastReport, ChannelObserver, GameId, GameRegistry,
    Observer, ObserverId, RegistryConfig, SharedGame,
};
