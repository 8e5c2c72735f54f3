//! Observer payload.
//!
//! A `GameSnapshot` is a self-contained copy of everything observers see
//! after an action. It is taken while the game is locked and handed to the
//! transport afterwards, so delivery never holds the lock. The field
//! encoding on the wire is the transport's business; the snapshot only
//! promises to be `serde`-serializable.

use serde::{Deserialize, Serialize};

use super::record::WinLossDraw;
use super::state::Game;
use crate::pieces::PieceMask;

/// Per-player counters in slot order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub name: String,
    pub score: u32,
    pub bites: u32,
    pub rerolls: u32,
    pub bite_progress: u32,
    pub record: WinLossDraw,
}

/// Complete observable state of one game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub width: usize,
    pub height: usize,
    /// Packed cells, row-major.
    pub board: Vec<u16>,
    /// Cells flipped or released by the most recent action, in order.
    pub last_changed: Vec<usize>,
    /// Slot index of the player to move; -1 once the game is over.
    pub turn: i32,
    /// Orientations of the offered piece; empty once the game is over.
    pub offered_piece: Vec<PieceMask>,
    pub players: Vec<PlayerSnapshot>,
    pub is_over: bool,
}

impl GameSnapshot {
    /// Copy the observable state out of `game`.
    #[must_use]
    pub fn capture(game: &Game) -> Self {
        let board = game.board();

        let players = game
            .participants()
            .iter()
            .map(|(player, participant)| PlayerSnapshot {
                name: participant.name.clone(),
                score: game.scores()[player],
                bites: game.bites()[player],
                rerolls: game.rerolls()[player],
                bite_progress: game.bite_progress()[player],
                record: game.records()[player],
            })
            .collect();

        Self {
            width: board.width(),
            height: board.height(),
            board: board.to_bits(),
            last_changed: game.last_changed().to_vec(),
            turn: game.turn_index(),
            offered_piece: game.offered_piece().map_or_else(Vec::new, |p| p.masks.to_vec()),
            players,
            is_over: game.is_over(),
        }
    }

    /// Scores in slot order.
    pub fn scores(&self) -> impl Iterator<Item = u32> + '_ {
        self.players.iter().map(|p| p.score)
    }
}
