//! Win/loss/draw bookkeeping across resets of one game.

use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, PlayerMap};

/// One player's results in this game instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WinLossDraw {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl WinLossDraw {
    /// Rounds finished, counting draws.
    #[must_use]
    pub fn played(&self) -> u32 {
        self.wins + self.losses + self.draws
    }
}

/// A win for `winner` and a loss for everyone else.
pub fn record_win(records: &mut PlayerMap<WinLossDraw>, winner: PlayerId) {
    for (player, record) in records.iter_mut() {
        if player == winner {
            record.wins += 1;
        } else {
            record.losses += 1;
        }
    }
}

/// A draw for every player, but only if each holds at least `min_score`
/// cells. Returns whether the draw was recorded.
pub fn record_draw(records: &mut PlayerMap<WinLossDraw>, scores: &PlayerMap<u32>, min_score: u32) -> bool {
    if scores.values().any(|&score| score < min_score) {
        return false;
    }
    for (_, record) in records.iter_mut() {
        record.draws += 1;
    }
    true
}
