//! The game aggregate.
//!
//! - [`state`]: `Game`, its actions and the turn/elimination state machine
//! - [`record`]: win/loss/draw tallies that survive resets
//! - [`snapshot`]: the payload handed to observers after each action

pub mod state;
pub mod record;
pub mod snapshot;

pub use record::WinLossDraw;
pub use snapshot::{GameSnapshot, PlayerSnapshot};
pub use state::Game;
