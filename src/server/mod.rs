//! Concurrent hosting of games.
//!
//! - [`shared`]: one game behind a mutex, with its observers
//! - [`broadcast`]: bounded, time-limited snapshot fan-out
//! - [`registry`]: id → game map and age-based eviction
//!
//! The transport (sockets, sessions, lobbies) lives outside this crate and
//! plugs in through the [`Observer`] trait.

pub mod broadcast;
pub mod shared;
pub mod registry;

pub use broadcast::{deliver_all, BroadcastConfig, BroadcastReport, ChannelObserver, Observer, ObserverId};
pub use shared::SharedGame;
pub use registry::{GameId, GameRegistry, RegistryConfig};
