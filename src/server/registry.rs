//! Registry of live games and age-based eviction.
//!
//! The registry lock only guards the id → handle map. Game construction,
//! age checks and broadcasting all happen outside it, so one busy game never
//! stalls lookups of another.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use super::broadcast::BroadcastConfig;
use super::shared::SharedGame;
use crate::core::{ConfigError, GameConfig, Participant};
use crate::game::Game;

/// Registry-issued game identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameId(pub u64);

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Game({})", self.0)
    }
}

/// Lifetime and fan-out settings shared by every registered game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Games older than this are evicted, whatever their state.
    pub max_age: Duration,
    /// How often the eviction task runs.
    pub eviction_interval: Duration,
    pub broadcast: BroadcastConfig,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_age: Duration::from_secs(24 * 60 * 60),
            eviction_interval: Duration::from_secs(60 * 60),
            broadcast: BroadcastConfig::default(),
        }
    }
}

impl RegistryConfig {
    #[must_use]
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    #[must_use]
    pub fn with_eviction_interval(mut self, interval: Duration) -> Self {
        self.eviction_interval = interval;
        self
    }

    #[must_use]
    pub fn with_broadcast(mut self, broadcast: BroadcastConfig) -> Self {
        self.broadcast = broadcast;
        self
    }
}

/// All live games of one server.
#[derive(Debug, Default)]
pub struct GameRegistry {
    config: RegistryConfig,
    games: Mutex<FxHashMap<GameId, SharedGame>>,
    next_id: AtomicU64,
}

impl GameRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            games: Mutex::new(FxHashMap::default()),
            next_id: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Build and register a game. Nothing is registered on error.
    pub fn create_game(
        &self,
        participants: Vec<Participant>,
        config: GameConfig,
    ) -> Result<(GameId, SharedGame), ConfigError> {
        let game = Game::new(participants, config)?;
        let player_count = game.player_count();
        let shared = SharedGame::with_broadcast(game, self.config.broadcast.clone());

        let id = GameId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.games.lock().insert(id, shared.clone());

        tracing::info!(game = %id, player_count, "game created");
        Ok((id, shared))
    }

    #[must_use]
    pub fn get(&self, id: GameId) -> Option<SharedGame> {
        self.games.lock().get(&id).cloned()
    }

    /// Unregister a game. Handles already given out stay usable.
    pub fn remove(&self, id: GameId) -> Option<SharedGame> {
        self.games.lock().remove(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.games.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.lock().is_empty()
    }

    /// Remove every game whose age has reached `max_age`. Returns the
    /// evicted ids in ascending order.
    pub fn evict_expired(&self, max_age: Duration) -> Vec<GameId> {
        let candidates: Vec<(GameId, SharedGame)> = self
            .games
            .lock()
            .iter()
            .map(|(id, game)| (*id, game.clone()))
            .collect();

        let mut expired: Vec<GameId> = candidates
            .into_iter()
            .filter(|(_, game)| game.age() >= max_age)
            .map(|(id, _)| id)
            .collect();
        expired.sort_unstable();

        if !expired.is_empty() {
            let mut games = self.games.lock();
            for id in &expired {
                games.remove(id);
            }
            drop(games);
            tracing::info!(count = expired.len(), "evicted expired games");
        }
        expired
    }

    /// Periodically evict games older than the configured `max_age`.
    ///
    /// The task holds only a weak reference and ends once the registry is
    /// dropped. Must be called from within a tokio runtime.
    pub fn spawn_eviction_task(self: &Arc<Self>) -> JoinHandle<()> {
        let registry: Weak<Self> = Arc::downgrade(self);
        let period = self.config.eviction_interval.max(Duration::from_millis(1));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // the first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(registry) = registry.upgrade() else {
                    tracing::debug!("registry dropped, eviction task exiting");
                    break;
                };
                registry.evict_expired(registry.config.max_age);
            }
        })
    }
}
