//! A game behind a lock, with its observers.
//!
//! `SharedGame` is the handle the session layer holds. Every action runs
//! under the game's mutex and the resulting snapshot is taken before the
//! lock is released, so concurrent actions on one game are serialized and
//! each snapshot reflects exactly one action. Broadcasting happens later,
//! without the lock.
//!
//! ## Example
//!
//! ```
//! use fungus_engine::core::{GameConfig, Participant, ParticipantId};
//! use fungus_engine::game::Game;
//! use fungus_engine::server::SharedGame;
//!
//! let roster = vec![
//!     Participant::new(ParticipantId(1), "alice"),
//!     Participant::new(ParticipantId(2), "bob"),
//! ];
//! let game = SharedGame::new(Game::new(roster, GameConfig::default().with_seed(1)).unwrap());
//!
//! let snapshot = game.skip_turn(ParticipantId(1)).unwrap();
//! assert_eq!(snapshot.turn, 1);
//! assert!(game.skip_turn(ParticipantId(1)).is_err());
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};
use rustc_hash::FxHashMap;

use super::broadcast::{deliver_all, BroadcastConfig, BroadcastReport, Observer, ObserverId};
use crate::core::{MoveError, ParticipantId};
use crate::game::{Game, GameSnapshot};
use crate::pieces::PieceMask;

struct Inner {
    game: Mutex<Game>,
    observers: Mutex<FxHashMap<ObserverId, Arc<dyn Observer>>>,
    next_observer: AtomicU64,
    broadcast: BroadcastConfig,
}

/// Cloneable handle to one game and its observers.
#[derive(Clone)]
pub struct SharedGame {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SharedGame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedGame")
            .field("observers", &self.observer_count())
            .field("broadcast", &self.inner.broadcast)
            .finish_non_exhaustive()
    }
}

impl SharedGame {
    /// Wrap a game with the default broadcast limits.
    pub fn new(game: Game) -> Self {
        Self::with_broadcast(game, BroadcastConfig::default())
    }

    pub fn with_broadcast(game: Game, broadcast: BroadcastConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                game: Mutex::new(game),
                observers: Mutex::new(FxHashMap::default()),
                next_observer: AtomicU64::new(1),
                broadcast,
            }),
        }
    }

    /// Lock the game for direct inspection. Do not hold the guard across an
    /// `.await`.
    pub fn lock(&self) -> MutexGuard<'_, Game> {
        self.inner.game.lock()
    }

    /// Run an action under the lock and snapshot the result.
    ///
    /// A rejected action leaves the game unchanged and produces no snapshot.
    pub fn apply<F>(&self, action: F) -> Result<GameSnapshot, MoveError>
    where
        F: FnOnce(&mut Game) -> Result<(), MoveError>,
    {
        let mut game = self.inner.game.lock();
        match action(&mut *game) {
            Ok(()) => Ok(game.snapshot()),
            Err(err) => {
                tracing::debug!(error = %err, "action rejected");
                Err(err)
            }
        }
    }

    // === Actions ===

    pub fn place_piece(&self, actor: ParticipantId, origin: usize, mask: PieceMask) -> Result<GameSnapshot, MoveError> {
        self.apply(|game| game.place_piece(actor, origin, mask))
    }

    pub fn place_bite(&self, actor: ParticipantId, origin: usize, mask: PieceMask) -> Result<GameSnapshot, MoveError> {
        self.apply(|game| game.place_bite(actor, origin, mask))
    }

    pub fn skip_turn(&self, actor: ParticipantId) -> Result<GameSnapshot, MoveError> {
        self.apply(|game| game.skip_turn(actor))
    }

    pub fn reroll(&self, actor: ParticipantId) -> Result<GameSnapshot, MoveError> {
        self.apply(|game| game.reroll(actor))
    }

    pub fn forfeit(&self, actor: ParticipantId) -> Result<GameSnapshot, MoveError> {
        self.apply(|game| game.forfeit(actor))
    }

    /// Start a new round. Never fails.
    pub fn reset(&self) -> GameSnapshot {
        let mut game = self.inner.game.lock();
        game.reset();
        game.snapshot()
    }

    /// Snapshot without acting, e.g. for a newly attached observer.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        self.inner.game.lock().snapshot()
    }

    /// Time since the game was created or last reset.
    #[must_use]
    pub fn age(&self) -> Duration {
        self.inner.game.lock().age()
    }

    // === Observers ===

    /// Attach an observer. It receives every broadcast from now on.
    pub fn attach(&self, observer: Arc<dyn Observer>) -> ObserverId {
        let id = self.inner.next_observer.fetch_add(1, Ordering::Relaxed);
        self.inner.observers.lock().insert(id, observer);
        id
    }

    /// Detach and close an observer. Returns whether it was attached.
    pub fn detach(&self, id: ObserverId) -> bool {
        let removed = self.inner.observers.lock().remove(&id);
        match removed {
            Some(observer) => {
                observer.close();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.inner.observers.lock().len()
    }

    /// Send `snapshot` to every attached observer and detach the ones that
    /// failed.
    pub async fn broadcast(&self, snapshot: GameSnapshot) -> BroadcastReport {
        let observers: Vec<(ObserverId, Arc<dyn Observer>)> = self
            .inner
            .observers
            .lock()
            .iter()
            .map(|(id, observer)| (*id, Arc::clone(observer)))
            .collect();

        let report = deliver_all(observers, Arc::new(snapshot), &self.inner.broadcast).await;

        for (id, err) in &report.failed {
            tracing::warn!(observer = id, error = %err, "detaching observer");
            self.detach(*id);
        }
        report
    }
}
