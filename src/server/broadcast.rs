//! Snapshot fan-out to observers.
//!
//! Delivery runs after the game lock is released. Each observer gets its
//! own task, at most `max_concurrent` run at once, and each delivery is cut
//! off after `delivery_timeout`. A slow or broken observer only costs its
//! own slot: it is reported as failed and the caller detaches it. There are
//! no retries.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

use crate::core::DeliveryError;
use crate::game::GameSnapshot;

/// Handle for an attached observer, unique within one game.
pub type ObserverId = u64;

/// A connection that receives snapshots.
pub trait Observer: Send + Sync + 'static {
    /// Hand one snapshot to the connection.
    fn deliver(&self, snapshot: Arc<GameSnapshot>) -> BoxFuture<'static, Result<(), DeliveryError>>;

    /// Tear the connection down after it has been detached.
    fn close(&self) {}
}

/// Observer backed by a bounded channel. Delivery waits for capacity, so a
/// reader that stops draining runs into the delivery timeout.
#[derive(Clone, Debug)]
pub struct ChannelObserver {
    sender: mpsc::Sender<Arc<GameSnapshot>>,
}

impl ChannelObserver {
    /// Observer plus the receiving end for the connection's writer task.
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Arc<GameSnapshot>>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }
}

impl Observer for ChannelObserver {
    fn deliver(&self, snapshot: Arc<GameSnapshot>) -> BoxFuture<'static, Result<(), DeliveryError>> {
        let sender = self.sender.clone();
        async move {
            sender
                .send(snapshot)
                .await
                .map_err(|_| DeliveryError::Closed("receiver dropped".into()))
        }
        .boxed()
    }
}

/// Fan-out limits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadcastConfig {
    /// Per-observer delivery deadline.
    pub delivery_timeout: Duration,

    /// Deliveries in flight at once.
    pub max_concurrent: usize,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            delivery_timeout: Duration::from_secs(2),
            max_concurrent: 16,
        }
    }
}

impl BroadcastConfig {
    /// Set the per-observer deadline.
    #[must_use]
    pub fn with_delivery_timeout(mut self, timeout: Duration) -> Self {
        self.delivery_timeout = timeout;
        self
    }

    /// Set the concurrency limit. Zero is treated as one.
    #[must_use]
    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = max;
        self
    }
}

/// Outcome of one fan-out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Observers that accepted the snapshot.
    pub delivered: usize,
    /// Observers that timed out, failed or panicked, with the reason.
    pub failed: Vec<(ObserverId, DeliveryError)>,
}

impl BroadcastReport {
    /// Ids of failed observers.
    pub fn failed_ids(&self) -> impl Iterator<Item = ObserverId> + '_ {
        self.failed.iter().map(|(id, _)| *id)
    }
}

/// Deliver `snapshot` to every observer.
///
/// Must be called from within a tokio runtime. Returns once every delivery
/// has finished or timed out.
pub async fn deliver_all(
    observers: Vec<(ObserverId, Arc<dyn Observer>)>,
    snapshot: Arc<GameSnapshot>,
    config: &BroadcastConfig,
) -> BroadcastReport {
    let semaphore = Arc::new(Semaphore::new(config.max_concurrent.max(1)));
    let timeout = config.delivery_timeout;
    let mut tasks = JoinSet::new();

    for (id, observer) in observers {
        let semaphore = Arc::clone(&semaphore);
        let snapshot = Arc::clone(&snapshot);

        tasks.spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return (id, Err(DeliveryError::Closed("broadcast cancelled".into())));
            };

            let delivery = AssertUnwindSafe(observer.deliver(snapshot)).catch_unwind();
            let result = match tokio::time::timeout(timeout, delivery).await {
                Ok(Ok(result)) => result,
                Ok(Err(_panic)) => Err(DeliveryError::Closed("observer panicked".into())),
                Err(_elapsed) => Err(DeliveryError::TimedOut(timeout)),
            };
            (id, result)
        });
    }

    let mut report = BroadcastReport::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(()))) => report.delivered += 1,
            Ok((id, Err(err))) => report.failed.push((id, err)),
            Err(err) => tracing::warn!(error = %err, "delivery task did not finish"),
        }
    }

    report.failed.sort_by_key(|(id, _)| *id);
    report
}
