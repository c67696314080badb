//! Cache invalidation seam between the notifier and the data layer.
//!
//! The notifier never reads or writes cached data. It only tells the
//! data layer that a scope is stale; views watching that scope refetch.

use std::sync::Arc;

use tokio::sync::watch;

/// Which cached data became stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheScope {
    /// Fixture listings and everything derived from their odds.
    FixtureListings,
}

pub trait CacheInvalidator: Send + Sync {
    fn invalidate(&self, scope: CacheScope);
}

impl<T: CacheInvalidator + ?Sized> CacheInvalidator for Arc<T> {
    fn invalidate(&self, scope: CacheScope) {
        (**self).invalidate(scope)
    }
}

/// A generation counter for the fixture listing cache.
///
/// Every invalidation bumps the generation. Views hold an
/// [`InvalidationWatcher`] and refetch when it fires. Clones share the
/// same counter.
#[derive(Debug, Clone)]
pub struct InvalidationSignal {
    generation_tx: Arc<watch::Sender<u64>>,
}

/// Receives notifications when an [`InvalidationSignal`] is bumped.
#[derive(Debug, Clone)]
pub struct InvalidationWatcher {
    generation_rx: watch::Receiver<u64>,
}

impl Default for InvalidationSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl InvalidationSignal {
    pub fn new() -> Self {
        let (generation_tx, _) = watch::channel(0u64);
        Self {
            generation_tx: Arc::new(generation_tx),
        }
    }

    /// Number of invalidations so far.
    pub fn generation(&self) -> u64 {
        *self.generation_tx.borrow()
    }

    pub fn subscribe(&self) -> InvalidationWatcher {
        InvalidationWatcher {
            generation_rx: self.generation_tx.subscribe(),
        }
    }
}

impl CacheInvalidator for InvalidationSignal {
    fn invalidate(&self, scope: CacheScope) {
        match scope {
            CacheScope::FixtureListings => {
                // send_modify notifies even with no receivers
                self.generation_tx.send_modify(|generation| *generation += 1);
            }
        }
    }
}

impl InvalidationWatcher {
    /// Wait for the next invalidation and return the new generation.
    ///
    /// Returns `Err` once every [`InvalidationSignal`] clone is dropped.
    pub async fn changed(&mut self) -> Result<u64, watch::error::RecvError> {
        self.generation_rx.changed().await?;
        Ok(*self.generation_rx.borrow_and_update())
    }

    /// The generation this watcher last observed.
    pub fn seen(&self) -> u64 {
        *self.generation_rx.borrow()
    }
}
