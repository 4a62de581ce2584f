//! Discovery repository contract and in-process implementation.
//!
//! Persistence backends (browser storage, files, databases) live outside the
//! engine and implement [`DiscoveryRepository`]. The in-memory implementation
//! here is what UI surfaces share inside one process: clones are handles to
//! the same store, so every open view sees the same set and the same change
//! notifications.
//!
//! Listeners run outside the store lock, so writers on different threads may
//! deliver their changes in either order. Every change carries the store
//! revision it produced; views keep the change with the highest revision.

use crate::discovery::set::DiscoverySet;
use log::{debug, info};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Handle returned by [`DiscoveryRepository::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

/// Notification delivered after an id was newly discovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryChange {
    /// Newly discovered ids, ascending.
    pub added: Vec<String>,
    /// Full set after the write.
    pub set: DiscoverySet,
    /// Store revision produced by this write; strictly increasing per store.
    pub revision: u64,
}

/// Change listener; invoked outside of any repository lock.
pub type DiscoveryListener = Arc<dyn Fn(&DiscoveryChange) + Send + Sync>;

/// Repository interface for the per-viewer discovery record.
pub trait DiscoveryRepository {
    /// Returns a snapshot of the current set.
    fn get(&self) -> DiscoverySet;
    /// Records `id` as discovered; returns `true` when it was new.
    fn add(&self, id: &str) -> bool;
    /// Unions `other` into the store; returns the number of new ids.
    fn merge(&self, other: &DiscoverySet) -> usize;
    /// Registers a change listener.
    fn subscribe(&self, listener: DiscoveryListener) -> SubscriptionId;
    /// Removes a listener; returns `false` when the id was unknown.
    fn unsubscribe(&self, subscription: SubscriptionId) -> bool;
}

#[derive(Default)]
struct StoreState {
    set: DiscoverySet,
    revision: u64,
}

#[derive(Default)]
struct SharedState {
    store: RwLock<StoreState>,
    listeners: Mutex<BTreeMap<SubscriptionId, DiscoveryListener>>,
    next_subscription: AtomicU64,
}

/// Shared in-memory discovery store.
#[derive(Clone, Default)]
pub struct InMemoryDiscoveryRepository {
    shared: Arc<SharedState>,
}

impl InMemoryDiscoveryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with an existing set.
    pub fn with_set(set: DiscoverySet) -> Self {
        let repo = Self::new();
        repo.shared
            .store
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set = set;
        repo
    }

    /// Creates a store from a persisted payload; corrupt payloads start empty.
    pub fn from_payload(payload: &str) -> Self {
        let set = DiscoverySet::from_payload(payload);
        info!(
            "event=discovery_load module=discovery status=ok count={}",
            set.len()
        );
        Self::with_set(set)
    }

    /// Revision of the last write that added ids; `0` for an untouched store.
    pub fn revision(&self) -> u64 {
        self.shared
            .store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .revision
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.shared
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn apply(&self, incoming: &DiscoverySet) -> Option<DiscoveryChange> {
        let change = {
            let mut store = self
                .shared
                .store
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let added = incoming
                .iter()
                .filter(|id| !store.set.contains(id))
                .map(str::to_string)
                .collect::<Vec<_>>();
            if added.is_empty() {
                return None;
            }
            store.set.merge(incoming);
            store.revision += 1;
            DiscoveryChange {
                added,
                set: store.set.clone(),
                revision: store.revision,
            }
        };

        self.notify(&change);
        Some(change)
    }

    fn notify(&self, change: &DiscoveryChange) {
        let listeners = self
            .shared
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect::<Vec<_>>();
        debug!(
            "event=discovery_notify module=discovery status=ok revision={} added={} listeners={}",
            change.revision,
            change.added.len(),
            listeners.len()
        );
        for listener in listeners {
            listener(change);
        }
    }
}

impl DiscoveryRepository for InMemoryDiscoveryRepository {
    fn get(&self) -> DiscoverySet {
        self.shared
            .store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .set
            .clone()
    }

    fn add(&self, id: &str) -> bool {
        let mut incoming = DiscoverySet::new();
        if !incoming.insert(id) {
            return false;
        }
        self.apply(&incoming).is_some()
    }

    fn merge(&self, other: &DiscoverySet) -> usize {
        self.apply(other).map_or(0, |change| change.added.len())
    }

    fn subscribe(&self, listener: DiscoveryListener) -> SubscriptionId {
        let id = SubscriptionId(
            self.shared
                .next_subscription
                .fetch_add(1, Ordering::Relaxed),
        );
        self.shared
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, listener);
        id
    }

    fn unsubscribe(&self, subscription: SubscriptionId) -> bool {
        self.shared
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&subscription)
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{DiscoveryChange, DiscoveryRepository, InMemoryDiscoveryRepository};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn add_ignores_blank_and_repeated_ids() {
        let repo = InMemoryDiscoveryRepository::new();
        assert!(repo.add("a"));
        assert!(!repo.add("a"));
        assert!(!repo.add("  "));
        assert_eq!(repo.get().len(), 1);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let repo = InMemoryDiscoveryRepository::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let subscription = repo.subscribe(Arc::new(move |_: &DiscoveryChange| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        repo.add("a");
        assert!(repo.unsubscribe(subscription));
        assert!(!repo.unsubscribe(subscription));
        repo.add("b");

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(repo.listener_count(), 0);
    }

    #[test]
    fn revision_advances_only_on_new_ids() {
        let repo = InMemoryDiscoveryRepository::new();
        assert_eq!(repo.revision(), 0);
        repo.add("a");
        repo.add("a");
        repo.add("b");
        assert_eq!(repo.revision(), 2);
    }

    #[test]
    fn from_payload_tolerates_garbage() {
        let repo = InMemoryDiscoveryRepository::from_payload("\u{0}garbage");
        assert!(repo.get().is_empty());
    }
}
