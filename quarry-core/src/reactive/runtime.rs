//! Reactive runtime
//!
//! The runtime is the coordinator that connects fields to the effects that
//! read them. It owns two global maps:
//!
//! - a registry of live observers, keyed by subscriber id and held weakly so
//!   a dropped effect never has to deregister itself to be collectible
//! - the dependency map from field id to the subscribers that read that field
//!   during their most recent run
//!
//! # Update propagation
//!
//! 1. A field is read inside a tracking scope; the field calls
//!    [`Runtime::add_dependency`] for the current subscriber.
//!
//! 2. The field is written; [`Runtime::notify`] looks up the subscribers
//!    recorded for it, upgrades each weak observer, and invalidates the live
//!    ones synchronously. Invalidation re-runs the observer, which clears its
//!    stale dependencies and tracks fresh ones.
//!
//! 3. Entries whose observer has been dropped are pruned during notification.
//!
//! Notification releases all map guards before invoking observers, because an
//! observer re-run immediately calls back into the dependency map.

use std::sync::{Arc, OnceLock, Weak};

use dashmap::DashMap;
use smallvec::SmallVec;

use super::subscriber::SubscriberId;

/// Per-field subscriber list. Almost always one or two entries.
type Subscribers = SmallVec<[SubscriberId; 4]>;

/// A computation that can be re-run when one of its dependencies changes.
pub trait Observer: Send + Sync {
    /// The subscriber id this observer tracks dependencies under.
    fn id(&self) -> SubscriberId;

    /// Re-run the computation. Called synchronously from [`Runtime::notify`].
    fn invalidate(&self);
}

static REGISTRY: OnceLock<DashMap<SubscriberId, Weak<dyn Observer>>> = OnceLock::new();
static FIELD_SUBSCRIBERS: OnceLock<DashMap<u64, Subscribers>> = OnceLock::new();

fn registry() -> &'static DashMap<SubscriberId, Weak<dyn Observer>> {
    REGISTRY.get_or_init(DashMap::new)
}

fn field_subscribers() -> &'static DashMap<u64, Subscribers> {
    FIELD_SUBSCRIBERS.get_or_init(DashMap::new)
}

/// The global reactive runtime.
pub struct Runtime;

impl Runtime {
    /// Register an observer so that field writes can reach it.
    ///
    /// The runtime holds only a weak reference; the caller keeps the
    /// observer alive for as long as it should keep firing.
    pub fn register<O>(observer: &Arc<O>)
    where
        O: Observer + 'static,
    {
        registry().insert(observer.id(), Arc::downgrade(observer) as Weak<dyn Observer>);
    }

    /// Remove an observer and every dependency recorded for it.
    pub fn unregister(subscriber_id: SubscriberId) {
        registry().remove(&subscriber_id);
        Self::clear_dependencies(subscriber_id);
    }

    /// Record that `subscriber_id` read the field with id `field_id`.
    pub fn add_dependency(field_id: u64, subscriber_id: SubscriberId) {
        let mut subs = field_subscribers().entry(field_id).or_default();
        if !subs.contains(&subscriber_id) {
            subs.push(subscriber_id);
        }
    }

    /// Drop every dependency recorded for a subscriber.
    ///
    /// Called before an observer re-runs, so a run that stops reading a field
    /// stops being notified for it.
    pub fn clear_dependencies(subscriber_id: SubscriberId) {
        for mut entry in field_subscribers().iter_mut() {
            entry.value_mut().retain(|s| *s != subscriber_id);
        }
    }

    /// Number of subscribers currently recorded for a field.
    pub fn dependent_count(field_id: u64) -> usize {
        field_subscribers()
            .get(&field_id)
            .map(|subs| subs.len())
            .unwrap_or(0)
    }

    /// Notify every subscriber of `field_id` that the field was written.
    ///
    /// Live observers are invalidated synchronously, in registration order,
    /// to completion before this returns. Dead entries are pruned.
    pub fn notify(field_id: u64) {
        let ids: Subscribers = match field_subscribers().get(&field_id) {
            Some(subs) => subs.clone(),
            None => return,
        };
        if ids.is_empty() {
            return;
        }

        let mut live: Vec<Arc<dyn Observer>> = Vec::with_capacity(ids.len());
        let mut dead: Subscribers = SmallVec::new();
        for id in &ids {
            match registry().get(id).and_then(|weak| weak.upgrade()) {
                Some(observer) => live.push(observer),
                None => dead.push(*id),
            }
        }

        if !dead.is_empty() {
            tracing::trace!(field_id, pruned = dead.len(), "dropping dead subscribers");
            for id in &dead {
                registry().remove(id);
            }
            if let Some(mut subs) = field_subscribers().get_mut(&field_id) {
                subs.retain(|s| !dead.contains(s));
            }
        }

        // All map guards are released at this point; observers may re-enter.
        for observer in live {
            observer.invalidate();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Probe {
        id: SubscriberId,
        runs: AtomicUsize,
    }

    impl Probe {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                id: SubscriberId::new(),
                runs: AtomicUsize::new(0),
            })
        }
    }

    impl Observer for Probe {
        fn id(&self) -> SubscriberId {
            self.id
        }

        fn invalidate(&self) {
            self.runs.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn fresh_field_id() -> u64 {
        // Field ids come from the field module's counter in production; tests
        // here pick ids far outside that range to stay isolated.
        use std::sync::atomic::AtomicU64;
        static TEST_IDS: AtomicU64 = AtomicU64::new(1 << 48);
        TEST_IDS.fetch_add(1, Ordering::Relaxed)
    }

    #[test]
    fn notify_reaches_registered_observers() {
        let probe = Probe::new();
        let field = fresh_field_id();

        Runtime::register(&probe);
        Runtime::add_dependency(field, probe.id);

        Runtime::notify(field);
        assert_eq!(probe.runs.load(Ordering::SeqCst), 1);

        Runtime::notify(field);
        assert_eq!(probe.runs.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unregister_stops_notifications() {
        let probe = Probe::new();
        let field = fresh_field_id();

        Runtime::register(&probe);
        Runtime::add_dependency(field, probe.id);
        Runtime::unregister(probe.id);

        Runtime::notify(field);
        assert_eq!(probe.runs.load(Ordering::SeqCst), 0);
        assert_eq!(Runtime::dependent_count(field), 0);
    }

    #[test]
    fn dependencies_are_deduplicated() {
        let probe = Probe::new();
        let field = fresh_field_id();

        Runtime::register(&probe);
        Runtime::add_dependency(field, probe.id);
        Runtime::add_dependency(field, probe.id);
        Runtime::add_dependency(field, probe.id);

        assert_eq!(Runtime::dependent_count(field), 1);

        Runtime::notify(field);
        assert_eq!(probe.runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dead_observers_are_pruned_on_notify() {
        let probe = Probe::new();
        let id = probe.id;
        let field = fresh_field_id();

        Runtime::register(&probe);
        Runtime::add_dependency(field, id);
        drop(probe);

        assert_eq!(Runtime::dependent_count(field), 1);
        Runtime::notify(field);
        assert_eq!(Runtime::dependent_count(field), 0);
    }

    #[test]
    fn clear_dependencies_leaves_other_subscribers() {
        let a = Probe::new();
        let b = Probe::new();
        let field = fresh_field_id();

        Runtime::register(&a);
        Runtime::register(&b);
        Runtime::add_dependency(field, a.id);
        Runtime::add_dependency(field, b.id);

        Runtime::clear_dependencies(a.id);

        Runtime::notify(field);
        assert_eq!(a.runs.load(Ordering::SeqCst), 0);
        assert_eq!(b.runs.load(Ordering::SeqCst), 1);
    }
}
