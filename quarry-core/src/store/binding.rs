//! Store binding
//!
//! The binding is the per-call-site glue between a [`Store`] and a host UI
//! framework's external-store contract: `(subscribe, get_snapshot)`. The
//! host re-subscribes whenever the subscribe function's identity changes and
//! suppresses re-renders by comparing snapshots, so the binding's whole job
//! is stability:
//!
//! - the subscribe handle and the snapshot handle are each allocated once
//!   per binding and never replaced, even though
//! - the selector is freshly allocated on every render.
//!
//! Identity and payload are separated: the handles close over a selector
//! *slot* whose identity never changes, and [`StoreBinding::render`] swaps
//! the slot's contents each render. Every subscription evaluation and every
//! snapshot read goes through the slot at call time, so neither ever sees a
//! stale selector.
//!
//! One binding corresponds to one mounted call site. Unmounting means
//! disposing the subscription the host obtained from the subscribe handle;
//! re-mounting creates a fresh binding.

use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use super::store::{Disposer, SetData, Store};

/// Change callback handed to the subscribe handle by the host.
pub type ChangeCallback = Arc<dyn Fn() + Send + Sync>;

/// The stable subscribe function: registers a change callback, returns the
/// subscription's disposer.
pub type SubscribeFn = Arc<dyn Fn(ChangeCallback) -> Disposer + Send + Sync>;

/// The stable snapshot accessor: evaluates the current selector against the
/// current state. Pure; reads are untracked outside an effect.
pub type SnapshotFn<S> = Arc<dyn Fn() -> S + Send + Sync>;

type Selector<T, S> = Box<dyn Fn(&T) -> S + Send + Sync>;

/// Per-call-site adapter satisfying the external-store contract.
pub struct StoreBinding<T, S> {
    store: Store<T>,
    selector: Arc<RwLock<Selector<T, S>>>,
    subscribe_fn: OnceLock<SubscribeFn>,
    snapshot_fn: OnceLock<SnapshotFn<S>>,
}

impl<T, S> StoreBinding<T, S>
where
    T: Send + Sync + 'static,
    S: 'static,
{
    /// Create a binding for one call site, with its first selector.
    pub fn new(store: Store<T>, selector: impl Fn(&T) -> S + Send + Sync + 'static) -> Self {
        Self {
            store,
            selector: Arc::new(RwLock::new(Box::new(selector))),
            subscribe_fn: OnceLock::new(),
            snapshot_fn: OnceLock::new(),
        }
    }

    /// Per-render entry point: install the render's freshly allocated
    /// selector and return the current snapshot.
    ///
    /// No handle identity changes here, only the slot's payload.
    pub fn render(&self, selector: impl Fn(&T) -> S + Send + Sync + 'static) -> S {
        *self.selector.write() = Box::new(selector);
        self.snapshot()
    }

    /// Evaluate the current selector against the current state.
    ///
    /// A panic in the selector propagates to the caller; the subscription,
    /// if any, stays registered.
    pub fn snapshot(&self) -> S {
        let state = self.store.get_state();
        (*self.selector.read())(&state)
    }

    /// The subscribe function for this call site.
    ///
    /// Built lazily on first use, then the same `Arc` on every call for the
    /// lifetime of the binding. Each subscription evaluation reads the
    /// selector slot, so re-runs always use the selector most recently
    /// installed by [`render`](Self::render).
    pub fn subscribe_handle(&self) -> SubscribeFn {
        self.subscribe_fn
            .get_or_init(|| {
                let store = self.store.clone();
                let selector = Arc::clone(&self.selector);
                Arc::new(move |on_change: ChangeCallback| {
                    let selector = Arc::clone(&selector);
                    store.subscribe(
                        move |state: &T| (*selector.read())(state),
                        move || on_change(),
                    )
                })
            })
            .clone()
    }

    /// The snapshot accessor for this call site.
    ///
    /// Built lazily on first use, then the same `Arc` on every call; its
    /// result changes, its identity does not.
    pub fn snapshot_handle(&self) -> SnapshotFn<S> {
        self.snapshot_fn
            .get_or_init(|| {
                let store = self.store.clone();
                let selector = Arc::clone(&self.selector);
                Arc::new(move || {
                    let state = store.get_state();
                    (*selector.read())(&state)
                })
            })
            .clone()
    }
}

/// Factory tying a store to the per-call-site bindings made from it.
///
/// Exposes the store's imperative surface (`get_state`/`set_state`) for use
/// outside rendering, from action closures or from tests.
pub struct UseStore<T> {
    store: Store<T>,
}

impl<T> UseStore<T>
where
    T: Send + Sync + 'static,
{
    /// Build the store and wrap it in a factory.
    pub fn new(initializer: impl FnOnce(SetData<T>) -> T) -> Self {
        Self {
            store: Store::new(initializer),
        }
    }

    /// Create the binding for one call site (one mount).
    pub fn bind<S>(&self, selector: impl Fn(&T) -> S + Send + Sync + 'static) -> StoreBinding<T, S>
    where
        S: 'static,
    {
        StoreBinding::new(self.store.clone(), selector)
    }

    /// The current state container.
    pub fn get_state(&self) -> Arc<T> {
        self.store.get_state()
    }

    /// Apply an in-place mutation through the store.
    pub fn set_state(&self, updater: impl FnOnce(&T)) {
        self.store.set_state(updater);
    }
}

impl<T> Clone for UseStore<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

/// Build a store from an initializer and return its binding factory.
pub fn create_use_store<T>(initializer: impl FnOnce(SetData<T>) -> T) -> UseStore<T>
where
    T: Send + Sync + 'static,
{
    UseStore::new(initializer)
}
