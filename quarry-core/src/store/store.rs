//! Store
//!
//! A [`Store`] owns one reactive state container and exposes the three
//! operations everything else is built from: `get_state`, `set_state`, and
//! `subscribe`.
//!
//! # Construction
//!
//! The store is created from an initializer that receives the mutation
//! primitive ([`SetData`]) and returns the full initial state. Actions
//! defined inside the initializer close over the primitive, so state and the
//! operations on it live in one place with no separate dispatch mechanism:
//!
//! ```rust,ignore
//! struct Counter {
//!     count: Field<i32>,
//!     inc: Box<dyn Fn() + Send + Sync>,
//! }
//!
//! let store = Store::new(|set_data: SetData<Counter>| {
//!     let sd = set_data.clone();
//!     Counter {
//!         count: Field::new(0),
//!         inc: Box::new(move || sd.set(|s| s.count.update(|c| *c += 1))),
//!     }
//! });
//! ```
//!
//! # Subscriptions
//!
//! `subscribe` pairs a selector with a callback. The selector is evaluated
//! inside an effect, so whichever fields it reads become the subscription's
//! dependencies; the callback then fires on every write to one of those
//! fields. The store does no equality diffing of the selector's output:
//! a tracked field written to an equal value still notifies. Output-level
//! suppression is deliberately left to the consumer (a UI host's snapshot
//! equality), which keeps the store a thin bridge over the reactive core.

use std::sync::{Arc, OnceLock};

use crate::reactive::Effect;

/// The mutation primitive handed to the initializer.
///
/// Cloneable; action closures capture one clone each. All mutation flows
/// through [`SetData::set`] (or the equivalent [`Store::set_state`]); the
/// updater mutates fields in place, and the container itself is never
/// replaced.
pub struct SetData<T> {
    slot: Arc<OnceLock<Arc<T>>>,
}

impl<T> SetData<T> {
    /// Apply an in-place mutation to the state container.
    ///
    /// Field writes inside the updater re-run dependent subscriptions
    /// synchronously before this returns. Invoking this before the store has
    /// finished constructing (i.e. from inside the initializer itself, rather
    /// than from an action it returns) is ignored with a warning: the
    /// container does not exist yet.
    pub fn set(&self, updater: impl FnOnce(&T)) {
        match self.slot.get() {
            Some(state) => updater(state),
            None => {
                tracing::warn!("state mutation requested before store construction finished; ignored");
            }
        }
    }
}

impl<T> Clone for SetData<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

/// A reactive state container with selector-keyed subscriptions.
///
/// Cheap-clone handle; clones share the same state.
pub struct Store<T> {
    state: Arc<T>,
}

impl<T> Store<T>
where
    T: Send + Sync + 'static,
{
    /// Build a store by running `initializer` exactly once, synchronously.
    ///
    /// A panic in the initializer propagates and is fatal to construction.
    pub fn new(initializer: impl FnOnce(SetData<T>) -> T) -> Self {
        let slot = Arc::new(OnceLock::new());
        let set_data = SetData {
            slot: Arc::clone(&slot),
        };

        let state = Arc::new(initializer(set_data));
        let _ = slot.set(Arc::clone(&state));

        tracing::debug!("store constructed");
        Self { state }
    }

    /// The current state container.
    ///
    /// Field reads performed by the caller behave like any other reactive
    /// read: tracked inside an effect, untracked elsewhere.
    pub fn get_state(&self) -> Arc<T> {
        Arc::clone(&self.state)
    }

    /// Apply an in-place mutation; the sole mutation gateway.
    ///
    /// Equivalent to the [`SetData`] the initializer received. Dependent
    /// subscription callbacks run synchronously to completion before this
    /// returns; there is no batching. A panic in the updater propagates, and
    /// subscriptions already notified stay notified.
    pub fn set_state(&self, updater: impl FnOnce(&T)) {
        updater(&self.state);
    }

    /// Register a subscription: `selector` establishes the tracked fields,
    /// `callback` fires when one of them is written.
    ///
    /// The underlying effect runs immediately, so the callback is invoked
    /// once at subscribe time; external-store hosts treat that as an initial
    /// snapshot check. The selector's return value is discarded here; only
    /// its reads matter.
    pub fn subscribe<S, Sel, Cb>(&self, selector: Sel, callback: Cb) -> Disposer
    where
        S: 'static,
        Sel: Fn(&T) -> S + Send + Sync + 'static,
        Cb: Fn() + Send + Sync + 'static,
    {
        let state = Arc::clone(&self.state);
        let effect = Effect::new(move || {
            let _ = selector(&state);
            callback();
        });
        tracing::debug!(subscriber_id = ?effect.subscriber_id(), "subscription registered");

        Disposer { effect }
    }
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

/// Detaches a subscription.
///
/// `dispose` is permanent and idempotent: calling it again is a no-op,
/// never an error. Dropping the disposer also detaches, so a subscription
/// lives exactly as long as someone holds its disposer.
#[must_use = "dropping the disposer detaches the subscription"]
pub struct Disposer {
    effect: Effect,
}

impl Disposer {
    /// Permanently detach the subscription.
    pub fn dispose(&self) {
        self.effect.stop();
    }

    /// Whether the subscription has been detached.
    pub fn is_disposed(&self) -> bool {
        self.effect.is_stopped()
    }
}

impl Drop for Disposer {
    fn drop(&mut self) {
        self.effect.stop();
    }
}
