//! Reactive field
//!
//! A `Field` is the fundamental reactive cell: it holds one value and
//! remembers, via the runtime, which computations read it.
//!
//! # How fields work
//!
//! 1. When a field is read inside a tracking scope (an effect run), the read
//!    is recorded as a dependency of that scope's subscriber.
//!
//! 2. When a field is written, every recorded subscriber is re-run
//!    synchronously before the write call returns.
//!
//! Writes notify unconditionally: setting a field to a value equal to the one
//! it already holds still re-runs dependents. Granularity is the cell, not
//! the value: suppressing updates whose observable output did not change is
//! the consumer's job (for UI hosts, snapshot equality).
//!
//! # Sharing
//!
//! `Field` is a cheap-clone handle; clones share the same cell and the same
//! id. State structs hold fields by value and hand out `&self` access, which
//! is all mutation needs.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use super::context::TrackingScope;
use super::runtime::Runtime;

static FIELD_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_field_id() -> u64 {
    FIELD_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// A dependency-tracked mutable cell.
///
/// # Example
///
/// ```rust,ignore
/// let count = Field::new(0);
///
/// let value = count.get();   // tracked when read inside an effect
/// count.set(5);              // re-runs every effect that read it
/// ```
pub struct Field<V> {
    id: u64,
    value: Arc<RwLock<V>>,
}

impl<V> Field<V>
where
    V: Send + Sync + 'static,
{
    /// Create a new field with the given initial value.
    pub fn new(value: V) -> Self {
        Self {
            id: next_field_id(),
            value: Arc::new(RwLock::new(value)),
        }
    }

    /// The field's unique id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Get the current value.
    ///
    /// If called inside a tracking scope, registers the current computation
    /// as a dependent of this field.
    pub fn get(&self) -> V
    where
        V: Clone,
    {
        self.track();
        self.value.read().clone()
    }

    /// Read the value through a borrow, without cloning. Tracked.
    pub fn with<R>(&self, f: impl FnOnce(&V) -> R) -> R {
        self.track();
        f(&self.value.read())
    }

    /// Get the current value without registering a dependency.
    pub fn get_untracked(&self) -> V
    where
        V: Clone,
    {
        self.value.read().clone()
    }

    /// Replace the value and re-run dependents.
    pub fn set(&self, value: V) {
        {
            let mut guard = self.value.write();
            *guard = value;
        }
        tracing::trace!(field_id = self.id, "field written");
        Runtime::notify(self.id);
    }

    /// Mutate the value in place and re-run dependents.
    pub fn update(&self, f: impl FnOnce(&mut V)) {
        {
            let mut guard = self.value.write();
            f(&mut guard);
        }
        tracing::trace!(field_id = self.id, "field written");
        Runtime::notify(self.id);
    }

    /// Number of computations currently depending on this field.
    pub fn dependent_count(&self) -> usize {
        Runtime::dependent_count(self.id)
    }

    fn track(&self) {
        if let Some(subscriber_id) = TrackingScope::current() {
            Runtime::add_dependency(self.id, subscriber_id);
        }
    }
}

impl<V> Clone for Field<V> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            value: Arc::clone(&self.value),
        }
    }
}

impl<V> Debug for Field<V>
where
    V: Debug + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("id", &self.id)
            .field("value", &*self.value.read())
            .field("dependent_count", &self.dependent_count())
            .finish()
    }
}
