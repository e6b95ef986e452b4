//! Quarry Core
//!
//! This crate provides a minimal external state container for UI call sites
//! that want to subscribe to slices of shared mutable state and be re-run
//! only when the slice they actually read changes. It implements:
//!
//! - Fine-grained reactive primitives (fields, effects, dependency tracking)
//! - A store with selector-keyed subscriptions
//! - A per-call-site binding satisfying the external-store contract hosts
//!   expect: a referentially stable subscribe function and a stable, pure
//!   snapshot accessor
//!
//! # Architecture
//!
//! The crate is organized into two modules, leaves first:
//!
//! - `reactive`: dependency-tracked cells and the effects that re-run when
//!   they are written
//! - `store`: the state container and the host-facing binding built on it
//!
//! # Example
//!
//! ```rust,ignore
//! use quarry_core::{create_use_store, Field, SetData};
//!
//! struct Counter {
//!     count: Field<i32>,
//!     other: Field<i32>,
//!     inc: Box<dyn Fn() + Send + Sync>,
//! }
//!
//! let use_counter = create_use_store(|set_data: SetData<Counter>| {
//!     let sd = set_data.clone();
//!     Counter {
//!         count: Field::new(0),
//!         other: Field::new(0),
//!         inc: Box::new(move || sd.set(|s| s.count.update(|c| *c += 1))),
//!     }
//! });
//!
//! // One binding per call site; the selector is fresh every render, the
//! // handles handed to the host never change identity.
//! let binding = use_counter.bind(|s: &Counter| s.count.get());
//! let subscribe = binding.subscribe_handle();
//! let get_snapshot = binding.snapshot_handle();
//!
//! (use_counter.get_state().inc)();
//! assert_eq!(get_snapshot(), 1);
//! ```
//!
//! Notification granularity is the individual field: a subscription fires
//! when a field its selector read is written, even to an equal value.
//! Suppressing renders whose selected value did not change is the host's
//! job, via snapshot equality.

pub mod reactive;
pub mod store;

pub use reactive::{Effect, Field, SubscriberId, TrackingScope};
pub use store::{
    create_use_store, ChangeCallback, Disposer, SetData, SnapshotFn, Store, StoreBinding,
    SubscribeFn, UseStore,
};
