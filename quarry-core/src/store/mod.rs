//! Store layer
//!
//! Builds the external state container on top of the reactive core:
//!
//! - [`Store`]: one reactive state container with `get_state`/`set_state`
//!   and selector-keyed subscriptions.
//! - [`StoreBinding`] / [`UseStore`]: the per-call-site adapter and its
//!   factory, satisfying a UI host's external-store contract (stable
//!   subscribe function, stable pure snapshot accessor).

mod binding;
mod store;

pub use binding::{
    create_use_store, ChangeCallback, SnapshotFn, StoreBinding, SubscribeFn, UseStore,
};
pub use store::{Disposer, SetData, Store};
