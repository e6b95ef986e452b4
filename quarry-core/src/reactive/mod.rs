//! Reactive primitives
//!
//! This module implements the fine-grained reactive core the store is built
//! on: dependency-tracked fields and eager effects.
//!
//! # Concepts
//!
//! ## Fields
//!
//! A [`Field`] is a container for one piece of mutable state. Reading a field
//! inside a tracking scope records the reader as a dependent; writing a field
//! re-runs every dependent synchronously.
//!
//! ## Effects
//!
//! An [`Effect`] is a computation that runs once on creation and again after
//! any field it read is written. Dependencies are re-collected on every run,
//! so they follow the control flow of the function.
//!
//! # Implementation notes
//!
//! Tracking is transparent: a thread-local scope stack records which
//! computation is running, and field reads consult it. The approach is the
//! one used by the fine-grained UI runtimes (SolidJS, Vue 3, Leptos).
//! Granularity is the individual field: a write always counts as a change,
//! even when the new value equals the old one.

mod context;
mod effect;
mod field;
mod runtime;
mod subscriber;

pub use context::TrackingScope;
pub use effect::Effect;
pub use field::Field;
pub use runtime::{Observer, Runtime};
pub use subscriber::SubscriberId;
