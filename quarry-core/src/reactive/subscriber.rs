//! Subscriber identity for the reactive system.
//!
//! Every computation that depends on reactive fields (an effect, or the
//! subscription an effect backs) is identified by a `SubscriberId`. The id is
//! what the runtime's dependency map stores, so the computation itself never
//! has to be kept alive just to remember who read what.

use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a subscriber.
///
/// Ids come from a process-wide atomic counter, so they are unique across
/// threads and never reused within a process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Generate a new unique subscriber ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}
