//! Effect
//!
//! An effect is an eager computation that re-runs whenever a field it read
//! during its previous run is written.
//!
//! # Lifecycle
//!
//! 1. Creation runs the function immediately, inside a tracking scope, to
//!    establish the initial dependency set.
//!
//! 2. A write to any tracked field re-runs the function synchronously.
//!    Before each re-run the stale dependencies are cleared, so a run that
//!    stops reading a field stops being notified for it.
//!
//! 3. `stop` detaches the effect permanently. Stopping is idempotent, and a
//!    stopped effect never runs again. Dropping the last handle to an effect
//!    has the same end result: the runtime only holds it weakly.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use super::context::TrackingScope;
use super::runtime::{Observer, Runtime};
use super::subscriber::SubscriberId;

struct EffectInner {
    subscriber_id: SubscriberId,
    run: Box<dyn Fn() + Send + Sync>,
    stopped: AtomicBool,
    runs: AtomicUsize,
}

impl EffectInner {
    fn execute(&self) {
        if self.stopped.load(Ordering::SeqCst) {
            return;
        }

        Runtime::clear_dependencies(self.subscriber_id);

        let _scope = TrackingScope::enter(self.subscriber_id);
        (self.run)();

        self.runs.fetch_add(1, Ordering::SeqCst);
    }
}

impl Observer for EffectInner {
    fn id(&self) -> SubscriberId {
        self.subscriber_id
    }

    fn invalidate(&self) {
        self.execute();
    }
}

/// An eager computation tied to the fields it reads.
///
/// # Example
///
/// ```rust,ignore
/// let count = Field::new(0);
///
/// let effect = Effect::new(move || {
///     println!("count is {}", count.get());
/// });
///
/// count.set(5); // prints "count is 5" before set returns
/// ```
pub struct Effect {
    inner: Arc<EffectInner>,
}

impl Effect {
    /// Create an effect and run it immediately to establish dependencies.
    pub fn new<F>(run: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let inner = Arc::new(EffectInner {
            subscriber_id: SubscriberId::new(),
            run: Box::new(run),
            stopped: AtomicBool::new(false),
            runs: AtomicUsize::new(0),
        });

        Runtime::register(&inner);
        inner.execute();

        Self { inner }
    }

    /// The subscriber id this effect tracks dependencies under.
    pub fn subscriber_id(&self) -> SubscriberId {
        self.inner.subscriber_id
    }

    /// Detach the effect permanently. Safe to call more than once.
    pub fn stop(&self) {
        if !self.inner.stopped.swap(true, Ordering::SeqCst) {
            tracing::debug!(subscriber_id = ?self.inner.subscriber_id, "effect stopped");
            Runtime::unregister(self.inner.subscriber_id);
        }
    }

    /// Whether the effect has been stopped.
    pub fn is_stopped(&self) -> bool {
        self.inner.stopped.load(Ordering::SeqCst)
    }

    /// Number of times the effect has run, including the initial run.
    pub fn run_count(&self) -> usize {
        self.inner.runs.load(Ordering::SeqCst)
    }
}
