//! Tracking scope
//!
//! The tracking scope records which computation is currently running. When a
//! field is read while a scope is active, the field registers the innermost
//! subscriber as a dependent. This is what makes dependency tracking
//! automatic.
//!
//! # Implementation
//!
//! A thread-local stack holds the subscriber ids of the computations that are
//! currently executing. Entering a scope pushes an id; the guard returned by
//! `enter` pops it on drop, so the stack stays balanced even if the
//! computation panics. Nesting is supported: an effect that runs another
//! effect's body sees the inner subscriber as current.

use std::cell::RefCell;

use super::SubscriberId;

thread_local! {
    static SCOPE_STACK: RefCell<Vec<SubscriberId>> = const { RefCell::new(Vec::new()) };
}

/// Guard for an active tracking scope.
///
/// While alive, field reads on this thread are attributed to the subscriber
/// it was entered with. Dropping the guard exits the scope.
pub struct TrackingScope {
    subscriber_id: SubscriberId,
}

impl TrackingScope {
    /// Enter a tracking scope for the given subscriber.
    ///
    /// Reads performed until the returned guard drops register dependencies
    /// on behalf of `subscriber_id`.
    pub fn enter(subscriber_id: SubscriberId) -> Self {
        SCOPE_STACK.with(|stack| stack.borrow_mut().push(subscriber_id));
        Self { subscriber_id }
    }

    /// Check whether any tracking scope is active on this thread.
    pub fn is_active() -> bool {
        SCOPE_STACK.with(|stack| !stack.borrow().is_empty())
    }

    /// The innermost active subscriber, if any.
    pub fn current() -> Option<SubscriberId> {
        SCOPE_STACK.with(|stack| stack.borrow().last().copied())
    }
}

impl Drop for TrackingScope {
    fn drop(&mut self) {
        SCOPE_STACK.with(|stack| {
            let popped = stack.borrow_mut().pop();
            debug_assert_eq!(
                popped,
                Some(self.subscriber_id),
                "tracking scope stack out of balance"
            );
        });
    }
}
