#![forbid(unsafe_code)]

//! Reactive primitives shared between the orchestrator and its renderer.
//!
//! - [`Observable`]: a version-tracked value with change notification.
//! - [`StateView`]: a read-only handle onto an [`Observable`].
//! - [`Signal`]: an event bus with no stored value.
//!
//! All three are single-threaded (`Rc<RefCell<..>>`) and hand out
//! [`Subscription`] guards; dropping a guard unsubscribes.

mod observable;
mod signal;

pub use observable::{Observable, StateView};
pub use signal::Signal;

/// RAII guard for a subscriber callback.
///
/// Dropping the `Subscription` drops the only strong reference to the
/// callback, so the weak entry held by the source fails to upgrade on the
/// next notification and is pruned.
pub struct Subscription {
    /// Type-erased strong reference keeping the callback `Rc` alive.
    _guard: Box<dyn std::any::Any>,
}

impl Subscription {
    pub(crate) fn new(guard: Box<dyn std::any::Any>) -> Self {
        Self { _guard: guard }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
