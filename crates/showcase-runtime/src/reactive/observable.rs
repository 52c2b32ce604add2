#![forbid(unsafe_code)]

//! Observable value wrapper with change notification and version tracking.
//!
//! # Design
//!
//! [`Observable<T>`] wraps a value in shared, reference-counted storage
//! (`Rc<RefCell<..>>`). When the value changes (by `PartialEq`), all live
//! subscribers are notified in registration order. The orchestrator holds the
//! `Observable`; the renderer only ever sees a [`StateView`], which cannot
//! write.
//!
//! # Failure Modes
//!
//! - **Re-entrant set**: a subscriber may call `set()` on the same observable;
//!   the borrow is released before callbacks run, so the nested notification
//!   runs to completion before the outer loop continues.
//! - **Subscriber leak**: guards stored forever keep their callbacks alive.
//!   Dead weak references are pruned lazily during notify.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::Subscription;

type CallbackRc<T> = Rc<dyn Fn(&T)>;
type CallbackWeak<T> = Weak<dyn Fn(&T)>;

struct ObservableInner<T> {
    value: T,
    version: u64,
    subscribers: Vec<CallbackWeak<T>>,
}

/// A shared, version-tracked value with change notification.
///
/// Cloning an `Observable` creates a new handle to the **same** state.
///
/// # Invariants
///
/// 1. `version` increments by exactly 1 on each value-changing mutation.
/// 2. `set(v)` where `v == current` is a no-op.
/// 3. Subscribers are notified in registration order.
pub struct Observable<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Create a new observable with the given initial value (version 0).
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Access the current value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Set a new value, notifying subscribers if it differs.
    pub fn set(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value;
            inner.version += 1;
        }
        self.notify();
    }

    /// Modify the value in place, notifying subscribers if it changed.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            let old = inner.value.clone();
            f(&mut inner.value);
            if inner.value != old {
                inner.version += 1;
                true
            } else {
                false
            }
        };
        if changed {
            self.notify();
        }
    }

    /// Subscribe to value changes.
    ///
    /// The callback is not invoked with the current value; call
    /// [`get`](Self::get) first if an initial paint is needed.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: CallbackRc<T> = Rc::new(callback);
        let weak = Rc::downgrade(&strong);
        self.inner.borrow_mut().subscribers.push(weak);
        Subscription::new(Box::new(strong))
    }

    /// Current version number.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of registered subscribers (including dead ones not yet pruned).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Read-only handle onto this observable.
    #[must_use]
    pub fn view(&self) -> StateView<T> {
        StateView {
            source: self.clone(),
        }
    }

    fn notify(&self) {
        let (callbacks, value) = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|w| w.strong_count() > 0);
            let callbacks: Vec<CallbackRc<T>> =
                inner.subscribers.iter().filter_map(Weak::upgrade).collect();
            (callbacks, inner.value.clone())
        };
        for cb in &callbacks {
            cb(&value);
        }
    }
}

/// Read-only view of an [`Observable`], handed to rendering code.
pub struct StateView<T> {
    source: Observable<T>,
}

impl<T> Clone for StateView<T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for StateView<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("StateView").field(&self.source).finish()
    }
}

impl<T: Clone + PartialEq + 'static> StateView<T> {
    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.source.get()
    }

    /// Access the current value by reference.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.source.with(f)
    }

    /// Current version number, for dirty-checking in render loops.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.source.version()
    }

    /// Subscribe to value changes.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.source.subscribe(callback)
    }
}
