#![forbid(unsafe_code)]

//! Stateless event bus.
//!
//! Hosts use a [`Signal`] for global notifications such as "check for a
//! pending tour" after signup or navigation. Unlike an
//! [`Observable`](super::Observable), a signal stores nothing and never
//! deduplicates; every dispatch reaches every live subscriber.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::Subscription;

type HandlerRc<E> = Rc<dyn Fn(&E)>;
type HandlerWeak<E> = Weak<dyn Fn(&E)>;

/// A cloneable, single-threaded event bus.
pub struct Signal<E> {
    name: &'static str,
    handlers: Rc<RefCell<Vec<HandlerWeak<E>>>>,
}

impl<E> Clone for Signal<E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            handlers: Rc::clone(&self.handlers),
        }
    }
}

impl<E> std::fmt::Debug for Signal<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("name", &self.name)
            .field("handler_count", &self.handlers.borrow().len())
            .finish()
    }
}

impl<E: 'static> Signal<E> {
    /// Create a signal. `name` appears in logs only.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            handlers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Signal name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Register a handler; dropping the guard unregisters it.
    pub fn subscribe(&self, handler: impl Fn(&E) + 'static) -> Subscription {
        let strong: HandlerRc<E> = Rc::new(handler);
        self.handlers.borrow_mut().push(Rc::downgrade(&strong));
        Subscription::new(Box::new(strong))
    }

    /// Deliver `event` to every live handler. Returns how many ran.
    pub fn dispatch(&self, event: &E) -> usize {
        let live: Vec<HandlerRc<E>> = {
            let mut handlers = self.handlers.borrow_mut();
            handlers.retain(|h| h.strong_count() > 0);
            handlers.iter().filter_map(Weak::upgrade).collect()
        };
        tracing::debug!(
            target: "showcase.runtime",
            signal = self.name,
            handlers = live.len(),
            "signal dispatched"
        );
        for handler in &live {
            handler(event);
        }
        live.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn dispatch_reaches_every_handler() {
        let signal = Signal::<u32>::new("test");
        let total = Rc::new(Cell::new(0));
        let a = Rc::clone(&total);
        let b = Rc::clone(&total);
        let _sa = signal.subscribe(move |v| a.set(a.get() + v));
        let _sb = signal.subscribe(move |v| b.set(b.get() + v * 10));
        assert_eq!(signal.dispatch(&2), 2);
        assert_eq!(total.get(), 22);
    }

    #[test]
    fn repeated_dispatch_is_not_deduplicated() {
        let signal = Signal::<()>::new("check");
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let _sub = signal.subscribe(move |_| c.set(c.get() + 1));
        signal.dispatch(&());
        signal.dispatch(&());
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn dropped_handler_is_skipped() {
        let signal = Signal::<()>::new("check");
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let sub = signal.subscribe(move |_| c.set(c.get() + 1));
        drop(sub);
        assert_eq!(signal.dispatch(&()), 0);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn clones_share_handlers() {
        let signal = Signal::<()>::new("check");
        let other = signal.clone();
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let _sub = signal.subscribe(move |_| c.set(c.get() + 1));
        other.dispatch(&());
        assert_eq!(count.get(), 1);
    }
}
