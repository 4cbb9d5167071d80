#![forbid(unsafe_code)]

//! Event handlers and the bindings that attach them to host targets.
//!
//! A [`Handler`] is a shared closure compared by identity: two clones of the
//! same handler are equal, two separately created handlers never are, even if
//! they wrap identical code. This is what lets a binding be removed with "the
//! same arguments" it was added with.

use std::fmt;
use std::rc::Rc;

/// An event delivered to a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelEvent {
    /// Id of the node the listener is attached to.
    pub target: String,
    /// Event name (`"click"`, `"input"`, ...).
    pub event: String,
}

impl PanelEvent {
    #[must_use]
    pub fn new(target: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            event: event.into(),
        }
    }
}

/// Shared event callback with identity equality.
#[derive(Clone)]
pub struct Handler(Rc<dyn Fn(&PanelEvent)>);

impl Handler {
    pub fn new(f: impl Fn(&PanelEvent) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the callback.
    pub fn call(&self, event: &PanelEvent) {
        (self.0)(event);
    }

    /// Identity comparison.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Address-derived key, stable for the handler's lifetime. Hosts use it to
    /// find the platform listener they created for this handler.
    #[must_use]
    pub fn key(&self) -> usize {
        Rc::as_ptr(&self.0).cast::<()>() as usize
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Handler {}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:#x})", self.key())
    }
}

/// A `(target, event, handler)` triple owned by a panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub target: String,
    pub event: String,
    pub handler: Handler,
}

impl Binding {
    pub fn new(target: impl Into<String>, event: impl Into<String>, handler: Handler) -> Self {
        Self {
            target: target.into(),
            event: event.into(),
            handler,
        }
    }

    /// Whether this binding was created from the given arguments.
    #[must_use]
    pub fn matches(&self, target: &str, event: &str, handler: &Handler) -> bool {
        self.target == target && self.event == event && self.handler.ptr_eq(handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn clones_share_identity() {
        let h = Handler::new(|_| {});
        let h2 = h.clone();
        assert_eq!(h, h2);
        assert_eq!(h.key(), h2.key());
    }

    #[test]
    fn identical_closures_are_distinct() {
        let a = Handler::new(|_| {});
        let b = Handler::new(|_| {});
        assert_ne!(a, b);
    }

    #[test]
    fn call_forwards_event() {
        let seen = Rc::new(Cell::new(0));
        let counter = Rc::clone(&seen);
        let h = Handler::new(move |ev| {
            assert_eq!(ev.event, "click");
            counter.set(counter.get() + 1);
        });
        h.call(&PanelEvent::new("forward", "click"));
        h.call(&PanelEvent::new("forward", "click"));
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn matches_requires_all_three_parts() {
        let h = Handler::new(|_| {});
        let other = Handler::new(|_| {});
        let b = Binding::new("forward", "click", h.clone());
        assert!(b.matches("forward", "click", &h));
        assert!(!b.matches("back", "click", &h));
        assert!(!b.matches("forward", "input", &h));
        assert!(!b.matches("forward", "click", &other));
    }
}
