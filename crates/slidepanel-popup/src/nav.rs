#![forbid(unsafe_code)]

//! Deferred navigation requests.
//!
//! Event handlers run while the host is dispatching, which may be while the
//! registry is borrowed. Instead of calling `activate` they record what they
//! want in a [`NavQueue`]; the owner of the registry drains the queue later.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use slidepanel_core::{Handler, SlideDirection};
use tracing::trace;

/// A request to show `panel`, sliding in from `direction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavRequest {
    pub panel: String,
    pub direction: SlideDirection,
}

impl NavRequest {
    pub fn new(panel: impl Into<String>, direction: SlideDirection) -> Self {
        Self {
            panel: panel.into(),
            direction,
        }
    }
}

type Notifier = Rc<dyn Fn()>;

#[derive(Default)]
struct Inner {
    requests: RefCell<VecDeque<NavRequest>>,
    notify: RefCell<Option<Notifier>>,
}

/// Shared FIFO of [`NavRequest`]s. Clones share the same queue.
#[derive(Clone, Default)]
pub struct NavQueue {
    inner: Rc<Inner>,
}

impl NavQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `notify` after every push, once the queue is no longer borrowed.
    pub fn set_notifier(&self, notify: impl Fn() + 'static) {
        *self.inner.notify.borrow_mut() = Some(Rc::new(notify));
    }

    pub fn push(&self, request: NavRequest) {
        trace!(panel = %request.panel, direction = request.direction.as_str(), "nav requested");
        self.inner.requests.borrow_mut().push_back(request);
        let notify = self.inner.notify.borrow().clone();
        if let Some(notify) = notify {
            notify();
        }
    }

    pub fn pop(&self) -> Option<NavRequest> {
        self.inner.requests.borrow_mut().pop_front()
    }

    /// Take every pending request, oldest first.
    pub fn drain(&self) -> Vec<NavRequest> {
        self.inner.requests.borrow_mut().drain(..).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.requests.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.requests.borrow().is_empty()
    }

    /// A handler that requests `panel` each time it fires.
    pub fn request_handler(&self, panel: &str, direction: SlideDirection) -> Handler {
        let queue = self.clone();
        let panel = panel.to_string();
        Handler::new(move |_event| queue.push(NavRequest::new(panel.clone(), direction)))
    }
}

impl fmt::Debug for NavQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavQueue")
            .field("pending", &self.inner.requests.borrow())
            .field("notifier", &self.inner.notify.borrow().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use slidepanel_core::{PanelEvent, SLIDE_FROM_LEFT, SLIDE_FROM_RIGHT};
    use std::cell::Cell;

    #[test]
    fn fifo_order() {
        let queue = NavQueue::new();
        queue.push(NavRequest::new("a", SLIDE_FROM_RIGHT));
        queue.push(NavRequest::new("b", SLIDE_FROM_LEFT));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop(), Some(NavRequest::new("a", SLIDE_FROM_RIGHT)));
        assert_eq!(queue.drain(), vec![NavRequest::new("b", SLIDE_FROM_LEFT)]);
        assert!(queue.is_empty());
    }

    #[test]
    fn clones_share_state() {
        let queue = NavQueue::new();
        let other = queue.clone();
        other.push(NavRequest::new("a", SLIDE_FROM_RIGHT));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn handler_pushes_request() {
        let queue = NavQueue::new();
        let handler = queue.request_handler("second_panel", SLIDE_FROM_RIGHT);
        handler.call(&PanelEvent::new("forward", "click"));
        handler.call(&PanelEvent::new("forward", "click"));
        assert_eq!(
            queue.drain(),
            vec![
                NavRequest::new("second_panel", SLIDE_FROM_RIGHT),
                NavRequest::new("second_panel", SLIDE_FROM_RIGHT)
            ]
        );
    }

    #[test]
    fn notifier_sees_pushed_request() {
        let queue = NavQueue::new();
        let seen = Rc::new(Cell::new(0));
        let watched = queue.clone();
        let counter = Rc::clone(&seen);
        queue.set_notifier(move || counter.set(watched.len()));
        queue.push(NavRequest::new("a", SLIDE_FROM_LEFT));
        assert_eq!(seen.get(), 1);
    }
}
