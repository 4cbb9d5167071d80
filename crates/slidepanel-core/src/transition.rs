#![forbid(unsafe_code)]

//! Awaitable handle for an in-flight panel transition.
//!
//! [`PanelRegistry::activate`](crate::PanelRegistry::activate) returns a
//! [`Transition`] once the slide has started. The handle resolves to a
//! [`Settled`] record when the host reports the animation finished and the
//! registry has rewired listeners and run the outgoing destructor.
//!
//! The handle does not borrow the registry, so it can be awaited from a task
//! spawned on a single-threaded executor while the registry itself is driven
//! by the host's animation callbacks.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use crate::direction::SlideDirection;
use crate::host::AnimationId;

/// Outcome of a completed transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settled {
    /// Panel that was displayed before the transition.
    pub from: String,
    /// Panel displayed now.
    pub to: String,
}

#[derive(Debug, Default)]
pub(crate) struct TransitionSignal {
    settled: RefCell<Option<Settled>>,
    waker: RefCell<Option<Waker>>,
}

impl TransitionSignal {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub(crate) fn resolve(&self, settled: Settled) {
        *self.settled.borrow_mut() = Some(settled);
        if let Some(waker) = self.waker.borrow_mut().take() {
            waker.wake();
        }
    }
}

/// A transition that has started but may not have settled yet.
#[derive(Debug, Clone)]
pub struct Transition {
    animation: AnimationId,
    direction: SlideDirection,
    from: String,
    to: String,
    signal: Rc<TransitionSignal>,
}

impl Transition {
    pub(crate) fn new(
        animation: AnimationId,
        direction: SlideDirection,
        from: String,
        to: String,
        signal: Rc<TransitionSignal>,
    ) -> Self {
        Self {
            animation,
            direction,
            from,
            to,
            signal,
        }
    }

    /// Host animation driving this transition.
    #[must_use]
    pub fn animation(&self) -> AnimationId {
        self.animation
    }

    #[must_use]
    pub fn direction(&self) -> SlideDirection {
        self.direction
    }

    #[must_use]
    pub fn from(&self) -> &str {
        &self.from
    }

    #[must_use]
    pub fn to(&self) -> &str {
        &self.to
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.signal.settled.borrow().is_some()
    }
}

impl Future for Transition {
    type Output = Settled;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if let Some(settled) = self.signal.settled.borrow().clone() {
            return Poll::Ready(settled);
        }
        *self.signal.waker.borrow_mut() = Some(cx.waker().clone());
        Poll::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::SLIDE_FROM_RIGHT;

    fn transition(signal: &Rc<TransitionSignal>) -> Transition {
        Transition::new(
            AnimationId(7),
            SLIDE_FROM_RIGHT,
            "main_panel".into(),
            "second_panel".into(),
            Rc::clone(signal),
        )
    }

    #[test]
    fn pending_until_resolved() {
        let signal = TransitionSignal::new();
        let mut t = transition(&signal);
        let mut cx = Context::from_waker(Waker::noop());

        assert_eq!(Pin::new(&mut t).poll(&mut cx), Poll::Pending);
        assert!(!t.is_settled());

        let settled = Settled {
            from: "main_panel".into(),
            to: "second_panel".into(),
        };
        signal.resolve(settled.clone());
        assert!(t.is_settled());
        assert_eq!(Pin::new(&mut t).poll(&mut cx), Poll::Ready(settled));
    }

    #[test]
    fn clones_observe_same_completion() {
        let signal = TransitionSignal::new();
        let a = transition(&signal);
        let b = a.clone();
        signal.resolve(Settled {
            from: a.from().to_string(),
            to: a.to().to_string(),
        });
        assert!(b.is_settled());
        assert_eq!(b.animation(), AnimationId(7));
    }
}
