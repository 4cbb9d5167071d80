#![forbid(unsafe_code)]

//! The document boundary.
//!
//! [`PanelHost`] is everything the registry needs from the embedding
//! environment: node lookup, class markers, listener wiring, and a keyframe
//! animation primitive whose completion is reported back to
//! [`PanelRegistry::finish`](crate::PanelRegistry::finish).
//!
//! Hosts are host-driven: `animate` never blocks. The host remembers the
//! returned [`AnimationId`] and calls `finish` once the animation has played.

use std::fmt;
use std::time::Duration;

use crate::binding::Handler;
use crate::direction::SlideKeyframes;

/// Opaque handle for an animation started by a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(pub u64);

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "anim#{}", self.0)
    }
}

/// Host failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// No node with this id exists in the document.
    NodeNotFound(String),
    /// The host cannot perform the operation.
    Unsupported(&'static str),
    /// A platform call failed; carries the platform's message.
    Js(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeNotFound(id) => write!(f, "no node with id {id:?}"),
            Self::Unsupported(msg) => write!(f, "unsupported: {msg}"),
            Self::Js(msg) => write!(f, "host call failed: {msg}"),
        }
    }
}

impl std::error::Error for HostError {}

/// Document operations used by the panel registry.
pub trait PanelHost {
    /// Whether a node with this id exists.
    fn contains_node(&self, id: &str) -> bool;

    /// Id of the first panel node (document order) bearing `class`.
    fn find_marked(&self, class: &str) -> Option<String>;

    /// Add a class marker to a node.
    fn add_class(&mut self, id: &str, class: &str) -> Result<(), HostError>;

    /// Remove a class marker from a node. Removing an absent class is not an
    /// error.
    fn remove_class(&mut self, id: &str, class: &str) -> Result<(), HostError>;

    /// Attach `handler` to `event` on `target`. Returns `false` when the
    /// target does not exist; the registry treats that as a silent skip.
    ///
    /// Attaching the same handler twice attaches it twice.
    fn listen(&mut self, target: &str, event: &str, handler: &Handler) -> bool;

    /// Detach one attachment of `handler` from `event` on `target`. Returns
    /// `false` when the target does not exist.
    fn unlisten(&mut self, target: &str, event: &str, handler: &Handler) -> bool;

    /// Start a keyframe animation on a node.
    fn animate(
        &mut self,
        id: &str,
        keyframes: &SlideKeyframes,
        duration: Duration,
    ) -> Result<AnimationId, HostError>;
}

impl<H: PanelHost + ?Sized> PanelHost for &mut H {
    fn contains_node(&self, id: &str) -> bool {
        (**self).contains_node(id)
    }

    fn find_marked(&self, class: &str) -> Option<String> {
        (**self).find_marked(class)
    }

    fn add_class(&mut self, id: &str, class: &str) -> Result<(), HostError> {
        (**self).add_class(id, class)
    }

    fn remove_class(&mut self, id: &str, class: &str) -> Result<(), HostError> {
        (**self).remove_class(id, class)
    }

    fn listen(&mut self, target: &str, event: &str, handler: &Handler) -> bool {
        (**self).listen(target, event, handler)
    }

    fn unlisten(&mut self, target: &str, event: &str, handler: &Handler) -> bool {
        (**self).unlisten(target, event, handler)
    }

    fn animate(
        &mut self,
        id: &str,
        keyframes: &SlideKeyframes,
        duration: Duration,
    ) -> Result<AnimationId, HostError> {
        (**self).animate(id, keyframes, duration)
    }
}
