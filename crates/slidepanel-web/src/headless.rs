#![forbid(unsafe_code)]

//! In-memory document for native runs and tests.
//!
//! [`HeadlessDocument`] models the part of the DOM the panel registry touches:
//! an ordered list of nodes, each with a class list and listener table, plus
//! running slide animations ticked by a [`DeterministicClock`].
//!
//! Time only moves when the caller calls [`HeadlessDocument::advance`]. That
//! returns the animations that completed, in start order; feeding them to
//! [`PanelRegistry::finish`] (or calling [`HeadlessDocument::settle`]) plays
//! the role of the browser's `onfinish` callback.
//!
//! # Invariants
//!
//! 1. Node order is insertion order and is the order `find_marked` searches.
//! 2. A listener table may hold the same handler several times; `unlisten`
//!    removes one attachment.
//! 3. Completed animations are removed before they are reported.

use std::collections::BTreeMap;
use std::time::Duration;

use slidepanel_core::animation::{Animation, SlideAnimation};
use slidepanel_core::{
    AnimationId, Handler, HostError, PanelError, PanelEvent, PanelHost, PanelRegistry, Settled,
    SlideKeyframes,
};
use tracing::{debug, trace};

use crate::DeterministicClock;

#[derive(Debug, Clone)]
struct Listener {
    event: String,
    handler: Handler,
}

#[derive(Debug, Clone)]
struct Node {
    id: String,
    classes: Vec<String>,
    listeners: Vec<Listener>,
}

impl Node {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            classes: Vec::new(),
            listeners: Vec::new(),
        }
    }
}

/// A slide animation running on a node.
#[derive(Debug, Clone)]
pub struct RunningAnimation {
    pub node: String,
    pub started_at: Duration,
    pub slide: SlideAnimation,
}

/// Host-driven document with a deterministic clock.
#[derive(Debug, Default)]
pub struct HeadlessDocument {
    clock: DeterministicClock,
    nodes: Vec<Node>,
    animations: BTreeMap<AnimationId, RunningAnimation>,
    next_animation: u64,
}

impl HeadlessDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document containing `ids`, in order.
    pub fn with_nodes<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut doc = Self::new();
        for id in ids {
            doc.insert_node(id.as_ref());
        }
        doc
    }

    /// Append a node. Returns `false` if the id already exists.
    pub fn insert_node(&mut self, id: &str) -> bool {
        if self.node(id).is_some() {
            return false;
        }
        self.nodes.push(Node::new(id));
        true
    }

    /// Detach a node together with its listeners and animations.
    ///
    /// Returns `None` if no such node exists, otherwise the ids of the
    /// animations that were running on it. Those animations never end, so a
    /// registry waiting on one stays in transition until the caller passes the
    /// id to `PanelRegistry::finish`. That settles the registry and then
    /// reports the marker that could not be cleared on the detached node.
    pub fn remove_node(&mut self, id: &str) -> Option<Vec<AnimationId>> {
        let index = self.nodes.iter().position(|n| n.id == id)?;
        self.nodes.remove(index);
        let orphaned: Vec<AnimationId> = self
            .animations
            .iter()
            .filter(|(_, anim)| anim.node == id)
            .map(|(animation, _)| *animation)
            .collect();
        for animation in &orphaned {
            self.animations.remove(animation);
        }
        if !orphaned.is_empty() {
            debug!(node = id, orphaned = orphaned.len(), "node removed mid-animation");
        }
        Some(orphaned)
    }

    fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    // -----------------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    #[must_use]
    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.node(id)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    /// Class list of a node, in insertion order.
    #[must_use]
    pub fn classes(&self, id: &str) -> Option<&[String]> {
        self.node(id).map(|n| n.classes.as_slice())
    }

    /// Ids of all nodes bearing `class`, in document order.
    #[must_use]
    pub fn nodes_with_class(&self, class: &str) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|n| n.classes.iter().any(|c| c == class))
            .map(|n| n.id.as_str())
            .collect()
    }

    /// Attachments of `event` on `target`.
    #[must_use]
    pub fn listener_count(&self, target: &str, event: &str) -> usize {
        self.node(target)
            .map_or(0, |n| n.listeners.iter().filter(|l| l.event == event).count())
    }

    /// Attachments across the whole document.
    #[must_use]
    pub fn total_listeners(&self) -> usize {
        self.nodes.iter().map(|n| n.listeners.len()).sum()
    }

    #[must_use]
    pub fn animation(&self, id: AnimationId) -> Option<&RunningAnimation> {
        self.animations.get(&id)
    }

    #[must_use]
    pub fn running_animations(&self) -> usize {
        self.animations.len()
    }

    /// Current slide offset of a node in percent, if it is animating.
    #[must_use]
    pub fn offset_of(&self, node: &str) -> Option<f32> {
        self.animations
            .values()
            .find(|a| a.node == node)
            .map(|a| a.slide.offset_percent())
    }

    // -----------------------------------------------------------------------
    // Driving
    // -----------------------------------------------------------------------

    /// Fire `event` on `target`, calling every attached handler in attachment
    /// order. Returns the number of handlers called.
    ///
    /// Handlers are snapshotted before the first call, so a handler that
    /// changes wiring affects the next dispatch, not this one.
    pub fn dispatch(&self, target: &str, event: &str) -> usize {
        let handlers: Vec<Handler> = self
            .node(target)
            .map(|n| {
                n.listeners
                    .iter()
                    .filter(|l| l.event == event)
                    .map(|l| l.handler.clone())
                    .collect()
            })
            .unwrap_or_default();
        let payload = PanelEvent::new(target, event);
        for handler in &handlers {
            handler.call(&payload);
        }
        trace!(node = target, event, handlers = handlers.len(), "dispatched");
        handlers.len()
    }

    /// Advance the clock and tick animations. Returns the animations that
    /// completed during this step, in start order.
    pub fn advance(&mut self, dt: Duration) -> Vec<AnimationId> {
        self.clock.advance(dt);
        for anim in self.animations.values_mut() {
            anim.slide.tick(dt);
        }
        let done: Vec<AnimationId> = self
            .animations
            .iter()
            .filter(|(_, a)| a.slide.is_complete())
            .map(|(id, _)| *id)
            .collect();
        for id in &done {
            self.animations.remove(id);
        }
        done
    }

    /// Advance by `dt` and report every completed animation to `registry`.
    pub fn advance_and_finish(
        &mut self,
        registry: &mut PanelRegistry,
        dt: Duration,
    ) -> Result<Vec<Settled>, PanelError> {
        let done = self.advance(dt);
        let mut settled = Vec::with_capacity(done.len());
        for id in done {
            settled.push(registry.finish(self, id)?);
        }
        Ok(settled)
    }

    /// Play all running animations to the end and report them to `registry`.
    pub fn settle(&mut self, registry: &mut PanelRegistry) -> Result<Vec<Settled>, PanelError> {
        let remaining = self
            .animations
            .values()
            .map(|a| a.slide.duration().saturating_sub(a.slide.elapsed()))
            .max()
            .unwrap_or(Duration::ZERO);
        if self.animations.is_empty() {
            return Ok(Vec::new());
        }
        self.advance_and_finish(registry, remaining)
    }
}

impl PanelHost for HeadlessDocument {
    fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    fn find_marked(&self, class: &str) -> Option<String> {
        self.nodes
            .iter()
            .find(|n| n.classes.iter().any(|c| c == class))
            .map(|n| n.id.clone())
    }

    fn add_class(&mut self, id: &str, class: &str) -> Result<(), HostError> {
        let node = self
            .node_mut(id)
            .ok_or_else(|| HostError::NodeNotFound(id.to_string()))?;
        if !node.classes.iter().any(|c| c == class) {
            node.classes.push(class.to_string());
        }
        Ok(())
    }

    fn remove_class(&mut self, id: &str, class: &str) -> Result<(), HostError> {
        let node = self
            .node_mut(id)
            .ok_or_else(|| HostError::NodeNotFound(id.to_string()))?;
        node.classes.retain(|c| c != class);
        Ok(())
    }

    fn listen(&mut self, target: &str, event: &str, handler: &Handler) -> bool {
        let Some(node) = self.node_mut(target) else {
            return false;
        };
        node.listeners.push(Listener {
            event: event.to_string(),
            handler: handler.clone(),
        });
        true
    }

    fn unlisten(&mut self, target: &str, event: &str, handler: &Handler) -> bool {
        let Some(node) = self.node_mut(target) else {
            return false;
        };
        if let Some(pos) = node
            .listeners
            .iter()
            .position(|l| l.event == event && l.handler.ptr_eq(handler))
        {
            node.listeners.remove(pos);
        }
        true
    }

    fn animate(
        &mut self,
        id: &str,
        keyframes: &SlideKeyframes,
        duration: Duration,
    ) -> Result<AnimationId, HostError> {
        if !self.contains_node(id) {
            return Err(HostError::NodeNotFound(id.to_string()));
        }
        self.next_animation += 1;
        let anim_id = AnimationId(self.next_animation);
        self.animations.insert(
            anim_id,
            RunningAnimation {
                node: id.to_string(),
                started_at: self.clock.now(),
                slide: SlideAnimation::new(*keyframes, duration),
            },
        );
        Ok(anim_id)
    }
}
