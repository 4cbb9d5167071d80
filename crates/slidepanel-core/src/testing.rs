#![forbid(unsafe_code)]

//! Call-recording host for tests.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::binding::Handler;
use crate::direction::SlideKeyframes;
use crate::host::{AnimationId, HostError, PanelHost};

/// One recorded host call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    AddClass(String, String),
    RemoveClass(String, String),
    Listen(String, String),
    Unlisten(String, String),
    Animate(String, SlideKeyframes, Duration),
}

/// A flat node list with class sets and listener counts. Animations never
/// complete on their own; tests call `PanelRegistry::finish` explicitly.
#[derive(Debug, Default)]
pub struct RecordingHost {
    nodes: Vec<String>,
    classes: HashMap<String, HashSet<String>>,
    listeners: Vec<(String, String, usize)>,
    calls: Vec<HostCall>,
    next_animation: u64,
    animate_error: Option<HostError>,
    class_error: Option<(String, HostError)>,
}

impl RecordingHost {
    /// Create a host whose document contains `nodes`, in order.
    pub fn with_nodes<I, S>(nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            nodes: nodes.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Make every later `animate` call fail with `err`.
    pub fn fail_animations(&mut self, err: HostError) {
        self.animate_error = Some(err);
    }

    /// Make every later `add_class` of `class` fail with `err`.
    pub fn fail_add_class(&mut self, class: &str, err: HostError) {
        self.class_error = Some((class.to_string(), err));
    }

    #[must_use]
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    #[must_use]
    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.classes.get(id).is_some_and(|set| set.contains(class))
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn listeners_on(&self, target: &str, event: &str) -> usize {
        self.listeners
            .iter()
            .filter(|(t, e, _)| t == target && e == event)
            .count()
    }
}

impl PanelHost for RecordingHost {
    fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n == id)
    }

    fn find_marked(&self, class: &str) -> Option<String> {
        self.nodes
            .iter()
            .find(|n| self.has_class(n, class))
            .cloned()
    }

    fn add_class(&mut self, id: &str, class: &str) -> Result<(), HostError> {
        self.calls
            .push(HostCall::AddClass(id.to_string(), class.to_string()));
        if !self.contains_node(id) {
            return Err(HostError::NodeNotFound(id.to_string()));
        }
        if let Some((failing, err)) = &self.class_error {
            if failing == class {
                return Err(err.clone());
            }
        }
        self.classes
            .entry(id.to_string())
            .or_default()
            .insert(class.to_string());
        Ok(())
    }

    fn remove_class(&mut self, id: &str, class: &str) -> Result<(), HostError> {
        self.calls
            .push(HostCall::RemoveClass(id.to_string(), class.to_string()));
        if !self.contains_node(id) {
            return Err(HostError::NodeNotFound(id.to_string()));
        }
        if let Some(set) = self.classes.get_mut(id) {
            set.remove(class);
        }
        Ok(())
    }

    fn listen(&mut self, target: &str, event: &str, handler: &Handler) -> bool {
        self.calls
            .push(HostCall::Listen(target.to_string(), event.to_string()));
        if !self.contains_node(target) {
            return false;
        }
        self.listeners
            .push((target.to_string(), event.to_string(), handler.key()));
        true
    }

    fn unlisten(&mut self, target: &str, event: &str, handler: &Handler) -> bool {
        self.calls
            .push(HostCall::Unlisten(target.to_string(), event.to_string()));
        if !self.contains_node(target) {
            return false;
        }
        let key = handler.key();
        if let Some(pos) = self
            .listeners
            .iter()
            .position(|(t, e, k)| t == target && e == event && *k == key)
        {
            self.listeners.remove(pos);
        }
        true
    }

    fn animate(
        &mut self,
        id: &str,
        keyframes: &SlideKeyframes,
        duration: Duration,
    ) -> Result<AnimationId, HostError> {
        self.calls
            .push(HostCall::Animate(id.to_string(), *keyframes, duration));
        if let Some(err) = self.animate_error.clone() {
            return Err(err);
        }
        self.next_animation += 1;
        Ok(AnimationId(self.next_animation))
    }
}
