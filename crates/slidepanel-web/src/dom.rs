#![forbid(unsafe_code)]

//! Browser DOM host. Only compiled on `wasm32` targets.
//!
//! Handlers become JS closures attached with `addEventListener`. Each
//! `listen` creates a fresh closure, so attaching the same [`Handler`] twice
//! really attaches it twice, matching the headless document. Closures are kept
//! alive in a table keyed by `(target, event, handler)` until `unlisten`
//! detaches them.
//!
//! Slides use `Element.animate`. The `onfinish` callback forwards the
//! [`AnimationId`] to the completion sink given at construction, which is
//! expected to call `PanelRegistry::finish`.

use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use js_sys::{Array, Object, Reflect};
use slidepanel_core::{AnimationId, Handler, HostError, PanelEvent, PanelHost, SlideKeyframes};
use tracing::{trace, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

/// Selector prefix for panel nodes: direct `div` children of `body`.
pub const PANEL_SELECTOR: &str = "body > div";

type ListenerKey = (String, String, usize);
type EventClosure = Closure<dyn FnMut(web_sys::Event)>;

fn js_err(value: JsValue) -> HostError {
    HostError::Js(
        value
            .as_string()
            .unwrap_or_else(|| format!("{value:?}")),
    )
}

fn keyframes_to_js(keyframes: &SlideKeyframes) -> Array {
    let frames = Array::new();
    for transform in keyframes.css_transforms() {
        let frame = Object::new();
        let _ = Reflect::set(
            &frame,
            &JsValue::from_str("transform"),
            &JsValue::from_str(&transform),
        );
        frames.push(&frame);
    }
    frames
}

/// [`PanelHost`] over the live browser document.
pub struct DomHost {
    document: Document,
    listeners: HashMap<ListenerKey, Vec<EventClosure>>,
    on_finish: Rc<dyn Fn(AnimationId)>,
    next_animation: u64,
}

impl DomHost {
    /// Host over `window.document`. `on_finish` receives each completed
    /// animation id.
    pub fn new(on_finish: impl Fn(AnimationId) + 'static) -> Result<Self, HostError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or(HostError::Unsupported("no window.document"))?;
        Ok(Self::with_document(document, on_finish))
    }

    pub fn with_document(document: Document, on_finish: impl Fn(AnimationId) + 'static) -> Self {
        Self {
            document,
            listeners: HashMap::new(),
            on_finish: Rc::new(on_finish),
            next_animation: 0,
        }
    }

    fn element(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn require(&self, id: &str) -> Result<Element, HostError> {
        self.element(id)
            .ok_or_else(|| HostError::NodeNotFound(id.to_string()))
    }

    /// Fire a synthetic `event` on `target`. Returns `false` if a listener
    /// called `preventDefault`.
    pub fn dispatch(&self, target: &str, event: &str) -> Result<bool, HostError> {
        let element = self.require(target)?;
        let event = web_sys::Event::new(event).map_err(js_err)?;
        element.dispatch_event(&event).map_err(js_err)
    }

    /// Live closures across all targets.
    #[must_use]
    pub fn attached_closures(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }
}

impl PanelHost for DomHost {
    fn contains_node(&self, id: &str) -> bool {
        self.element(id).is_some()
    }

    fn find_marked(&self, class: &str) -> Option<String> {
        let selector = format!("{PANEL_SELECTOR}.{class}");
        match self.document.query_selector(&selector) {
            Ok(found) => found.map(|el| el.id()),
            Err(err) => {
                warn!(selector = %selector, error = ?err, "query_selector failed");
                None
            }
        }
    }

    fn add_class(&mut self, id: &str, class: &str) -> Result<(), HostError> {
        self.require(id)?.class_list().add_1(class).map_err(js_err)
    }

    fn remove_class(&mut self, id: &str, class: &str) -> Result<(), HostError> {
        self.require(id)?
            .class_list()
            .remove_1(class)
            .map_err(js_err)
    }

    fn listen(&mut self, target: &str, event: &str, handler: &Handler) -> bool {
        let Some(element) = self.element(target) else {
            return false;
        };
        let handler_for_js = handler.clone();
        let payload = PanelEvent::new(target, event);
        let closure = EventClosure::new(move |_event: web_sys::Event| {
            handler_for_js.call(&payload);
        });
        if let Err(err) =
            element.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        {
            warn!(node = target, event, error = ?err, "addEventListener failed");
            return true;
        }
        trace!(node = target, event, "dom listener attached");
        self.listeners
            .entry((target.to_string(), event.to_string(), handler.key()))
            .or_default()
            .push(closure);
        true
    }

    fn unlisten(&mut self, target: &str, event: &str, handler: &Handler) -> bool {
        let Some(element) = self.element(target) else {
            return false;
        };
        let key = (target.to_string(), event.to_string(), handler.key());
        let Some(closures) = self.listeners.get_mut(&key) else {
            return true;
        };
        if let Some(closure) = closures.pop() {
            if let Err(err) = element
                .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            {
                warn!(node = target, event, error = ?err, "removeEventListener failed");
            }
            trace!(node = target, event, "dom listener detached");
        }
        if closures.is_empty() {
            self.listeners.remove(&key);
        }
        true
    }

    fn animate(
        &mut self,
        id: &str,
        keyframes: &SlideKeyframes,
        duration: Duration,
    ) -> Result<AnimationId, HostError> {
        let element = self.require(id)?;
        let frames = keyframes_to_js(keyframes);
        let animation = element.animate_with_f64(Some(&*frames), duration.as_secs_f64() * 1000.0);

        self.next_animation += 1;
        let anim_id = AnimationId(self.next_animation);
        let sink = Rc::clone(&self.on_finish);
        let on_finish = Closure::once_into_js(move || sink(anim_id));
        animation.set_onfinish(Some(on_finish.unchecked_ref()));
        Ok(anim_id)
    }
}
