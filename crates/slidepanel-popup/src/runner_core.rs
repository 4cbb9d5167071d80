#![forbid(unsafe_code)]

//! Platform-independent popup core.
//!
//! Owns the host, the registry and the navigation queue. Shared between the
//! `wasm-bindgen` exports and native tests; no JS types here.

use std::time::Duration;

use serde::Serialize;
use slidepanel_core::{
    Activation, AnimationId, PanelConfig, PanelError, PanelHost, PanelRegistry, Settled,
    SlideDirection, Transition,
};
use slidepanel_web::HeadlessDocument;
use tracing::{debug, warn};

use crate::nav::{NavQueue, NavRequest};
use crate::panels::{self, MAIN_PANEL, SECOND_PANEL, Startup};

/// Result of draining the navigation queue.
#[derive(Debug, Default)]
pub struct Pumped {
    /// Transitions that started, in request order.
    pub started: Vec<Transition>,
    /// Requests the registry refused.
    pub rejected: Vec<(NavRequest, PanelError)>,
}

impl Pumped {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.started.is_empty() && self.rejected.is_empty()
    }
}

/// Per-panel row of a [`PopupSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelSnapshot {
    pub id: String,
    pub phase: &'static str,
    pub live: bool,
    pub bindings: usize,
}

/// Serializable view of the popup state, for the page script and for tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopupSnapshot {
    pub active: Option<String>,
    pub in_transition: bool,
    pub pending_animation: Option<u64>,
    pub panels: Vec<PanelSnapshot>,
}

/// The popup: both panels installed over host `H`.
pub struct PopupCore<H: PanelHost> {
    host: H,
    registry: PanelRegistry,
    queue: NavQueue,
}

impl<H: PanelHost> PopupCore<H> {
    /// Install the popup panels over `host`.
    pub fn new(host: H, config: PanelConfig, startup: Startup) -> Result<Self, PanelError> {
        Self::with_queue(host, config, startup, NavQueue::new())
    }

    /// Like [`new`](Self::new) with a caller-provided queue, so a notifier
    /// can be attached before any handler fires.
    pub fn with_queue(
        mut host: H,
        config: PanelConfig,
        startup: Startup,
        queue: NavQueue,
    ) -> Result<Self, PanelError> {
        let mut registry = PanelRegistry::with_config(config);
        panels::install(&mut registry, &mut host, &queue, startup)?;
        Ok(Self {
            host,
            registry,
            queue,
        })
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn registry(&self) -> &PanelRegistry {
        &self.registry
    }

    #[must_use]
    pub fn queue(&self) -> &NavQueue {
        &self.queue
    }

    #[must_use]
    pub fn active_panel(&self) -> Option<&str> {
        self.registry.active_panel()
    }

    #[must_use]
    pub fn in_transition(&self) -> bool {
        self.registry.in_transition()
    }

    /// Switch to `panel` now, bypassing the queue.
    pub fn navigate(
        &mut self,
        panel: &str,
        direction: SlideDirection,
    ) -> Result<Activation, PanelError> {
        self.registry.activate(&mut self.host, panel, direction)
    }

    pub fn go_forward(&mut self) -> Result<Activation, PanelError> {
        self.navigate(SECOND_PANEL, SlideDirection::FromRight)
    }

    pub fn go_back(&mut self) -> Result<Activation, PanelError> {
        self.navigate(MAIN_PANEL, SlideDirection::FromLeft)
    }

    /// Apply every queued navigation request, oldest first.
    ///
    /// A request that arrives while a slide is playing is rejected rather than
    /// deferred; the user clicks again once the panel has settled.
    pub fn pump(&mut self) -> Pumped {
        let mut pumped = Pumped::default();
        for request in self.queue.drain() {
            match self.navigate(&request.panel, request.direction) {
                Ok(Activation::Started(transition)) => pumped.started.push(transition),
                Ok(Activation::AlreadyActive) => {}
                Err(err) => {
                    warn!(panel = %request.panel, error = %err, "navigation rejected");
                    pumped.rejected.push((request, err));
                }
            }
        }
        pumped
    }

    /// Report a finished slide animation.
    pub fn finish(&mut self, animation: AnimationId) -> Result<Settled, PanelError> {
        let settled = self.registry.finish(&mut self.host, animation)?;
        debug!(from = %settled.from, to = %settled.to, "popup settled");
        Ok(settled)
    }

    #[must_use]
    pub fn snapshot(&self) -> PopupSnapshot {
        let panels = self
            .registry
            .ids()
            .into_iter()
            .filter_map(|id| {
                let entry = self.registry.entry(id)?;
                let phase = self.registry.phase(id)?;
                Some(PanelSnapshot {
                    id: id.to_string(),
                    phase: phase.as_str(),
                    live: entry.is_live(),
                    bindings: entry.bindings().len(),
                })
            })
            .collect();
        PopupSnapshot {
            active: self.registry.active_panel().map(str::to_string),
            in_transition: self.registry.in_transition(),
            pending_animation: self.registry.pending_animation().map(|a| a.0),
            panels,
        }
    }

    pub fn state_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.snapshot())
    }
}

impl PopupCore<HeadlessDocument> {
    /// Headless popup with the default markup: both panels and both buttons.
    pub fn headless(config: PanelConfig) -> Result<Self, PanelError> {
        let doc = HeadlessDocument::with_nodes([
            MAIN_PANEL,
            panels::FORWARD_BUTTON,
            SECOND_PANEL,
            panels::BACK_BUTTON,
        ]);
        Self::new(doc, config, Startup::Initial)
    }

    /// Fire `event` on `target`, then apply whatever the handlers requested.
    pub fn dispatch(&mut self, target: &str, event: &str) -> Pumped {
        self.host.dispatch(target, event);
        self.pump()
    }

    /// Advance the document clock and complete any slide that ended.
    pub fn tick(&mut self, dt: Duration) -> Result<Vec<Settled>, PanelError> {
        self.host.advance_and_finish(&mut self.registry, dt)
    }

    /// Play every running slide to its end.
    pub fn settle(&mut self) -> Result<Vec<Settled>, PanelError> {
        self.host.settle(&mut self.registry)
    }
}
