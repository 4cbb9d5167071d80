#![forbid(unsafe_code)]

//! Core: panel registry, slide transitions, and the host boundary.
//!
//! # Role in SlidePanel
//! `slidepanel-core` owns the panel-switching state machine for a popup
//! window. A popup is made of full-size panels; exactly one is displayed at a
//! time and switching between them plays a short horizontal slide.
//!
//! # Primary responsibilities
//! - **PanelRegistry**: panel metadata (hooks, event bindings) and the
//!   activation transition.
//! - **PanelHost**: the document boundary (node lookup, class markers,
//!   listener wiring, keyframe animation).
//! - **SlideDirection / SlideKeyframes**: the canonical direction type and the
//!   keyframes it selects.
//! - **SlideAnimation**: a deterministic, tickable model of the slide, used by
//!   hosts that drive time themselves.
//!
//! # How it fits in the system
//! `slidepanel-web` implements [`PanelHost`] for a headless document and for
//! the browser DOM. `slidepanel-popup` registers the concrete panels and
//! routes user input into the registry.

pub mod animation;
pub mod binding;
pub mod config;
pub mod direction;
pub mod error;
pub mod host;
pub mod registry;
pub mod transition;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use binding::{Binding, Handler, PanelEvent};
pub use config::{ConfigError, PanelConfig};
pub use direction::{
    MAX_SLIDE_DISTANCE_PERCENT, SLIDE_FROM_LEFT, SLIDE_FROM_RIGHT, SlideDirection, SlideKeyframes,
};
pub use error::PanelError;
pub use host::{AnimationId, HostError, PanelHost};
pub use registry::{Activation, Hook, PanelEntry, PanelPhase, PanelRegistry, RegisterOptions};
pub use transition::{Settled, Transition};
