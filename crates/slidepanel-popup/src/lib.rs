#![forbid(unsafe_code)]

//! The extension popup.
//!
//! Two panels: `main_panel` (initial, with a `forward` button) and
//! `second_panel` (with a `back` button). Button handlers do not touch the
//! registry themselves; they push a [`nav::NavRequest`] onto a
//! [`nav::NavQueue`] and [`runner_core::PopupCore`] drains it once the event
//! has been dispatched.
//!
//! On `wasm32` the crate exports `PopupApp` for the popup page's script.

pub mod nav;
pub mod panels;
pub mod runner_core;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::PopupApp;

pub use nav::{NavQueue, NavRequest};
pub use panels::Startup;
pub use runner_core::{PopupCore, PopupSnapshot, Pumped};
