#![forbid(unsafe_code)]

//! `slidepanel-web` provides [`PanelHost`](slidepanel_core::PanelHost)
//! implementations.
//!
//! Design goals:
//! - **Host-driven time**: [`HeadlessDocument`] advances a monotonic clock
//!   explicitly, so transitions settle exactly when the caller says.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//! - **Same contract in both worlds**: the browser [`dom::DomHost`] and the
//!   headless document wire listeners and markers identically, so behavior
//!   verified natively carries over to the popup.

pub mod headless;

#[cfg(target_arch = "wasm32")]
pub mod dom;

use core::time::Duration;

pub use headless::HeadlessDocument;

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Current monotonic time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}
