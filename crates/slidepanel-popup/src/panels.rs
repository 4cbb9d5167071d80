#![forbid(unsafe_code)]

//! The popup's panels and their buttons.

use slidepanel_core::{
    PanelError, PanelHost, PanelRegistry, RegisterOptions, SLIDE_FROM_LEFT, SLIDE_FROM_RIGHT,
};
use tracing::debug;

use crate::nav::NavQueue;

pub const MAIN_PANEL: &str = "main_panel";
pub const SECOND_PANEL: &str = "second_panel";
/// Button on the main panel that opens the second panel.
pub const FORWARD_BUTTON: &str = "forward";
/// Button on the second panel that returns to the main panel.
pub const BACK_BUTTON: &str = "back";
pub const CLICK: &str = "click";

/// How the first displayed panel is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Startup {
    /// Register [`MAIN_PANEL`] as the initial panel.
    #[default]
    Initial,
    /// Leave markers alone and adopt whichever panel the markup already marks
    /// active.
    AdoptMarked,
}

/// Register both panels and their button bindings.
///
/// Returns the panel that ended up active, if any. With
/// [`Startup::AdoptMarked`] and no pre-marked panel this is `None` and the
/// popup cannot navigate until one is marked.
pub fn install<H: PanelHost + ?Sized>(
    registry: &mut PanelRegistry,
    host: &mut H,
    queue: &NavQueue,
    startup: Startup,
) -> Result<Option<String>, PanelError> {
    let main = match startup {
        Startup::Initial => RegisterOptions::new().initial(),
        Startup::AdoptMarked => RegisterOptions::new(),
    };
    registry.register(host, MAIN_PANEL, main)?;
    registry.add_event(
        host,
        MAIN_PANEL,
        FORWARD_BUTTON,
        CLICK,
        queue.request_handler(SECOND_PANEL, SLIDE_FROM_RIGHT),
    )?;

    registry.register(host, SECOND_PANEL, RegisterOptions::new())?;
    registry.add_event(
        host,
        SECOND_PANEL,
        BACK_BUTTON,
        CLICK,
        queue.request_handler(MAIN_PANEL, SLIDE_FROM_LEFT),
    )?;

    let active = match startup {
        Startup::Initial => registry.active_panel().map(str::to_string),
        Startup::AdoptMarked => registry.adopt_active(host)?,
    };
    debug!(?startup, active = ?active, "popup panels installed");
    Ok(active)
}
