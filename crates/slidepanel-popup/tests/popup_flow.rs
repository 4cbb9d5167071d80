#![forbid(unsafe_code)]

//! Click-driven navigation through the popup over a headless document.
//!
//! Run:
//!   cargo test -p slidepanel-popup --test popup_flow

use std::time::Duration;

use pretty_assertions::assert_eq;
use slidepanel_core::PanelConfig;
use slidepanel_popup::panels::{BACK_BUTTON, CLICK, FORWARD_BUTTON, MAIN_PANEL, SECOND_PANEL};
use slidepanel_popup::{PopupCore, Startup};
use slidepanel_web::HeadlessDocument;

const FRAME: Duration = Duration::from_millis(16);

fn run_until_settled(core: &mut PopupCore<HeadlessDocument>) -> usize {
    let mut frames = 0;
    while core.in_transition() {
        core.tick(FRAME).unwrap();
        frames += 1;
    }
    frames
}

#[test]
fn forward_and_back_by_clicks() {
    let mut core = PopupCore::headless(PanelConfig::default()).unwrap();
    assert_eq!(core.active_panel(), Some(MAIN_PANEL));

    core.dispatch(FORWARD_BUTTON, CLICK);
    // 180 ms at 16 ms per frame.
    assert_eq!(run_until_settled(&mut core), 12);
    assert_eq!(core.active_panel(), Some(SECOND_PANEL));
    assert_eq!(core.host().nodes_with_class("active"), vec![SECOND_PANEL]);

    core.dispatch(BACK_BUTTON, CLICK);
    run_until_settled(&mut core);
    assert_eq!(core.active_panel(), Some(MAIN_PANEL));
    assert_eq!(core.host().listener_count(FORWARD_BUTTON, CLICK), 1);
    assert_eq!(core.host().listener_count(BACK_BUTTON, CLICK), 0);
}

#[test]
fn clicks_mid_slide_are_ignored() {
    let mut core = PopupCore::headless(PanelConfig::default()).unwrap();
    core.dispatch(FORWARD_BUTTON, CLICK);
    core.tick(Duration::from_millis(90)).unwrap();

    assert!(core.dispatch(FORWARD_BUTTON, CLICK).is_empty());
    assert!(core.dispatch(BACK_BUTTON, CLICK).is_empty());
    assert!(core.queue().is_empty());

    core.settle().unwrap();
    assert_eq!(core.active_panel(), Some(SECOND_PANEL));
}

#[test]
fn toml_config_changes_markers_and_timing() {
    let config = PanelConfig::from_toml_str(
        r#"
active_class = "shown"
entering_class = "sliding"
slide_duration_ms = 64
slide_distance_percent = 50
"#,
    )
    .unwrap()
    .validated()
    .unwrap();
    let mut core = PopupCore::headless(config).unwrap();
    assert!(core.host().has_class(MAIN_PANEL, "shown"));

    core.dispatch(FORWARD_BUTTON, CLICK);
    assert!(core.host().has_class(SECOND_PANEL, "sliding"));
    assert_eq!(core.host().offset_of(SECOND_PANEL), Some(50.0));
    assert_eq!(run_until_settled(&mut core), 4);
    assert_eq!(core.host().nodes_with_class("shown"), vec![SECOND_PANEL]);
    assert!(core.host().nodes_with_class("sliding").is_empty());
}

#[test]
fn adopted_markup_starts_on_marked_panel() {
    use slidepanel_core::PanelHost;

    let mut doc =
        HeadlessDocument::with_nodes([MAIN_PANEL, FORWARD_BUTTON, SECOND_PANEL, BACK_BUTTON]);
    doc.add_class(SECOND_PANEL, "active").unwrap();
    let mut core = PopupCore::new(doc, PanelConfig::default(), Startup::AdoptMarked).unwrap();
    assert_eq!(core.active_panel(), Some(SECOND_PANEL));

    core.dispatch(BACK_BUTTON, CLICK);
    core.settle().unwrap();
    assert_eq!(core.active_panel(), Some(MAIN_PANEL));
}

#[test]
fn state_json_tracks_navigation() {
    let mut core = PopupCore::headless(PanelConfig::default()).unwrap();
    core.dispatch(FORWARD_BUTTON, CLICK);
    core.settle().unwrap();

    let state: serde_json::Value = serde_json::from_str(&core.state_json().unwrap()).unwrap();
    assert_eq!(state["active"], SECOND_PANEL);
    assert_eq!(state["pending_animation"], serde_json::Value::Null);
    assert_eq!(state["panels"][1]["id"], SECOND_PANEL);
    assert_eq!(state["panels"][1]["live"], true);
}
