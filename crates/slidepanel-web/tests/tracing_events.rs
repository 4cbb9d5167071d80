#![forbid(unsafe_code)]

//! Tracing spans and events emitted while switching panels.
//!
//! Run:
//!   cargo test -p slidepanel-web --test tracing_events

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use slidepanel_core::{Handler, PanelRegistry, RegisterOptions, SLIDE_FROM_RIGHT};
use slidepanel_web::HeadlessDocument;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Capture layer
// ============================================================================

#[derive(Debug, Clone)]
struct CapturedSpan {
    name: String,
    fields: HashMap<String, String>,
    parent_name: Option<String>,
}

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    message: String,
    fields: HashMap<String, String>,
    parent_span_name: Option<String>,
}

#[derive(Clone, Default)]
struct Capture {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl Capture {
    fn spans(&self) -> Vec<CapturedSpan> {
        self.spans.lock().unwrap().clone()
    }

    fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }

    fn event(&self, message: &str) -> CapturedEvent {
        self.events()
            .into_iter()
            .find(|e| e.message == message)
            .unwrap_or_else(|| panic!("no event {message:?} in {:#?}", self.events()))
    }
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for Capture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);
        let parent_name = ctx
            .current_span()
            .id()
            .and_then(|pid| ctx.span(pid))
            .map(|span_ref| span_ref.name().to_string());
        self.spans.lock().unwrap().push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            fields: visitor.0.into_iter().collect(),
            parent_name,
        });
    }

    fn on_event(&self, event: &tracing::Event<'_>, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.get("message").cloned().unwrap_or_default();
        let parent_span_name = ctx
            .current_span()
            .id()
            .and_then(|id| ctx.span(id))
            .map(|span_ref| span_ref.name().to_string());
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message,
            fields,
            parent_span_name,
        });
    }
}

fn captured<F: FnOnce()>(f: F) -> Capture {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::TRACE)
        .with(capture.clone());
    tracing::subscriber::with_default(subscriber, f);
    capture
}

fn switch_once() {
    let mut doc = HeadlessDocument::with_nodes(["main_panel", "second_panel", "back"]);
    let mut registry = PanelRegistry::new();
    registry
        .register(&mut doc, "main_panel", RegisterOptions::new().initial())
        .unwrap();
    registry
        .register(&mut doc, "second_panel", RegisterOptions::new())
        .unwrap();
    registry
        .add_event(&mut doc, "second_panel", "back", "click", Handler::new(|_| {}))
        .unwrap();
    registry
        .activate(&mut doc, "second_panel", SLIDE_FROM_RIGHT)
        .unwrap();
    doc.settle(&mut registry).unwrap();
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn activate_span_carries_panel_and_direction() {
    let capture = captured(switch_once);
    let spans = capture.spans();
    let activate = spans
        .iter()
        .find(|s| s.name == "panel.activate")
        .expect("panel.activate span should exist");
    assert!(activate.parent_name.is_none());
    assert_eq!(activate.fields.get("panel").map(String::as_str), Some("second_panel"));
    assert_eq!(
        activate.fields.get("direction").map(String::as_str),
        Some("from_right")
    );
}

#[test]
fn finish_span_names_both_panels() {
    let capture = captured(switch_once);
    let spans = capture.spans();
    let finish = spans
        .iter()
        .find(|s| s.name == "panel.finish")
        .expect("panel.finish span should exist");
    assert_eq!(finish.fields.get("from").map(String::as_str), Some("main_panel"));
    assert_eq!(finish.fields.get("to").map(String::as_str), Some("second_panel"));
}

#[test]
fn started_and_settled_events_nest_under_their_spans() {
    let capture = captured(switch_once);

    let started = capture.event("transition started");
    assert_eq!(started.level, tracing::Level::DEBUG);
    assert_eq!(started.parent_span_name.as_deref(), Some("panel.activate"));
    assert_eq!(started.fields.get("to").map(String::as_str), Some("second_panel"));
    assert_eq!(started.fields.get("animation").map(String::as_str), Some("anim#1"));

    let settled = capture.event("transition settled");
    assert_eq!(settled.level, tracing::Level::DEBUG);
    assert_eq!(settled.parent_span_name.as_deref(), Some("panel.finish"));
}

#[test]
fn bindings_are_wired_inside_finish() {
    let capture = captured(switch_once);
    let wired = capture.event("binding wired");
    assert_eq!(wired.level, tracing::Level::TRACE);
    assert_eq!(wired.parent_span_name.as_deref(), Some("panel.finish"));
    assert_eq!(wired.fields.get("node").map(String::as_str), Some("back"));
    assert_eq!(wired.fields.get("event").map(String::as_str), Some("click"));
}

#[test]
fn noop_activation_logs_no_transition() {
    let capture = captured(|| {
        let mut doc = HeadlessDocument::with_nodes(["main_panel"]);
        let mut registry = PanelRegistry::new();
        registry
            .register(&mut doc, "main_panel", RegisterOptions::new().initial())
            .unwrap();
        registry
            .activate(&mut doc, "main_panel", SLIDE_FROM_RIGHT)
            .unwrap();
    });
    let events = capture.events();
    assert!(events.iter().any(|e| e.message == "already active"));
    assert!(!events.iter().any(|e| e.message == "transition started"));
}
