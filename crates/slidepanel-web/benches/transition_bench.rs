#![forbid(unsafe_code)]

//! Run with: `cargo bench -p slidepanel-web --bench transition_bench`

use std::hint::black_box;
use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};
use slidepanel_core::{Handler, PanelRegistry, RegisterOptions, SLIDE_FROM_LEFT, SLIDE_FROM_RIGHT};
use slidepanel_web::HeadlessDocument;

fn popup(bindings_per_panel: usize) -> (PanelRegistry, HeadlessDocument) {
    let mut doc = HeadlessDocument::with_nodes(["main_panel", "second_panel"]);
    for i in 0..bindings_per_panel {
        doc.insert_node(&format!("m{i}"));
        doc.insert_node(&format!("s{i}"));
    }
    let mut registry = PanelRegistry::new();
    registry
        .register(&mut doc, "main_panel", RegisterOptions::new().initial())
        .expect("main panel should register");
    registry
        .register(&mut doc, "second_panel", RegisterOptions::new())
        .expect("second panel should register");
    for i in 0..bindings_per_panel {
        registry
            .add_event(&mut doc, "main_panel", &format!("m{i}"), "click", Handler::new(|_| {}))
            .expect("binding on main panel");
        registry
            .add_event(&mut doc, "second_panel", &format!("s{i}"), "click", Handler::new(|_| {}))
            .expect("binding on second panel");
    }
    (registry, doc)
}

fn bench_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("panel/round_trip");

    for bindings in [1usize, 16, 128] {
        let (mut registry, mut doc) = popup(bindings);
        group.bench_function(format!("settle/{bindings}_bindings"), |b| {
            b.iter(|| {
                registry
                    .activate(&mut doc, "second_panel", SLIDE_FROM_RIGHT)
                    .expect("forward");
                black_box(doc.settle(&mut registry).expect("settle forward"));
                registry
                    .activate(&mut doc, "main_panel", SLIDE_FROM_LEFT)
                    .expect("back");
                black_box(doc.settle(&mut registry).expect("settle back"));
            });
        });
    }

    group.finish();
}

fn bench_frame_ticks(c: &mut Criterion) {
    let mut group = c.benchmark_group("panel/frame_ticks");
    let (mut registry, mut doc) = popup(4);
    let frame = Duration::from_micros(16_667);

    group.bench_function("slide_at_60hz", |b| {
        b.iter(|| {
            registry
                .activate(&mut doc, "second_panel", SLIDE_FROM_RIGHT)
                .expect("forward");
            while registry.in_transition() {
                black_box(doc.offset_of("second_panel"));
                doc.advance_and_finish(&mut registry, frame)
                    .expect("tick forward");
            }
            registry
                .activate(&mut doc, "main_panel", SLIDE_FROM_LEFT)
                .expect("back");
            doc.settle(&mut registry).expect("settle back");
        });
    });

    group.finish();
}

criterion_group!(benches, bench_round_trip, bench_frame_ticks);
criterion_main!(benches);
