// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use dropline_core::{
    Data, DataTransfer, DragDropManager, Draggable, DropEffect, DropTarget, DropTargetRegistry,
    Input, NativeEvent, NativeEventKind,
};
use dropline_dom::{Document, ElementId, ElementNode};
use dropline_hitbox::{Edge, attach_closest_edge};
use kurbo::Rect;

/// A chain of `depth` nested boxes, each 1px inside its parent, all drop targets.
fn nested(depth: u32) -> (Document, DropTargetRegistry<()>, ElementId) {
    let mut doc = Document::new();
    let mut registry = DropTargetRegistry::new(DropEffect::Move);
    let mut parent = None;
    let mut innermost = None;
    for level in 0..depth {
        let inset = f64::from(level);
        let bounds = Rect::new(inset, inset, 1000. - inset, 1000. - inset);
        let element = doc
            .insert(parent, ElementNode::with_bounds(bounds))
            .expect("parent is alive");
        registry
            .register(DropTarget::<()>::new(element).get_data(|args| {
                attach_closest_edge(Data::new(), args.rect, args.input, &Edge::ALL)
            }))
            .expect("fresh element");
        parent = Some(element);
        innermost = Some(element);
    }
    (doc, registry, innermost.expect("depth > 0"))
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("dropline_resolve");
    for depth in [4_u32, 32, 256] {
        let (doc, registry, innermost) = nested(depth);
        let input = Input::at((500., 500.));
        group.bench_function(format!("fresh(depth={depth})"), |b| {
            b.iter(|| {
                black_box(registry.resolve(&doc, &(), Some(innermost), &input, &[]));
            });
        });
        let current = registry.resolve(&doc, &(), Some(innermost), &input, &[]);
        group.bench_function(format!("sticky(depth={depth})"), |b| {
            b.iter(|| {
                black_box(registry.resolve(&doc, &(), None, &input, &current));
            });
        });
    }
    group.finish();
}

fn bench_drag_over(c: &mut Criterion) {
    let mut group = c.benchmark_group("dropline_drag_over");
    let mut doc = Document::new();
    let list = doc
        .insert(None, ElementNode::with_bounds(Rect::new(0., 0., 300., 10_000.)))
        .expect("root insert");
    let mut cards = Vec::new();
    for i in 0..200 {
        let y = f64::from(i) * 50.;
        cards.push(
            doc.insert(Some(list), ElementNode::with_bounds(Rect::new(0., y, 300., y + 40.)))
                .expect("list is alive"),
        );
    }
    group.bench_function("200_cards", |b| {
        b.iter_batched(
            || {
                let mut manager = DragDropManager::new();
                for &card in &cards {
                    manager.element_mut().draggable(Draggable::new(card)).unwrap();
                    manager.element_mut().drop_target(DropTarget::new(card)).unwrap();
                }
                manager.element_mut().drop_target(DropTarget::new(list)).unwrap();
                let mut dt = DataTransfer::new();
                manager.handle(
                    &doc,
                    NativeEvent::new(NativeEventKind::DragStart, Input::at((10., 10.)))
                        .with_target(cards[0])
                        .with_data_transfer(&mut dt),
                );
                (manager, dt)
            },
            |(mut manager, mut dt)| {
                for step in 0..100 {
                    let y = f64::from(step) * 37.;
                    manager.handle(
                        &doc,
                        NativeEvent::new(NativeEventKind::DragOver, Input::at((150., y)))
                            .with_data_transfer(&mut dt),
                    );
                    manager.animation_frame();
                }
                black_box(manager);
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_resolve, bench_drag_over);
criterion_main!(benches);
