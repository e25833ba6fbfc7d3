// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::time::Duration;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use dropline_auto_scroll::{ElementAutoScroller, ScrollContainer, WindowScroll};
use dropline_core::{DataTransfer, DragDropManager, Draggable, Input, NativeEvent, NativeEventKind};
use dropline_dom::{Document, ElementNode};
use kurbo::{Rect, Size};

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("dropline_auto_scroll");
    for depth in [1_u32, 8, 64] {
        let mut doc = Document::new();
        doc.set_window_content_size(Size::new(1024., 1_000_000.));
        let mut scroller = ElementAutoScroller::default();
        scroller.window(WindowScroll::new());
        let mut parent = None;
        for _ in 0..depth {
            let element = doc
                .insert(
                    parent,
                    ElementNode::scroll_container(
                        Rect::new(0., 0., 400., 400.),
                        Size::new(400., 1_000_000.),
                    ),
                )
                .expect("parent is alive");
            scroller
                .container(ScrollContainer::new(element))
                .expect("fresh element");
            parent = Some(element);
        }
        let card = doc
            .insert(None, ElementNode::with_bounds(Rect::new(600., 100., 700., 140.)))
            .expect("root insert");
        let mut manager = DragDropManager::new();
        manager.element_mut().draggable(Draggable::new(card)).unwrap();
        let mut dt = DataTransfer::new();
        manager.handle(
            &doc,
            NativeEvent::new(NativeEventKind::DragStart, Input::at((650., 120.)))
                .with_target(card)
                .with_data_transfer(&mut dt),
        );
        manager.handle(
            &doc,
            NativeEvent::new(NativeEventKind::DragOver, Input::at((200., 390.)))
                .with_data_transfer(&mut dt),
        );
        manager.animation_frame();

        let mut now = Duration::ZERO;
        group.bench_function(format!("frame(nested={depth})"), |b| {
            b.iter(|| {
                now += Duration::from_millis(16);
                black_box(scroller.frame(&mut doc, manager.element_drag(), now));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_frame);
criterion_main!(benches);
