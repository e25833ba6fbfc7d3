// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hitbox data flowing through a real element drag.

use std::cell::RefCell;
use std::rc::Rc;

use dropline_core::{
    DataTransfer, DragDropManager, Draggable, DropTarget, Input, Monitor, NativeEvent,
    NativeEventKind, reorder,
};
use dropline_dom::{Document, ElementId, ElementNode};
use dropline_hitbox::list_item::{self, Availability, ListItemOptions, Operation};
use dropline_hitbox::{
    Axis, Edge, ReorderDestination, attach_closest_edge, extract_closest_edge,
    get_reorder_destination_index,
};
use kurbo::Rect;

fn cards(doc: &mut Document) -> Vec<ElementId> {
    (0..3)
        .map(|i| {
            let top = f64::from(i) * 50.;
            doc.insert(None, ElementNode::with_bounds(Rect::new(0., top, 300., top + 40.)))
                .unwrap()
        })
        .collect()
}

fn drag(manager: &mut DragDropManager, doc: &Document, from: ElementId, to: (f64, f64)) {
    let mut dt = DataTransfer::new();
    manager.handle(
        doc,
        NativeEvent::new(NativeEventKind::DragStart, Input::at((10., 10.)))
            .with_target(from)
            .with_data_transfer(&mut dt),
    );
    manager.animation_frame();
    manager.handle(
        doc,
        NativeEvent::new(NativeEventKind::DragOver, Input::at(to)).with_data_transfer(&mut dt),
    );
    manager.handle(
        doc,
        NativeEvent::new(NativeEventKind::Drop, Input::at(to)).with_data_transfer(&mut dt),
    );
}

#[test]
fn closest_edge_drives_a_list_reorder() {
    let mut doc = Document::new();
    let ids = cards(&mut doc);
    let items = Rc::new(RefCell::new(vec!["a", "b", "c"]));

    let mut manager = DragDropManager::new();
    for (index, &id) in ids.iter().enumerate() {
        manager
            .element_mut()
            .draggable(Draggable::new(id).get_initial_data(move |_| {
                dropline_core::Data::new().with("index", index)
            }))
            .unwrap();
        manager
            .element_mut()
            .drop_target(DropTarget::new(id).get_data(move |args| {
                attach_closest_edge(
                    dropline_core::Data::new().with("index", index),
                    args.rect,
                    args.input,
                    &[Edge::Top, Edge::Bottom],
                )
            }))
            .unwrap();
    }
    let seen = items.clone();
    manager.element_mut().monitor(Monitor::<dropline_core::ElementSource>::new().on_drop(move |payload| {
        let Some(target) = payload.location.current.innermost() else {
            return;
        };
        let start_index = usize::try_from(payload.source.data.get_int("index").unwrap()).unwrap();
        let index_of_target = usize::try_from(target.data.get_int("index").unwrap()).unwrap();
        let finish = get_reorder_destination_index(ReorderDestination {
            start_index,
            index_of_target,
            closest_edge_of_target: extract_closest_edge(&target.data),
            axis: Axis::Vertical,
        });
        let next = reorder(&seen.borrow(), start_index, finish);
        *seen.borrow_mut() = next;
    }));

    // Lower half of the last card.
    drag(&mut manager, &doc, ids[0], (10., 135.));
    assert_eq!(*items.borrow(), ["b", "c", "a"]);

    // Upper half of the first card.
    drag(&mut manager, &doc, ids[2], (10., 5.));
    assert_eq!(*items.borrow(), ["a", "b", "c"]);
}

#[test]
fn list_item_instruction_is_visible_to_drop_callbacks() {
    let mut doc = Document::new();
    let ids = cards(&mut doc);
    let dropped: Rc<RefCell<Option<Operation>>> = Rc::default();

    let mut manager = DragDropManager::new();
    manager.element_mut().draggable(Draggable::new(ids[0])).unwrap();
    let options = ListItemOptions::reorder().with_combine(Availability::Available);
    let sink = dropped.clone();
    manager
        .element_mut()
        .drop_target(
            DropTarget::new(ids[1])
                .get_data(move |args| {
                    list_item::attach_instruction(
                        dropline_core::Data::new(),
                        args.rect,
                        args.input,
                        &options,
                    )
                })
                .on_drop(move |event| {
                    *sink.borrow_mut() =
                        list_item::extract_instruction(&event.this.data).map(|i| i.operation);
                }),
        )
        .unwrap();

    // Card B spans y 50..90; 70 is in its middle half.
    drag(&mut manager, &doc, ids[0], (10., 70.));
    assert_eq!(*dropped.borrow(), Some(Operation::Combine));
}
