// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end lifecycle tests for the native and pointer drag bridges.

use std::cell::RefCell;
use std::rc::Rc;

use dropline_core::preview::center_under_pointer;
use dropline_core::{
    Cleanup, DataTransfer, DataTransferMode, DragDropManager, DragKind, Draggable, DropEffect,
    DropTarget, ELEMENT_DRAG_MARKER, Input, Monitor, NativeEvent, NativeEventKind, NativeFile,
    PointerDragBridge, PointerDragConfig,
};
use dropline_dom::{Document, ElementId, ElementNode};
use kurbo::{Rect, Size};

type Log = Rc<RefCell<Vec<String>>>;

fn logger(log: &Log, entry: &'static str) -> impl Fn() + 'static {
    let log = log.clone();
    move || log.borrow_mut().push(entry.to_owned())
}

struct Board {
    doc: Document,
    list: ElementId,
    card_a: ElementId,
    card_b: ElementId,
    outside: ElementId,
}

fn board() -> Board {
    let mut doc = Document::new();
    let list = doc
        .insert(None, ElementNode::with_bounds(Rect::new(0., 0., 300., 300.)))
        .unwrap();
    let card_a = doc
        .insert(Some(list), ElementNode::with_bounds(Rect::new(0., 0., 300., 50.)))
        .unwrap();
    let card_b = doc
        .insert(Some(list), ElementNode::with_bounds(Rect::new(0., 60., 300., 110.)))
        .unwrap();
    let outside = doc
        .insert(None, ElementNode::with_bounds(Rect::new(400., 0., 500., 100.)))
        .unwrap();
    Board {
        doc,
        list,
        card_a,
        card_b,
        outside,
    }
}

fn event<'a>(kind: NativeEventKind, x: f64, y: f64) -> NativeEvent<'a> {
    NativeEvent::new(kind, Input::at((x, y)))
}

fn start_drag(manager: &mut DragDropManager, b: &Board, dt: &mut DataTransfer) {
    let response = manager.handle(
        &b.doc,
        event(NativeEventKind::DragStart, 10., 10.)
            .with_target(b.card_a)
            .with_data_transfer(dt),
    );
    assert!(!response.default_prevented, "drag start was refused");
    assert_eq!(manager.active_kind(), Some(DragKind::Element));
}

/// Registers a draggable on card A, drop targets on the list and card B, and a monitor.
fn logged_manager(b: &Board, log: &Log) -> DragDropManager {
    let mut manager = DragDropManager::new();
    let (l1, l2, l3, l4, l5) = (
        logger(log, "source:preview"),
        logger(log, "source:start"),
        logger(log, "source:change"),
        log.clone(),
        logger(log, "source:drop"),
    );
    manager
        .element_mut()
        .draggable(
            Draggable::new(b.card_a)
                .on_generate_drag_preview(move |_| l1())
                .on_drag_start(move |_| l2())
                .on_drop_target_change(move |_| l3())
                .on_drag(move |p| {
                    l4.borrow_mut()
                        .push(format!("source:drag@{}", p.location.current.input.client.y));
                })
                .on_drop(move |_| l5()),
        )
        .unwrap();

    let (t1, t2, t3, t4, t5) = (
        logger(log, "list:preview"),
        logger(log, "list:start"),
        logger(log, "list:enter"),
        logger(log, "list:leave"),
        logger(log, "list:drop"),
    );
    manager
        .element_mut()
        .drop_target(
            DropTarget::new(b.list)
                .on_generate_drag_preview(move |_| t1())
                .on_drag_start(move |_| t2())
                .on_drag_enter(move |_| t3())
                .on_drag_leave(move |_| t4())
                .on_drop(move |_| t5()),
        )
        .unwrap();

    let (b1, b2, b3) = (
        logger(log, "b:enter"),
        logger(log, "b:leave"),
        logger(log, "b:drop"),
    );
    manager
        .element_mut()
        .drop_target(
            DropTarget::new(b.card_b)
                .on_drag_enter(move |_| b1())
                .on_drag_leave(move |_| b2())
                .on_drop(move |_| b3()),
        )
        .unwrap();

    let (m1, m2, m3) = (
        logger(log, "monitor:preview"),
        logger(log, "monitor:start"),
        log.clone(),
    );
    manager.element_mut().monitor(
        Monitor::new()
            .on_generate_drag_preview(move |_| m1())
            .on_drag_start(move |_| m2())
            .on_drop(move |p| {
                m3.borrow_mut().push(format!(
                    "monitor:drop[{}]",
                    p.location.current.drop_targets.len()
                ));
            }),
    );
    manager
}

#[test]
fn full_lifecycle_is_ordered_source_targets_monitors() {
    let b = board();
    let log: Log = Rc::default();
    let mut manager = logged_manager(&b, &log);
    let mut dt = DataTransfer::new();

    start_drag(&mut manager, &b, &mut dt);
    assert!(dt.has_type(ELEMENT_DRAG_MARKER));
    manager.animation_frame();
    dt.set_mode(DataTransferMode::Protected);
    manager.handle(
        &b.doc,
        event(NativeEventKind::DragOver, 10., 80.).with_data_transfer(&mut dt),
    );
    manager.handle(
        &b.doc,
        event(NativeEventKind::DragOver, 10., 90.).with_data_transfer(&mut dt),
    );
    manager.animation_frame();
    dt.set_mode(DataTransferMode::ReadOnly);
    let dropped = manager.handle(
        &b.doc,
        event(NativeEventKind::Drop, 10., 90.).with_data_transfer(&mut dt),
    );
    manager.handle(&b.doc, event(NativeEventKind::DragEnd, 10., 90.));

    assert!(dropped.default_prevented);
    assert_eq!(dropped.drop_effect, Some(DropEffect::Move));
    assert!(!manager.is_dragging());
    assert_eq!(
        *log.borrow(),
        [
            "source:preview",
            "list:preview",
            "monitor:preview",
            "source:start",
            "list:start",
            "monitor:start",
            "source:change",
            "b:enter",
            "source:drag@90",
            "source:drop",
            "b:drop",
            "list:drop",
            "monitor:drop[2]",
        ]
    );
}

#[test]
fn drag_start_is_deferred_until_the_next_frame() {
    let b = board();
    let log: Log = Rc::default();
    let mut manager = logged_manager(&b, &log);
    let mut dt = DataTransfer::new();
    start_drag(&mut manager, &b, &mut dt);
    assert!(!log.borrow().contains(&"source:start".to_owned()));
    assert!(manager.element_drag().unwrap().is_start_pending);
    manager.animation_frame();
    assert!(log.borrow().contains(&"source:start".to_owned()));
    assert!(!manager.element_drag().unwrap().is_start_pending);
}

#[test]
fn every_drag_gets_a_new_serial() {
    let b = board();
    let mut manager = DragDropManager::new();
    manager
        .element_mut()
        .draggable(Draggable::new(b.card_a))
        .unwrap();
    let mut dt = DataTransfer::new();
    start_drag(&mut manager, &b, &mut dt);
    let first = manager.element_drag().unwrap().serial;
    manager.handle(&b.doc, event(NativeEventKind::DragEnd, 10., 10.));
    assert!(!manager.is_dragging());

    let mut dt = DataTransfer::new();
    start_drag(&mut manager, &b, &mut dt);
    assert_ne!(manager.element_drag().unwrap().serial, first);
}

#[test]
fn dragend_cancels_and_leaves_every_target() {
    let b = board();
    let log: Log = Rc::default();
    let mut manager = logged_manager(&b, &log);
    let mut dt = DataTransfer::new();
    start_drag(&mut manager, &b, &mut dt);
    manager.handle(&b.doc, event(NativeEventKind::DragOver, 10., 80.));
    log.borrow_mut().clear();

    manager.handle(&b.doc, event(NativeEventKind::DragEnd, 10., 80.));
    assert!(!manager.is_dragging());
    assert_eq!(
        *log.borrow(),
        [
            "source:change",
            "b:leave",
            "list:leave",
            "source:drop",
            "monitor:drop[0]"
        ]
    );
}

#[test]
fn drop_without_targets_cancels() {
    let b = board();
    let log: Log = Rc::default();
    let mut manager = logged_manager(&b, &log);
    let mut dt = DataTransfer::new();
    start_drag(&mut manager, &b, &mut dt);
    manager.handle(&b.doc, event(NativeEventKind::DragOver, 450., 50.));
    let response = manager.handle(&b.doc, event(NativeEventKind::Drop, 450., 50.));
    assert!(!response.default_prevented);
    assert!(!manager.is_dragging());
    assert_eq!(log.borrow().last().map(String::as_str), Some("monitor:drop[0]"));
}

#[test]
fn pointer_events_during_a_drag_mean_it_was_lost() {
    let b = board();
    let log: Log = Rc::default();
    let mut manager = logged_manager(&b, &log);
    let mut dt = DataTransfer::new();
    start_drag(&mut manager, &b, &mut dt);
    manager.handle(&b.doc, event(NativeEventKind::PointerMove, 20., 20.));
    assert!(!manager.is_dragging());
    assert_eq!(log.borrow().last().map(String::as_str), Some("monitor:drop[0]"));
}

#[test]
fn related_dragleave_is_ignored_but_leaving_the_window_clears_targets() {
    let b = board();
    let log: Log = Rc::default();
    let mut manager = logged_manager(&b, &log);
    let mut dt = DataTransfer::new();
    start_drag(&mut manager, &b, &mut dt);
    manager.handle(&b.doc, event(NativeEventKind::DragOver, 10., 80.));

    manager.handle(
        &b.doc,
        event(NativeEventKind::DragLeave, 10., 80.)
            .with_target(b.card_b)
            .with_related_target(b.list),
    );
    assert_eq!(manager.element_drag().unwrap().current.drop_targets.len(), 2);

    manager.handle(&b.doc, event(NativeEventKind::DragLeave, 10., 80.).with_target(b.list));
    assert!(manager.is_dragging(), "element drags survive leaving the window");
    assert!(manager.element_drag().unwrap().current.drop_targets.is_empty());
    assert!(log.borrow().contains(&"list:leave".to_owned()));
}

#[test]
fn can_drag_refusal_prevents_the_native_drag() {
    let b = board();
    let mut manager = DragDropManager::new();
    manager
        .element_mut()
        .draggable(Draggable::new(b.card_a).can_drag(|_| false))
        .unwrap();
    let response = manager.handle(
        &b.doc,
        event(NativeEventKind::DragStart, 10., 10.).with_target(b.card_a),
    );
    assert!(response.default_prevented);
    assert!(!manager.is_dragging());
}

#[test]
fn drag_handle_uses_the_pressed_element() {
    let mut b = board();
    let handle = b
        .doc
        .insert(Some(b.card_a), ElementNode::with_bounds(Rect::new(0., 0., 20., 50.)))
        .unwrap();
    let mut manager = DragDropManager::new();
    manager
        .element_mut()
        .draggable(Draggable::new(b.card_a).drag_handle(handle))
        .unwrap();

    manager.handle(&b.doc, event(NativeEventKind::PointerDown, 100., 10.));
    let refused = manager.handle(
        &b.doc,
        event(NativeEventKind::DragStart, 100., 10.).with_target(b.card_a),
    );
    assert!(refused.default_prevented);

    manager.handle(&b.doc, event(NativeEventKind::PointerDown, 10., 10.));
    manager.handle(
        &b.doc,
        event(NativeEventKind::DragStart, 100., 10.).with_target(b.card_a),
    );
    assert!(manager.is_dragging());
}

#[test]
fn custom_drag_image_and_drop_effect_reach_the_data_transfer() {
    let b = board();
    let mut manager = DragDropManager::new();
    let card = b.card_a;
    manager
        .element_mut()
        .draggable(Draggable::new(card).on_generate_drag_preview(move |p| {
            assert!(center_under_pointer(Size::new(300., 50.)).apply(p, card));
        }))
        .unwrap();
    manager
        .element_mut()
        .drop_target(DropTarget::new(b.card_b).get_drop_effect(|_| DropEffect::Copy))
        .unwrap();

    let mut dt = DataTransfer::new();
    let started = manager.handle(
        &b.doc,
        event(NativeEventKind::DragStart, 10., 10.)
            .with_target(card)
            .with_data_transfer(&mut dt),
    );
    let image = started.drag_image.expect("preview image");
    assert_eq!(image.element, card);
    assert_eq!(dt.drag_image, Some(image));

    let over = manager.handle(
        &b.doc,
        event(NativeEventKind::DragOver, 10., 80.).with_data_transfer(&mut dt),
    );
    assert_eq!(over.drop_effect, Some(DropEffect::Copy));
    assert_eq!(dt.drop_effect, DropEffect::Copy);
}

#[test]
fn registrations_can_change_mid_drag() {
    let b = board();
    let log: Log = Rc::default();
    let mut manager = DragDropManager::new();
    manager
        .element_mut()
        .draggable(Draggable::new(b.card_a))
        .unwrap();
    let l = log.clone();
    let card_b = manager
        .element_mut()
        .drop_target(DropTarget::new(b.card_b).on_drag(move |_| l.borrow_mut().push("b:drag".into())))
        .unwrap();
    let mut dt = DataTransfer::new();
    start_drag(&mut manager, &b, &mut dt);
    manager.handle(&b.doc, event(NativeEventKind::DragOver, 10., 80.));
    manager.animation_frame();
    assert_eq!(*log.borrow(), ["b:drag"]);

    // Unmounted: no further callbacks.
    assert!(manager.cleanup(Cleanup::ElementDropTarget(card_b)));
    manager.handle(&b.doc, event(NativeEventKind::DragOver, 10., 85.));
    manager.animation_frame();
    assert_eq!(log.borrow().len(), 1);

    // Mounted mid-drag: participates from the next resolution.
    let l = log.clone();
    let outside = manager
        .element_mut()
        .drop_target(
            DropTarget::new(b.outside).on_drag_enter(move |_| l.borrow_mut().push("outside:enter".into())),
        )
        .unwrap();
    manager.handle(&b.doc, event(NativeEventKind::DragOver, 450., 50.));
    assert_eq!(log.borrow().last().map(String::as_str), Some("outside:enter"));

    assert_eq!(
        manager.cleanup_all([
            Cleanup::ElementDropTarget(card_b),
            Cleanup::ElementDropTarget(outside)
        ]),
        1
    );
}

#[test]
fn sticky_drop_target_survives_leaving_everything() {
    let b = board();
    let mut manager = DragDropManager::new();
    manager
        .element_mut()
        .draggable(Draggable::new(b.card_a))
        .unwrap();
    manager
        .element_mut()
        .drop_target(DropTarget::new(b.list).get_is_sticky(|_| true))
        .unwrap();
    let mut dt = DataTransfer::new();
    start_drag(&mut manager, &b, &mut dt);
    manager.handle(&b.doc, event(NativeEventKind::DragOver, 450., 50.));
    let drag = manager.element_drag().unwrap();
    assert_eq!(drag.current.drop_targets.len(), 1);
    assert!(drag.current.drop_targets[0].is_active_due_to_stickiness);
}

fn external_transfer() -> DataTransfer {
    DataTransfer::new()
        .with_data("text/plain", "hello")
        .with_file(NativeFile {
            name: "photo.png".into(),
            media_type: "image/png".into(),
            size: 2048,
        })
        .with_mode(DataTransferMode::Protected)
}

#[test]
fn external_drags_start_on_enter_and_read_data_on_drop() {
    let b = board();
    let seen: Rc<RefCell<Option<(String, usize)>>> = Rc::default();
    let mut manager = DragDropManager::new();
    let s = seen.clone();
    manager
        .external_mut()
        .drop_target(
            DropTarget::<dropline_core::ExternalSource>::new(b.list)
                .can_drop(|args| args.source.contains_files())
                .on_drop(move |e| {
                    let source = &e.payload.source;
                    *s.borrow_mut() = Some((
                        source.get_text().unwrap_or_default().to_owned(),
                        source.get_files().len(),
                    ));
                }),
        )
        .unwrap();

    let mut dt = external_transfer();
    let entered = manager.handle(
        &b.doc,
        event(NativeEventKind::DragEnter, 10., 10.).with_data_transfer(&mut dt),
    );
    assert_eq!(manager.active_kind(), Some(DragKind::External));
    assert!(entered.default_prevented);
    assert_eq!(entered.drop_effect, Some(DropEffect::Copy));
    assert!(manager.external_drag().unwrap().source.get_text().is_none());

    dt.set_mode(DataTransferMode::ReadOnly);
    manager.handle(
        &b.doc,
        event(NativeEventKind::Drop, 10., 10.).with_data_transfer(&mut dt),
    );
    assert!(!manager.is_dragging());
    assert_eq!(*seen.borrow(), Some(("hello".to_owned(), 1)));
}

#[test]
fn external_drags_cancel_when_leaving_the_window() {
    let b = board();
    let drops: Rc<RefCell<usize>> = Rc::default();
    let mut manager = DragDropManager::new();
    let d = drops.clone();
    manager
        .external_mut()
        .monitor(Monitor::new().on_drop(move |_| *d.borrow_mut() += 1));
    let mut dt = external_transfer();
    manager.handle(
        &b.doc,
        event(NativeEventKind::DragEnter, 10., 10.).with_data_transfer(&mut dt),
    );
    assert!(manager.is_dragging());
    manager.handle(&b.doc, event(NativeEventKind::DragLeave, 10., 10.).with_target(b.list));
    assert!(!manager.is_dragging());
    assert_eq!(*drops.borrow(), 1);
}

#[test]
fn external_drag_images_go_to_the_host_only() {
    let b = board();
    let mut manager = DragDropManager::new();
    let list = b.list;
    manager.external_mut().monitor(Monitor::new().on_generate_drag_preview(move |p| {
        assert!(center_under_pointer(Size::new(20., 20.)).apply(p, list));
    }));
    let mut dt = external_transfer();
    let entered = manager.handle(
        &b.doc,
        event(NativeEventKind::DragEnter, 10., 10.).with_data_transfer(&mut dt),
    );
    assert_eq!(entered.drag_image.map(|image| image.element), Some(list));
    assert_eq!(dt.drag_image, None);
}

#[test]
fn own_element_drags_never_start_external_drags() {
    let b = board();
    let mut manager = DragDropManager::new();
    let mut dt = DataTransfer::new().with_data(ELEMENT_DRAG_MARKER, "");
    manager.handle(
        &b.doc,
        event(NativeEventKind::DragEnter, 10., 10.).with_data_transfer(&mut dt),
    );
    assert!(!manager.is_dragging());
}

#[test]
fn text_selection_drags_start_from_text_nodes() {
    let mut b = board();
    let text = b
        .doc
        .insert(Some(b.card_b), ElementNode::text(Rect::new(0., 60., 100., 80.)))
        .unwrap();
    let dropped: Rc<RefCell<String>> = Rc::default();
    let mut manager = DragDropManager::new();
    let d = dropped.clone();
    manager
        .text_selection_mut()
        .drop_target(DropTarget::<dropline_core::TextSelectionSource>::new(b.list).on_drop(move |e| {
            *d.borrow_mut() = e.payload.source.plain.clone();
        }))
        .unwrap();
    let mut dt = DataTransfer::new().with_data("text/plain", "selected words");
    manager.handle(
        &b.doc,
        event(NativeEventKind::DragStart, 10., 70.)
            .with_target(text)
            .with_data_transfer(&mut dt),
    );
    assert_eq!(manager.active_kind(), Some(DragKind::TextSelection));
    manager.handle(&b.doc, event(NativeEventKind::DragOver, 10., 200.));
    manager.handle(&b.doc, event(NativeEventKind::Drop, 10., 200.));
    assert_eq!(*dropped.borrow(), "selected words");
}

#[test]
fn pointer_bridge_starts_after_the_threshold() {
    let b = board();
    let log: Log = Rc::default();
    let mut manager = logged_manager(&b, &log);
    let mut bridge = PointerDragBridge::new(PointerDragConfig::default());

    bridge.pointer_down(&mut manager, &b.doc, Input::at((10., 10.)));
    bridge.pointer_move(&mut manager, &b.doc, Input::at((13., 13.)));
    assert!(!bridge.is_dragging());
    assert!(!manager.is_dragging());

    let over = bridge.pointer_move(&mut manager, &b.doc, Input::at((10., 80.)));
    assert!(bridge.is_dragging());
    assert!(over.default_prevented);
    assert_eq!(manager.element_drag().unwrap().current.drop_targets.len(), 2);

    bridge.pointer_move(&mut manager, &b.doc, Input::at((10., 85.)));
    manager.animation_frame();
    let dropped = bridge.pointer_up(&mut manager, &b.doc, Input::at((10., 85.)));
    assert!(dropped.default_prevented);
    assert!(!manager.is_dragging());
    assert!(!bridge.is_dragging());
    assert_eq!(log.borrow().last().map(String::as_str), Some("monitor:drop[2]"));
}

#[test]
fn pointer_bridge_ignores_secondary_buttons_and_cancels() {
    let b = board();
    let log: Log = Rc::default();
    let mut manager = logged_manager(&b, &log);
    let mut bridge = PointerDragBridge::new(PointerDragConfig::default().with_drag_threshold(2.));

    let mut secondary = Input::at((10., 10.));
    secondary.button = 2;
    bridge.pointer_down(&mut manager, &b.doc, secondary);
    bridge.pointer_move(&mut manager, &b.doc, Input::at((10., 80.)));
    assert!(!manager.is_dragging());

    bridge.pointer_down(&mut manager, &b.doc, Input::at((10., 10.)));
    bridge.pointer_move(&mut manager, &b.doc, Input::at((10., 80.)));
    assert!(manager.is_dragging());
    bridge.cancel(&mut manager, &b.doc);
    assert!(!manager.is_dragging());
    assert_eq!(log.borrow().last().map(String::as_str), Some("monitor:drop[0]"));
}
