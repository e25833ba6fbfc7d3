// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-by-frame auto-scroll behaviour during element drags.

use core::time::Duration;

use dropline_auto_scroll::{
    AllowedAxis, ElementAutoScroller, MaxScrollSpeed, ScrollConfiguration, ScrollContainer,
    ScrollTarget, WindowScroll,
};
use dropline_core::{DataTransfer, DragDropManager, Draggable, Input, NativeEvent, NativeEventKind};
use dropline_dom::{Document, ElementId, ElementNode};
use kurbo::{Rect, Size, Vec2};

struct Scene {
    doc: Document,
    outer: ElementId,
    inner: ElementId,
    card: ElementId,
    manager: DragDropManager,
    scroller: ElementAutoScroller,
    dt: DataTransfer,
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// An 800x400 window over a 3000px tall document, holding a 400px tall
/// scroll container with a 400px tall scrollable list inside it, and a card.
fn scene() -> Scene {
    let mut doc = Document::new();
    doc.set_viewport(Size::new(800., 400.));
    doc.set_window_content_size(Size::new(800., 3000.));
    let outer = doc
        .insert(
            None,
            ElementNode::scroll_container(Rect::new(0., 0., 400., 400.), Size::new(400., 3000.)),
        )
        .unwrap();
    let inner = doc
        .insert(
            Some(outer),
            ElementNode::scroll_container(Rect::new(0., 0., 200., 400.), Size::new(200., 2000.)),
        )
        .unwrap();
    let card = doc
        .insert(None, ElementNode::with_bounds(Rect::new(600., 100., 700., 140.)))
        .unwrap();
    let mut manager = DragDropManager::new();
    manager.element_mut().draggable(Draggable::new(card)).unwrap();
    Scene {
        doc,
        outer,
        inner,
        card,
        manager,
        scroller: ElementAutoScroller::default(),
        dt: DataTransfer::new(),
    }
}

impl Scene {
    /// Starts a drag and runs the frame that delivers the drag start.
    fn start(&mut self) {
        self.manager.handle(
            &self.doc,
            NativeEvent::new(NativeEventKind::DragStart, Input::at((650., 120.)))
                .with_target(self.card)
                .with_data_transfer(&mut self.dt),
        );
        let armed = self.frame(ms(0));
        assert!(armed.is_empty(), "scrolled on the drag start frame");
    }

    fn over(&mut self, x: f64, y: f64) {
        self.manager.handle(
            &self.doc,
            NativeEvent::new(NativeEventKind::DragOver, Input::at((x, y)))
                .with_data_transfer(&mut self.dt),
        );
    }

    fn frame(&mut self, now: Duration) -> Vec<(ScrollTarget, Vec2)> {
        self.manager.animation_frame();
        self.scroller
            .frame(&mut self.doc, self.manager.element_drag(), now)
            .into_iter()
            .map(|step| (step.target, step.requested))
            .collect()
    }

    fn offset(&self, element: ElementId) -> Vec2 {
        self.doc.scroll_state(element).unwrap().offset
    }
}

#[test]
fn nothing_scrolls_without_a_drag() {
    let mut s = scene();
    s.scroller.container(ScrollContainer::new(s.inner)).unwrap();
    assert!(s.frame(ms(0)).is_empty());
    assert_eq!(s.offset(s.inner), Vec2::ZERO);
}

#[test]
fn innermost_container_takes_the_axis() {
    let mut s = scene();
    s.scroller.container(ScrollContainer::new(s.outer)).unwrap();
    s.scroller.container(ScrollContainer::new(s.inner)).unwrap();
    s.scroller.window(WindowScroll::new());
    s.start();

    s.over(100., 390.);
    let inner = ScrollTarget::Element(s.inner);
    assert_eq!(s.frame(ms(1000)), [(inner, Vec2::new(0., 1.))]);
    assert_eq!(s.frame(ms(1150)), [(inner, Vec2::new(0., 5.))]);
    assert_eq!(s.frame(ms(1300)), [(inner, Vec2::new(0., 20.))]);
    assert_eq!(s.offset(s.inner), Vec2::new(0., 26.));
    assert_eq!(s.offset(s.outer), Vec2::ZERO);
    assert_eq!(s.doc.window().scroll, Vec2::ZERO);
}

#[test]
fn an_exhausted_container_passes_the_axis_outwards() {
    let mut s = scene();
    s.scroller.container(ScrollContainer::new(s.outer)).unwrap();
    s.scroller.container(ScrollContainer::new(s.inner)).unwrap();
    s.scroller.window(WindowScroll::new());
    s.doc.scroll_by(s.inner, Vec2::new(0., 5000.)).unwrap();
    s.start();

    s.over(100., 390.);
    assert_eq!(
        s.frame(ms(1000)),
        [(ScrollTarget::Element(s.outer), Vec2::new(0., 1.))]
    );

    s.doc.scroll_by(s.outer, Vec2::new(0., 5000.)).unwrap();
    assert_eq!(s.frame(ms(1016)), [(ScrollTarget::Window, Vec2::new(0., 1.))]);
    assert!(!s.scroller.is_engaged(ScrollTarget::Element(s.outer)));
    assert!(s.scroller.is_engaged(ScrollTarget::Window));
}

#[test]
fn leaving_the_hitbox_resets_the_ramp() {
    let mut s = scene();
    s.scroller.window(WindowScroll::new());
    s.start();

    s.over(600., 395.);
    assert_eq!(s.frame(ms(1000)), [(ScrollTarget::Window, Vec2::new(0., 1.))]);
    assert_eq!(s.frame(ms(1300)), [(ScrollTarget::Window, Vec2::new(0., 20.))]);

    s.over(600., 200.);
    assert!(s.frame(ms(1316)).is_empty());
    assert!(!s.scroller.is_engaged(ScrollTarget::Window));

    s.over(600., 395.);
    assert_eq!(s.frame(ms(1332)), [(ScrollTarget::Window, Vec2::new(0., 1.))]);
}

#[test]
fn speed_grows_towards_the_edge() {
    let mut s = scene();
    s.scroller.window(WindowScroll::new());
    s.start();
    // 100px hitbox, full speed from 50px. 75px from the edge is a quarter speed.
    s.over(600., 325.);
    s.frame(ms(0));
    assert_eq!(s.frame(ms(1000)), [(ScrollTarget::Window, Vec2::new(0., 5.))]);
}

#[test]
fn configuration_hooks() {
    let mut s = scene();
    s.scroller
        .container(ScrollContainer::new(s.outer).can_scroll(|_| false))
        .unwrap();
    s.scroller
        .container(ScrollContainer::new(s.inner).get_configuration(|_| {
            ScrollConfiguration::new().with_allowed_axis(AllowedAxis::Horizontal)
        }))
        .unwrap();
    s.scroller.window(WindowScroll::new().get_configuration(|_| {
        ScrollConfiguration::new().with_max_scroll_speed(MaxScrollSpeed::Fast)
    }));
    s.start();

    // The inner list only scrolls horizontally and the outer container is
    // refused, so the vertical axis reaches the window at fast speed.
    s.over(100., 390.);
    s.frame(ms(0));
    assert_eq!(s.frame(ms(1000)), [(ScrollTarget::Window, Vec2::new(0., 40.))]);
}

#[test]
fn a_new_drag_is_armed_again() {
    let mut s = scene();
    s.scroller.window(WindowScroll::new());
    s.start();
    s.over(600., 395.);
    assert_eq!(s.frame(ms(16)).len(), 1);

    s.manager.handle(
        &s.doc,
        NativeEvent::new(NativeEventKind::DragEnd, Input::at((600., 395.)))
            .with_data_transfer(&mut s.dt),
    );
    assert!(s.frame(ms(32)).is_empty());
    assert!(!s.scroller.is_engaged(ScrollTarget::Window));

    s.dt = DataTransfer::new();
    s.start();
    s.over(600., 395.);
    assert_eq!(s.frame(ms(64)), [(ScrollTarget::Window, Vec2::new(0., 1.))]);
}

#[test]
fn back_to_back_drags_start_from_rest() {
    let mut s = scene();
    s.scroller.window(WindowScroll::new());
    s.start();
    s.over(600., 395.);
    assert_eq!(s.frame(ms(1000)), [(ScrollTarget::Window, Vec2::new(0., 1.))]);
    assert_eq!(s.frame(ms(1300)), [(ScrollTarget::Window, Vec2::new(0., 20.))]);
    s.manager.handle(
        &s.doc,
        NativeEvent::new(NativeEventKind::DragEnd, Input::at((600., 395.)))
            .with_data_transfer(&mut s.dt),
    );

    // No frame runs while idle: the next drag starts straight away.
    s.dt = DataTransfer::new();
    s.manager.handle(
        &s.doc,
        NativeEvent::new(NativeEventKind::DragStart, Input::at((650., 120.)))
            .with_target(s.card)
            .with_data_transfer(&mut s.dt),
    );
    s.over(600., 395.);
    assert!(s.frame(ms(2000)).is_empty(), "scrolled on the drag start frame");
    assert!(!s.scroller.is_engaged(ScrollTarget::Window));
    assert_eq!(s.frame(ms(2016)), [(ScrollTarget::Window, Vec2::new(0., 1.))]);
}
