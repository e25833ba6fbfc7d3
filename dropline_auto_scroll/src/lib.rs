// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dropline Auto Scroll: scroll containers as a drag nears their edges.
//!
//! Register scroll containers (and optionally the window) with an
//! [`AutoScroller`], then call [`AutoScroller::frame`] once per animation
//! frame with the active drag. Each edge of a container has a hitbox a quarter
//! of its size deep, capped at 180px. Inside a hitbox the container scrolls
//! towards that edge, faster the closer the pointer gets, at up to 1200px per
//! second. A container that just started scrolling eases in over 300ms so a
//! drag passing over an edge does not jump.
//!
//! Nested containers are visited innermost first. Once a container scrolls on
//! an axis, its ancestors and the window leave that axis alone for the frame.
//!
//! ## Minimal example
//!
//! ```rust
//! use core::time::Duration;
//! use dropline_auto_scroll::{ElementAutoScroller, ScrollContainer};
//! use dropline_core::{DataTransfer, DragDropManager, Draggable, Input, NativeEvent, NativeEventKind};
//! use dropline_dom::{Document, ElementNode};
//! use kurbo::{Rect, Size};
//!
//! let mut doc = Document::new();
//! let list = doc
//!     .insert(None, ElementNode::scroll_container(Rect::new(0., 0., 200., 400.), Size::new(200., 2000.)))
//!     .unwrap();
//! let card = doc.insert(Some(list), ElementNode::with_bounds(Rect::new(0., 0., 200., 40.))).unwrap();
//!
//! let mut manager = DragDropManager::new();
//! manager.element_mut().draggable(Draggable::new(card)).unwrap();
//! let mut scroller = ElementAutoScroller::default();
//! scroller.container(ScrollContainer::new(list)).unwrap();
//!
//! let mut dt = DataTransfer::new();
//! manager.handle(
//!     &doc,
//!     NativeEvent::new(NativeEventKind::DragStart, Input::at((10., 10.)))
//!         .with_target(card)
//!         .with_data_transfer(&mut dt),
//! );
//! manager.handle(
//!     &doc,
//!     NativeEvent::new(NativeEventKind::DragOver, Input::at((100., 390.))).with_data_transfer(&mut dt),
//! );
//!
//! // The drag start frame arms the engine; the next frame scrolls.
//! manager.animation_frame();
//! assert!(scroller.frame(&mut doc, manager.element_drag(), Duration::ZERO).is_empty());
//! manager.animation_frame();
//! let steps = scroller.frame(&mut doc, manager.element_drag(), Duration::from_millis(16));
//! assert_eq!(steps.len(), 1);
//! assert!(doc.scroll_state(list).unwrap().offset.y > 0.);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod edge;
mod scroller;

pub use config::{AllowedAxis, AutoScrollConfig, MaxScrollSpeed, ScrollConfiguration};
pub use scroller::{
    AutoScrollArgs, AutoScroller, ElementAutoScroller, ExternalAutoScroller, ScrollContainer,
    ScrollStep, ScrollTarget, TextSelectionAutoScroller, WindowScroll, WindowScrollId,
};
