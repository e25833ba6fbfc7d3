// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dropline RBD Migration: a react-beautiful-dnd shaped API on top of Dropline.
//!
//! Applications written against react-beautiful-dnd think in droppable lists
//! of draggable items with consecutive indices, and react to a single
//! `on_drag_end` carrying a source and a destination. A [`DragDropContext`]
//! keeps that model while the drags themselves run through
//! [`dropline_core`]:
//!
//! - [`DragDropContext::add_droppable`] registers a list as a drop target that
//!   accepts draggables from lists of the same type.
//! - [`DragDropContext::add_draggable`] registers an item as a draggable and as a
//!   drop target. The closest edge of the item under the pointer decides
//!   whether the destination is before or after it.
//! - [`Responders`] receive `on_before_capture`, `on_before_drag_start`,
//!   `on_drag_start`, `on_drag_update` (whenever the destination changes), and
//!   exactly one `on_drag_end`.
//! - [`DragDropContext::key_down`] drives keyboard drags: `Space` lifts and
//!   drops, arrow keys move one slot or one list, `Escape` cancels.
//!
//! Combining items is not supported, so `combine` is always `None`.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use dropline_core::{DataTransfer, Input, NativeEvent, NativeEventKind};
//! use dropline_dom::{Document, ElementNode};
//! use dropline_rbd_migration::{
//!     DragDropContext, DraggableProps, DroppableProps, DropResult, Responders,
//! };
//! use kurbo::Rect;
//!
//! let mut doc = Document::new();
//! let mut rect = |parent, r| doc.insert(parent, ElementNode::with_bounds(r)).unwrap();
//! let list = rect(None, Rect::new(0., 0., 300., 300.));
//! let a = rect(Some(list), Rect::new(0., 0., 300., 40.));
//! let b = rect(Some(list), Rect::new(0., 50., 300., 90.));
//!
//! let ended: Rc<RefCell<Option<DropResult>>> = Rc::default();
//! let sink = ended.clone();
//! let mut context = DragDropContext::new(
//!     Responders::new().on_drag_end(move |result| *sink.borrow_mut() = Some(result.clone())),
//! );
//! context.add_droppable(DroppableProps::new("todo", list)).unwrap();
//! context.add_draggable(DraggableProps::new("a", "todo", 0, a)).unwrap();
//! context.add_draggable(DraggableProps::new("b", "todo", 1, b)).unwrap();
//!
//! fn event<'a>(kind: NativeEventKind, x: f64, y: f64) -> NativeEvent<'a> {
//!     NativeEvent::new(kind, Input::at((x, y)))
//! }
//!
//! // Drag A onto the bottom half of B.
//! let mut dt = DataTransfer::new();
//! let start = event(NativeEventKind::DragStart, 10., 10.).with_target(a);
//! context.handle(&doc, start.with_data_transfer(&mut dt));
//! context.handle(&doc, event(NativeEventKind::DragOver, 150., 80.).with_data_transfer(&mut dt));
//! context.handle(&doc, event(NativeEventKind::Drop, 150., 80.).with_data_transfer(&mut dt));
//!
//! let result = ended.borrow_mut().take().unwrap();
//! assert_eq!(result.source.index, 0);
//! assert_eq!(result.destination.unwrap().index, 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod context;
mod error;
mod responders;
mod state;
mod types;

pub use context::DragDropContext;
pub use error::MigrationError;
pub use responders::Responders;
pub use types::{
    BeforeCapture, DEFAULT_TYPE, Direction, DragStart, DragUpdate, DraggableLocation,
    DraggableProps, DraggableStateSnapshot, DropReason, DropResult, DroppableProps,
    DroppableStateSnapshot, Key, MovementMode,
};
