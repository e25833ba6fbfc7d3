// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dropline Core: the drag adapter core.
//!
//! Native drag and drop reports low level facts: a drag started on some
//! element, the pointer entered another element, something was dropped.
//! Applications want a consistent lifecycle instead: which registered drop
//! targets are under the drag, in what order, and when each callback runs.
//! This crate turns the former into the latter without owning the event loop.
//!
//! - [`DragDropManager`]: the native drag bridge. Feed it every native event with
//!   [`DragDropManager::handle`] and call [`DragDropManager::animation_frame`] once per frame.
//! - [`PointerDragBridge`]: synthesizes native drag events from raw pointer input.
//! - [`ElementAdapter`], [`ExternalAdapter`], [`TextSelectionAdapter`]: registrations
//!   for the three kinds of drags. Element drags start from a registered [`Draggable`].
//! - [`DropTarget`] and [`Monitor`]: drop targets receive events while the drag is over
//!   them; monitors receive every event of every drag they opt into.
//! - [`Dispatcher`]: the lifecycle sequencing shared by all adapters.
//!
//! ## Lifecycle
//!
//! Every drag produces, in order:
//!
//! 1. `on_generate_drag_preview`: the only moment to request a custom drag image.
//! 2. `on_drag_start`: one animation frame later.
//! 3. Any number of `on_drag` (at most one per frame) and `on_drop_target_change`.
//! 4. Exactly one `on_drop`, with no drop targets if the drag was cancelled.
//!
//! Each event reaches the source first, then the drop targets (innermost first),
//! then the monitors.
//!
//! ## Minimal example
//!
//! ```rust
//! use dropline_core::{
//!     DataTransfer, DragDropManager, Draggable, DropTarget, Input, NativeEvent, NativeEventKind,
//! };
//! use dropline_dom::{Document, ElementNode};
//! use kurbo::Rect;
//!
//! let mut doc = Document::new();
//! let card = doc.insert(None, ElementNode::with_bounds(Rect::new(0., 0., 100., 40.))).unwrap();
//! let column = doc.insert(None, ElementNode::with_bounds(Rect::new(200., 0., 400., 400.))).unwrap();
//!
//! let mut manager = DragDropManager::new();
//! manager.element_mut().draggable(Draggable::new(card)).unwrap();
//! manager.element_mut().drop_target(DropTarget::new(column)).unwrap();
//!
//! let mut dt = DataTransfer::new();
//! manager.handle(
//!     &doc,
//!     NativeEvent::new(NativeEventKind::DragStart, Input::at((10., 10.)))
//!         .with_target(card)
//!         .with_data_transfer(&mut dt),
//! );
//! let over = manager.handle(
//!     &doc,
//!     NativeEvent::new(NativeEventKind::DragOver, Input::at((250., 50.))).with_data_transfer(&mut dt),
//! );
//! assert!(over.default_prevented);
//! assert_eq!(manager.element_drag().unwrap().current.drop_targets[0].element, column);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod adapter;
mod data;
mod data_transfer;
mod dispatch;
mod drop_target;
mod element;
mod event;
mod external;
mod input;
mod lifecycle;
mod monitor;
mod pointer;
pub mod preview;
mod registry;
mod reorder;
mod text_selection;

pub use adapter::Adapter;
pub use data::{Data, Value};
pub use data_transfer::{
    DataTransfer, DataTransferItem, DataTransferMode, DragImage, DropEffect, ELEMENT_DRAG_MARKER,
    FILES_TYPE, ItemKind, NativeFile,
};
pub use dispatch::{Dispatcher, EventSink};
pub use drop_target::{DropTarget, DropTargetArgs, DropTargetRegistry};
pub use element::{
    CanDragArgs, Draggable, ElementAdapter, ElementDropTarget, ElementMonitor, ElementSource,
};
pub use event::{
    DragLocation, DragLocationHistory, DropTargetEvent, DropTargetRecord, EventKind, EventPayload,
    has_hierarchy_changed,
};
pub use external::{
    ExternalAdapter, ExternalDropTarget, ExternalMonitor, ExternalSource, is_external,
};
pub use input::{Input, Modifiers};
pub use lifecycle::{
    Cleanup, DragDropManager, DragKind, DragView, EventResponse, NativeEvent, NativeEventKind,
};
pub use monitor::{Monitor, MonitorArgs, MonitorId, MonitorRegistry};
pub use pointer::{PointerDragBridge, PointerDragConfig};
pub use registry::{RegistrationId, Registry, RegistryError};
pub use reorder::{reorder, reorder_in_place};
pub use text_selection::{
    TextSelectionAdapter, TextSelectionDropTarget, TextSelectionMonitor, TextSelectionSource,
};
