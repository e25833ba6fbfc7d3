// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event payloads shared by every adapter.
//!
//! Every lifecycle callback receives an [`EventPayload`]: the drag `source`
//! plus a [`DragLocationHistory`] with three snapshots:
//!
//! - `initial`: where the drag started.
//! - `current`: where the drag is now.
//! - `previous`: the drop targets of the last event that was dispatched.
//!
//! Drop targets are always ordered innermost first.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cell::Cell;
use core::fmt;

use dropline_dom::ElementId;

use crate::data::Data;
use crate::data_transfer::{DragImage, DropEffect};
use crate::input::Input;

/// A drop target that is active for the current position.
#[derive(Clone, Debug, PartialEq)]
pub struct DropTargetRecord {
    /// The registered element.
    pub element: ElementId,
    /// Result of the target's `get_data`.
    pub data: Data,
    /// Result of the target's `get_drop_effect`.
    pub drop_effect: DropEffect,
    /// `true` when the pointer is no longer over the target but it was kept
    /// because it is sticky.
    pub is_active_due_to_stickiness: bool,
}

/// Pointer input plus the stack of active drop targets.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DragLocation {
    /// Input of the event that produced this location.
    pub input: Input,
    /// Active drop targets, innermost first.
    pub drop_targets: Vec<DropTargetRecord>,
}

impl DragLocation {
    /// Innermost drop target, if any.
    pub fn innermost(&self) -> Option<&DropTargetRecord> {
        self.drop_targets.first()
    }
}

/// Start, current, and previous locations for one event.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DragLocationHistory {
    /// Location when the drag started.
    pub initial: DragLocation,
    /// Location for this event.
    pub current: DragLocation,
    /// Drop targets of the previously dispatched event.
    pub previous: Vec<DropTargetRecord>,
}

/// The lifecycle events dispatched to sources, drop targets, and monitors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A drag is starting; the only moment a custom drag image can be set.
    GenerateDragPreview,
    /// The drag has started (one frame after the preview was generated).
    DragStart,
    /// The pointer moved (throttled to one per animation frame).
    Drag,
    /// The stack of drop targets changed.
    DropTargetChange,
    /// The drag finished, either on drop targets or cancelled with none.
    Drop,
}

/// Slot used during [`EventKind::GenerateDragPreview`] to request a custom drag image.
#[derive(Clone, Debug, Default)]
pub(crate) struct DragImageSlot(Cell<Option<DragImage>>);

impl DragImageSlot {
    pub(crate) fn take(&self) -> Option<DragImage> {
        self.0.take()
    }
}

/// Payload of every lifecycle event.
#[derive(Clone, Debug)]
pub struct EventPayload<S> {
    /// What is being dragged.
    pub source: S,
    /// Where the drag is.
    pub location: DragLocationHistory,
    pub(crate) drag_image: Option<DragImageSlot>,
}

impl<S> EventPayload<S> {
    pub(crate) fn new(source: S, location: DragLocationHistory) -> Self {
        Self {
            source,
            location,
            drag_image: None,
        }
    }

    /// Requests a custom native drag image (`nativeSetDragImage`).
    ///
    /// Only honoured during [`EventKind::GenerateDragPreview`]; returns
    /// `false` for every other event. The last request wins.
    pub fn set_drag_image(&self, image: DragImage) -> bool {
        match &self.drag_image {
            Some(slot) => {
                slot.0.set(Some(image));
                true
            }
            None => false,
        }
    }
}

/// Payload delivered to drop target callbacks.
#[derive(Debug)]
pub struct DropTargetEvent<'a, S> {
    /// The shared event payload.
    pub payload: &'a EventPayload<S>,
    /// The record of the drop target receiving the callback.
    pub this: &'a DropTargetRecord,
}

/// Returns `true` when two drop target stacks differ in length or in any element.
///
/// Data and the stickiness flag are not compared: a target that becomes
/// sticky is still the same target.
pub fn has_hierarchy_changed(current: &[DropTargetRecord], next: &[DropTargetRecord]) -> bool {
    current.len() != next.len()
        || current
            .iter()
            .zip(next)
            .any(|(a, b)| a.element != b.element)
}

/// A boxed lifecycle handler.
pub(crate) type Handler<S> = Box<dyn FnMut(&EventPayload<S>)>;

/// Optional handlers for the five lifecycle events.
pub(crate) struct LifecycleCallbacks<S> {
    pub(crate) on_generate_drag_preview: Option<Handler<S>>,
    pub(crate) on_drag_start: Option<Handler<S>>,
    pub(crate) on_drag: Option<Handler<S>>,
    pub(crate) on_drop_target_change: Option<Handler<S>>,
    pub(crate) on_drop: Option<Handler<S>>,
}

impl<S> Default for LifecycleCallbacks<S> {
    fn default() -> Self {
        Self {
            on_generate_drag_preview: None,
            on_drag_start: None,
            on_drag: None,
            on_drop_target_change: None,
            on_drop: None,
        }
    }
}

impl<S> LifecycleCallbacks<S> {
    pub(crate) fn slot(&mut self, kind: EventKind) -> &mut Option<Handler<S>> {
        match kind {
            EventKind::GenerateDragPreview => &mut self.on_generate_drag_preview,
            EventKind::DragStart => &mut self.on_drag_start,
            EventKind::Drag => &mut self.on_drag,
            EventKind::DropTargetChange => &mut self.on_drop_target_change,
            EventKind::Drop => &mut self.on_drop,
        }
    }

    pub(crate) fn call(&mut self, kind: EventKind, payload: &EventPayload<S>) {
        if let Some(handler) = self.slot(kind) {
            handler(payload);
        }
    }
}

impl<S> fmt::Debug for LifecycleCallbacks<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleCallbacks")
            .field("on_generate_drag_preview", &self.on_generate_drag_preview.is_some())
            .field("on_drag_start", &self.on_drag_start.is_some())
            .field("on_drag", &self.on_drag.is_some())
            .field("on_drop_target_change", &self.on_drop_target_change.is_some())
            .field("on_drop", &self.on_drop.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dropline_dom::{Document, ElementNode};

    fn record(element: ElementId, sticky: bool) -> DropTargetRecord {
        DropTargetRecord {
            element,
            data: Data::new(),
            drop_effect: DropEffect::Move,
            is_active_due_to_stickiness: sticky,
        }
    }

    #[test]
    fn hierarchy_change_ignores_stickiness_flag() {
        let mut doc = Document::new();
        let a = doc.insert(None, ElementNode::default()).unwrap();
        let b = doc.insert(None, ElementNode::default()).unwrap();
        let current = [record(a, false), record(b, false)];
        assert!(!has_hierarchy_changed(&current, &[record(a, true), record(b, false)]));
        assert!(has_hierarchy_changed(&current, &[record(b, false), record(a, false)]));
        assert!(has_hierarchy_changed(&current, &[record(a, false)]));
        assert!(!has_hierarchy_changed(&[], &[]));
    }

    #[test]
    fn drag_image_only_settable_with_slot() {
        let plain = EventPayload::new((), DragLocationHistory::default());
        let mut doc = Document::new();
        let el = doc.insert(None, ElementNode::default()).unwrap();
        let image = DragImage {
            element: el,
            offset: kurbo::Vec2::ZERO,
        };
        assert!(!plain.set_drag_image(image));

        let mut preview = EventPayload::new((), DragLocationHistory::default());
        preview.drag_image = Some(DragImageSlot::default());
        assert!(preview.set_drag_image(image));
        assert_eq!(preview.drag_image.as_ref().and_then(DragImageSlot::take), Some(image));
    }
}
