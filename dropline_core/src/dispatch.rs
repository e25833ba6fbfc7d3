// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lifecycle dispatcher: sequences events for one drag.
//!
//! The dispatcher owns the location history of a drag and decides *when*
//! each event fires; an [`EventSink`] decides *who* receives it.
//!
//! - [`Dispatcher::start`] fires [`EventKind::GenerateDragPreview`] at once
//!   and defers [`EventKind::DragStart`] to the next animation frame, so the
//!   host can snapshot the drag preview before the UI reacts to the drag.
//! - [`Dispatcher::drag`] coalesces movement: only the latest location is
//!   delivered, once per frame.
//! - [`Dispatcher::update`] and [`Dispatcher::drop`] flush a pending start
//!   and discard pending movement before firing, so callbacks always observe
//!   `DragStart` before any other event and never see stale movement after a
//!   change of targets.
//!
//! After every delivered event, `previous` becomes that event's `current`.
//!
//! ## Minimal example
//!
//! ```
//! use dropline_core::{Dispatcher, DragLocation, EventKind, EventPayload, EventSink};
//!
//! #[derive(Default)]
//! struct Log(Vec<EventKind>);
//! impl EventSink<()> for Log {
//!     fn dispatch(&mut self, kind: EventKind, _: &EventPayload<()>) {
//!         self.0.push(kind);
//!     }
//! }
//!
//! let mut log = Log::default();
//! let mut dispatcher = Dispatcher::new((), DragLocation::default());
//! dispatcher.start(&mut log);
//! dispatcher.drag(&DragLocation::default());
//! dispatcher.drag(&DragLocation::default());
//! dispatcher.frame(&mut log);
//! dispatcher.drop(&DragLocation::default(), None, &mut log);
//!
//! assert_eq!(
//!     log.0,
//!     [EventKind::GenerateDragPreview, EventKind::DragStart, EventKind::Drag, EventKind::Drop]
//! );
//! ```

use alloc::vec::Vec;

use crate::data_transfer::DragImage;
use crate::event::{
    DragImageSlot, DragLocation, DragLocationHistory, DropTargetRecord, EventKind, EventPayload,
};

/// Receiver of dispatched lifecycle events.
///
/// Adapters implement this to fan an event out to the source, the drop
/// targets and the monitors, in that order.
pub trait EventSink<S> {
    /// Deliver one event.
    fn dispatch(&mut self, kind: EventKind, payload: &EventPayload<S>);
}

/// Sequencing state for a single drag.
#[derive(Clone, Debug)]
pub struct Dispatcher<S> {
    source: S,
    initial: DragLocation,
    previous: Vec<DropTargetRecord>,
    pending_start: bool,
    pending_drag: Option<DragLocation>,
}

impl<S: Clone> Dispatcher<S> {
    /// A dispatcher for a drag of `source` starting at `initial`.
    pub fn new(source: S, initial: DragLocation) -> Self {
        Self {
            source,
            initial,
            previous: Vec::new(),
            pending_start: false,
            pending_drag: None,
        }
    }

    /// What is being dragged.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Where the drag started.
    pub fn initial(&self) -> &DragLocation {
        &self.initial
    }

    /// Returns `true` while `DragStart` has not been delivered yet.
    pub fn is_start_pending(&self) -> bool {
        self.pending_start
    }

    /// Fires `GenerateDragPreview` and schedules `DragStart`.
    ///
    /// Returns the custom drag image requested by a callback, if any.
    pub fn start(&mut self, sink: &mut impl EventSink<S>) -> Option<DragImage> {
        let mut payload = self.payload(self.initial.clone());
        payload.drag_image = Some(DragImageSlot::default());
        self.deliver(sink, EventKind::GenerateDragPreview, &payload);
        self.pending_start = true;
        payload.drag_image.as_ref().and_then(DragImageSlot::take)
    }

    /// Fires `DropTargetChange` for a new stack of drop targets.
    pub fn update(&mut self, current: &DragLocation, sink: &mut impl EventSink<S>) {
        self.flush_start(sink);
        self.pending_drag = None;
        let payload = self.payload(current.clone());
        self.deliver(sink, EventKind::DropTargetChange, &payload);
    }

    /// Schedules `Drag` for the next frame, replacing any pending movement.
    pub fn drag(&mut self, current: &DragLocation) {
        self.pending_drag = Some(current.clone());
    }

    /// Runs the work scheduled for an animation frame.
    pub fn frame(&mut self, sink: &mut impl EventSink<S>) {
        self.flush_start(sink);
        if let Some(current) = self.pending_drag.take() {
            let payload = self.payload(current);
            self.deliver(sink, EventKind::Drag, &payload);
        }
    }

    /// Fires `Drop`, with `updated_source` replacing the source when present.
    pub fn drop(
        &mut self,
        current: &DragLocation,
        updated_source: Option<S>,
        sink: &mut impl EventSink<S>,
    ) {
        self.flush_start(sink);
        self.pending_drag = None;
        if let Some(source) = updated_source {
            self.source = source;
        }
        let payload = self.payload(current.clone());
        self.deliver(sink, EventKind::Drop, &payload);
    }

    fn flush_start(&mut self, sink: &mut impl EventSink<S>) {
        if !self.pending_start {
            return;
        }
        self.pending_start = false;
        let payload = self.payload(self.initial.clone());
        self.deliver(sink, EventKind::DragStart, &payload);
    }

    fn payload(&self, current: DragLocation) -> EventPayload<S> {
        EventPayload::new(
            self.source.clone(),
            DragLocationHistory {
                initial: self.initial.clone(),
                current,
                previous: self.previous.clone(),
            },
        )
    }

    fn deliver(&mut self, sink: &mut impl EventSink<S>, kind: EventKind, payload: &EventPayload<S>) {
        log::trace!(
            "dispatching {kind:?} over {} drop targets",
            payload.location.current.drop_targets.len()
        );
        sink.dispatch(kind, payload);
        self.previous = payload.location.current.drop_targets.clone();
    }
}
