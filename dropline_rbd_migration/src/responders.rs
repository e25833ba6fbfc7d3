// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use core::fmt;

use crate::types::{BeforeCapture, DragStart, DragUpdate, DropResult};

type Responder<T> = Option<Box<dyn FnMut(&T)>>;

/// Callbacks of a [`DragDropContext`](crate::DragDropContext).
///
/// For every drag they run in this order: `on_before_capture`,
/// `on_before_drag_start`, `on_drag_start`, any number of `on_drag_update`,
/// and exactly one `on_drag_end`.
#[derive(Default)]
pub struct Responders {
    on_before_capture: Responder<BeforeCapture>,
    on_before_drag_start: Responder<DragStart>,
    on_drag_start: Responder<DragStart>,
    on_drag_update: Responder<DragUpdate>,
    on_drag_end: Responder<DropResult>,
}

impl fmt::Debug for Responders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Responders")
            .field("on_before_capture", &self.on_before_capture.is_some())
            .field("on_before_drag_start", &self.on_before_drag_start.is_some())
            .field("on_drag_start", &self.on_drag_start.is_some())
            .field("on_drag_update", &self.on_drag_update.is_some())
            .field("on_drag_end", &self.on_drag_end.is_some())
            .finish()
    }
}

impl Responders {
    /// No callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs before the draggable is lifted.
    #[must_use]
    pub fn on_before_capture(mut self, f: impl FnMut(&BeforeCapture) + 'static) -> Self {
        self.on_before_capture = Some(Box::new(f));
        self
    }

    /// Runs as the drag starts, before `on_drag_start`.
    #[must_use]
    pub fn on_before_drag_start(mut self, f: impl FnMut(&DragStart) + 'static) -> Self {
        self.on_before_drag_start = Some(Box::new(f));
        self
    }

    /// Runs once the drag has started.
    #[must_use]
    pub fn on_drag_start(mut self, f: impl FnMut(&DragStart) + 'static) -> Self {
        self.on_drag_start = Some(Box::new(f));
        self
    }

    /// Runs whenever the destination changes.
    #[must_use]
    pub fn on_drag_update(mut self, f: impl FnMut(&DragUpdate) + 'static) -> Self {
        self.on_drag_update = Some(Box::new(f));
        self
    }

    /// Runs when the drag ends. This is where the host reorders its data.
    #[must_use]
    pub fn on_drag_end(mut self, f: impl FnMut(&DropResult) + 'static) -> Self {
        self.on_drag_end = Some(Box::new(f));
        self
    }

    pub(crate) fn before_capture(&mut self, value: &BeforeCapture) {
        if let Some(f) = &mut self.on_before_capture {
            f(value);
        }
    }

    pub(crate) fn before_drag_start(&mut self, value: &DragStart) {
        if let Some(f) = &mut self.on_before_drag_start {
            f(value);
        }
    }

    pub(crate) fn drag_start(&mut self, value: &DragStart) {
        if let Some(f) = &mut self.on_drag_start {
            f(value);
        }
    }

    pub(crate) fn drag_update(&mut self, value: &DragUpdate) {
        if let Some(f) = &mut self.on_drag_update {
            f(value);
        }
    }

    pub(crate) fn drag_end(&mut self, value: &DropResult) {
        if let Some(f) = &mut self.on_drag_end {
            f(value);
        }
    }
}
