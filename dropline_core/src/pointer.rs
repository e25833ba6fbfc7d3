// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer drag bridge: native drag events synthesized from pointer input.
//!
//! Hosts without platform drag and drop (touch surfaces, canvas renderers,
//! tests) feed raw pointer input into a [`PointerDragBridge`], which drives a
//! [`DragDropManager`] with the same event sequence a browser would produce:
//!
//! - Pointer down with the primary button records a press.
//! - Moving further than [`PointerDragConfig::drag_threshold`] sends
//!   `dragstart`, then `dragenter` and `dragover`.
//! - Later moves send `dragenter` whenever the element under the pointer
//!   changes, and `dragover` every time.
//! - Pointer up sends `drop` and then `dragend`.
//! - [`PointerDragBridge::cancel`] (for example on Escape) sends `dragend` only.

use dropline_dom::{Document, ElementId};

use crate::data_transfer::{DataTransfer, DataTransferMode};
use crate::input::Input;
use crate::lifecycle::{DragDropManager, EventResponse, NativeEvent, NativeEventKind};

/// Configuration for [`PointerDragBridge`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerDragConfig {
    /// Distance in pixels the pointer travels before a press becomes a drag.
    pub drag_threshold: f64,
}

impl Default for PointerDragConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 5.0,
        }
    }
}

impl PointerDragConfig {
    /// Sets the drag threshold.
    #[must_use]
    pub fn with_drag_threshold(mut self, drag_threshold: f64) -> Self {
        self.drag_threshold = drag_threshold;
        self
    }
}

#[derive(Clone, Debug, Default)]
enum BridgeState {
    #[default]
    Idle,
    Pressed {
        origin: Input,
        target: Option<ElementId>,
    },
    Dragging {
        over: Option<ElementId>,
        data_transfer: DataTransfer,
    },
}

/// Synthesizes the native drag lifecycle from pointer input.
#[derive(Clone, Debug, Default)]
pub struct PointerDragBridge {
    config: PointerDragConfig,
    state: BridgeState,
}

impl PointerDragBridge {
    /// A bridge with the given configuration.
    pub fn new(config: PointerDragConfig) -> Self {
        Self {
            config,
            state: BridgeState::Idle,
        }
    }

    /// The configuration.
    pub fn config(&self) -> &PointerDragConfig {
        &self.config
    }

    /// Returns `true` while a press has turned into a drag.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, BridgeState::Dragging { .. })
    }

    /// Handles `pointerdown`.
    pub fn pointer_down(
        &mut self,
        manager: &mut DragDropManager,
        document: &Document,
        input: Input,
    ) -> EventResponse {
        if input.button != 0 || !matches!(self.state, BridgeState::Idle) {
            return EventResponse::default();
        }
        let target = document.element_from_point(input.client);
        self.state = BridgeState::Pressed { origin: input, target };
        manager.handle(document, NativeEvent::new(NativeEventKind::PointerDown, input))
    }

    /// Handles `pointermove`.
    pub fn pointer_move(
        &mut self,
        manager: &mut DragDropManager,
        document: &Document,
        input: Input,
    ) -> EventResponse {
        match &mut self.state {
            BridgeState::Idle => {
                manager.handle(document, NativeEvent::new(NativeEventKind::PointerMove, input))
            }
            BridgeState::Pressed { origin, target } => {
                let travelled = (input.client - origin.client).hypot2();
                if travelled <= self.config.drag_threshold * self.config.drag_threshold {
                    return EventResponse::default();
                }
                let target = *target;
                self.start(manager, document, target, input)
            }
            BridgeState::Dragging {
                over,
                data_transfer,
            } => Self::over(manager, document, over, data_transfer, input),
        }
    }

    /// Handles `pointerup`: drops an active drag.
    pub fn pointer_up(
        &mut self,
        manager: &mut DragDropManager,
        document: &Document,
        input: Input,
    ) -> EventResponse {
        let BridgeState::Dragging {
            mut data_transfer, ..
        } = core::mem::take(&mut self.state)
        else {
            return EventResponse::default();
        };
        data_transfer.set_mode(DataTransferMode::ReadOnly);
        let response = manager.handle(
            document,
            NativeEvent::new(NativeEventKind::Drop, input).with_data_transfer(&mut data_transfer),
        );
        manager.handle(
            document,
            NativeEvent::new(NativeEventKind::DragEnd, input).with_data_transfer(&mut data_transfer),
        );
        response
    }

    /// Abandons the press or drag, as Escape does for native drags.
    pub fn cancel(&mut self, manager: &mut DragDropManager, document: &Document) {
        if let BridgeState::Dragging {
            mut data_transfer, ..
        } = core::mem::take(&mut self.state)
        {
            let input = manager.current_input().unwrap_or_default();
            manager.handle(
                document,
                NativeEvent::new(NativeEventKind::DragEnd, input)
                    .with_data_transfer(&mut data_transfer),
            );
        }
    }

    fn start(
        &mut self,
        manager: &mut DragDropManager,
        document: &Document,
        target: Option<ElementId>,
        input: Input,
    ) -> EventResponse {
        self.state = BridgeState::Idle;
        let Some(target) = target else {
            return EventResponse::default();
        };
        let mut data_transfer = DataTransfer::new();
        let started = manager.handle(
            document,
            NativeEvent::new(NativeEventKind::DragStart, input)
                .with_target(target)
                .with_data_transfer(&mut data_transfer),
        );
        if started.default_prevented || !manager.is_dragging() {
            log::trace!("pointer press on {target:?} did not start a drag");
            return started;
        }
        data_transfer.set_mode(DataTransferMode::Protected);
        let mut over = None;
        let mut response = Self::over(manager, document, &mut over, &mut data_transfer, input);
        response.drag_image = started.drag_image;
        self.state = BridgeState::Dragging {
            over,
            data_transfer,
        };
        response
    }

    fn over(
        manager: &mut DragDropManager,
        document: &Document,
        over: &mut Option<ElementId>,
        data_transfer: &mut DataTransfer,
        input: Input,
    ) -> EventResponse {
        let under = document.element_from_point(input.client);
        if under != *over {
            *over = under;
            let mut enter = NativeEvent::new(NativeEventKind::DragEnter, input)
                .with_data_transfer(data_transfer);
            enter.target = under;
            manager.handle(document, enter);
        }
        let mut event =
            NativeEvent::new(NativeEventKind::DragOver, input).with_data_transfer(data_transfer);
        event.target = under;
        manager.handle(document, event)
    }
}
