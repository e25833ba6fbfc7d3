// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Native drag bridge: turns raw drag events into the adapter lifecycle.
//!
//! [`DragDropManager`] owns the three adapters (element, external, and text
//! selection) and at most one active drag. The host forwards every native
//! event through [`DragDropManager::handle`] and calls
//! [`DragDropManager::animation_frame`] once per frame while a drag is active.
//!
//! ## States
//!
//! - Idle: `pointerdown` remembers the pressed element (for drag handles).
//!   `dragstart` may start an element drag, or a text selection drag when the
//!   target is a text node. `dragenter` from outside the window with data
//!   that lacks [`ELEMENT_DRAG_MARKER`] starts an external drag.
//! - Dragging: `dragenter` and `dragover` re-resolve drop targets. Leaving
//!   the window clears them (and cancels an external drag). `drop` finishes
//!   the drag on its drop targets, or cancels it when there are none. A
//!   `dragend`, or any pointer event (which browsers suppress during a native
//!   drag), cancels.
//!
//! A cancelled drag first leaves all drop targets and then delivers `Drop`
//! with an empty stack, so every drag ends with exactly one `Drop`.

use alloc::vec::Vec;

use dropline_dom::{Document, ElementId};

use crate::adapter::DragAdapter;
use crate::data_transfer::{DataTransfer, DragImage, DropEffect, ELEMENT_DRAG_MARKER};
use crate::dispatch::Dispatcher;
use crate::element::{ElementAdapter, ElementSource, StartDecision};
use crate::event::{DragLocation, has_hierarchy_changed};
use crate::external::{self, ExternalAdapter, ExternalSource};
use crate::input::Input;
use crate::monitor::MonitorId;
use crate::registry::RegistrationId;
use crate::text_selection::{self, TextSelectionAdapter, TextSelectionSource};

/// Native events understood by the bridge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NativeEventKind {
    /// `pointerdown`.
    PointerDown,
    /// `pointermove`.
    PointerMove,
    /// `dragstart`.
    DragStart,
    /// `dragenter`.
    DragEnter,
    /// `dragover`.
    DragOver,
    /// `dragleave`.
    DragLeave,
    /// `drop`.
    Drop,
    /// `dragend`.
    DragEnd,
}

/// One native event.
#[derive(Debug)]
pub struct NativeEvent<'a> {
    /// Event type.
    pub kind: NativeEventKind,
    /// Event target. When `None` it is found with `element_from_point`.
    pub target: Option<ElementId>,
    /// `relatedTarget`: for `dragleave`, the element being entered.
    pub related_target: Option<ElementId>,
    /// Pointer input.
    pub input: Input,
    /// The drag data store, for drag events.
    pub data_transfer: Option<&'a mut DataTransfer>,
}

impl<'a> NativeEvent<'a> {
    /// An event without target, related target, or data transfer.
    pub fn new(kind: NativeEventKind, input: Input) -> Self {
        Self {
            kind,
            target: None,
            related_target: None,
            input,
            data_transfer: None,
        }
    }

    /// Sets the target.
    #[must_use]
    pub fn with_target(mut self, target: ElementId) -> Self {
        self.target = Some(target);
        self
    }

    /// Sets the related target.
    #[must_use]
    pub fn with_related_target(mut self, related_target: ElementId) -> Self {
        self.related_target = Some(related_target);
        self
    }

    /// Attaches the drag data store.
    #[must_use]
    pub fn with_data_transfer(mut self, data_transfer: &'a mut DataTransfer) -> Self {
        self.data_transfer = Some(data_transfer);
        self
    }
}

/// What the host should do with the native event after handling.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EventResponse {
    /// Call `preventDefault()`: accept the drop target, or refuse a drag start.
    pub default_prevented: bool,
    /// Drop effect to show, when drop targets are active.
    pub drop_effect: Option<DropEffect>,
    /// Custom drag image requested while the drag started.
    ///
    /// Element and text selection drags also write it to the data transfer.
    /// External drags leave the data transfer alone, since the platform owns
    /// their preview.
    pub drag_image: Option<DragImage>,
}

/// Kind of the active drag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DragKind {
    /// A registered draggable element.
    Element,
    /// Data entering from outside the document.
    External,
    /// Selected text.
    TextSelection,
}

/// Read-only view of an active drag of source type `S`.
#[derive(Debug)]
pub struct DragView<'a, S> {
    /// What is being dragged.
    pub source: &'a S,
    /// Where the drag started.
    pub initial: &'a DragLocation,
    /// Where the drag is now.
    pub current: &'a DragLocation,
    /// `true` until `DragStart` has been delivered.
    pub is_start_pending: bool,
    /// Distinguishes this drag from every other drag of the same manager.
    pub serial: u64,
}

/// A registration made through a [`DragDropManager`].
///
/// Collect these and pass them to [`DragDropManager::cleanup_all`] to remove
/// several registrations at once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cleanup {
    /// An element draggable.
    Draggable(RegistrationId),
    /// An element drop target.
    ElementDropTarget(RegistrationId),
    /// An element monitor.
    ElementMonitor(MonitorId),
    /// An external drop target.
    ExternalDropTarget(RegistrationId),
    /// An external monitor.
    ExternalMonitor(MonitorId),
    /// A text selection drop target.
    TextSelectionDropTarget(RegistrationId),
    /// A text selection monitor.
    TextSelectionMonitor(MonitorId),
}

#[derive(Debug)]
struct ActiveDragState<S> {
    dispatcher: Dispatcher<S>,
    current: DragLocation,
    external: bool,
    serial: u64,
}

impl<S: Clone> ActiveDragState<S> {
    fn view(&self) -> DragView<'_, S> {
        DragView {
            source: self.dispatcher.source(),
            initial: self.dispatcher.initial(),
            current: &self.current,
            is_start_pending: self.dispatcher.is_start_pending(),
            serial: self.serial,
        }
    }
}

#[derive(Debug)]
enum ActiveDrag {
    Element(ActiveDragState<ElementSource>),
    External(ActiveDragState<ExternalSource>),
    TextSelection(ActiveDragState<TextSelectionSource>),
}

impl ActiveDrag {
    fn kind(&self) -> DragKind {
        match self {
            Self::Element(_) => DragKind::Element,
            Self::External(_) => DragKind::External,
            Self::TextSelection(_) => DragKind::TextSelection,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Finish,
}

/// Adapters plus the single active drag.
#[derive(Debug)]
pub struct DragDropManager {
    element: ElementAdapter,
    external: ExternalAdapter,
    text_selection: TextSelectionAdapter,
    active: Option<ActiveDrag>,
    pressed: Option<ElementId>,
    drags_started: u64,
}

impl Default for DragDropManager {
    fn default() -> Self {
        Self {
            element: ElementAdapter::new(),
            external: external::new_adapter(),
            text_selection: text_selection::new_adapter(),
            active: None,
            pressed: None,
            drags_started: 0,
        }
    }
}

impl DragDropManager {
    /// A manager with no registrations.
    pub fn new() -> Self {
        Self::default()
    }

    /// The element adapter.
    pub fn element(&self) -> &ElementAdapter {
        &self.element
    }

    /// The element adapter, for registration.
    pub fn element_mut(&mut self) -> &mut ElementAdapter {
        &mut self.element
    }

    /// The external adapter.
    pub fn external(&self) -> &ExternalAdapter {
        &self.external
    }

    /// The external adapter, for registration.
    pub fn external_mut(&mut self) -> &mut ExternalAdapter {
        &mut self.external
    }

    /// The text selection adapter.
    pub fn text_selection(&self) -> &TextSelectionAdapter {
        &self.text_selection
    }

    /// The text selection adapter, for registration.
    pub fn text_selection_mut(&mut self) -> &mut TextSelectionAdapter {
        &mut self.text_selection
    }

    /// Removes one registration. Returns `false` for stale handles.
    pub fn cleanup(&mut self, cleanup: Cleanup) -> bool {
        match cleanup {
            Cleanup::Draggable(id) => self.element.remove_draggable(id),
            Cleanup::ElementDropTarget(id) => self.element.remove_drop_target(id),
            Cleanup::ElementMonitor(id) => self.element.remove_monitor(id),
            Cleanup::ExternalDropTarget(id) => self.external.remove_drop_target(id),
            Cleanup::ExternalMonitor(id) => self.external.remove_monitor(id),
            Cleanup::TextSelectionDropTarget(id) => self.text_selection.remove_drop_target(id),
            Cleanup::TextSelectionMonitor(id) => self.text_selection.remove_monitor(id),
        }
    }

    /// Removes several registrations, returning how many were live.
    pub fn cleanup_all(&mut self, cleanups: impl IntoIterator<Item = Cleanup>) -> usize {
        cleanups
            .into_iter()
            .filter(|c| self.cleanup(*c))
            .count()
    }

    /// Returns `true` while a drag is active.
    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Kind of the active drag.
    pub fn active_kind(&self) -> Option<DragKind> {
        self.active.as_ref().map(ActiveDrag::kind)
    }

    /// Input of the last event handled during the active drag.
    pub fn current_input(&self) -> Option<Input> {
        match &self.active {
            Some(ActiveDrag::Element(state)) => Some(state.current.input),
            Some(ActiveDrag::External(state)) => Some(state.current.input),
            Some(ActiveDrag::TextSelection(state)) => Some(state.current.input),
            None => None,
        }
    }

    /// The active element drag.
    pub fn element_drag(&self) -> Option<DragView<'_, ElementSource>> {
        match &self.active {
            Some(ActiveDrag::Element(state)) => Some(state.view()),
            _ => None,
        }
    }

    /// The active external drag.
    pub fn external_drag(&self) -> Option<DragView<'_, ExternalSource>> {
        match &self.active {
            Some(ActiveDrag::External(state)) => Some(state.view()),
            _ => None,
        }
    }

    /// The active text selection drag.
    pub fn text_selection_drag(&self) -> Option<DragView<'_, TextSelectionSource>> {
        match &self.active {
            Some(ActiveDrag::TextSelection(state)) => Some(state.view()),
            _ => None,
        }
    }

    /// Runs the work scheduled for this animation frame.
    pub fn animation_frame(&mut self) {
        match &mut self.active {
            Some(ActiveDrag::Element(state)) => state.dispatcher.frame(&mut self.element),
            Some(ActiveDrag::External(state)) => state.dispatcher.frame(&mut self.external),
            Some(ActiveDrag::TextSelection(state)) => {
                state.dispatcher.frame(&mut self.text_selection);
            }
            None => {}
        }
    }

    /// Handles one native event.
    pub fn handle(&mut self, document: &Document, mut event: NativeEvent<'_>) -> EventResponse {
        let mut response = EventResponse::default();
        let target = event
            .target
            .filter(|t| document.is_alive(*t))
            .or_else(|| document.element_from_point(event.input.client));

        if self.active.is_none() {
            self.handle_idle(document, &mut event, target, &mut response);
            return response;
        }

        let flow = match &mut self.active {
            Some(ActiveDrag::Element(state)) => step(
                &mut self.element,
                state,
                document,
                &mut event,
                target,
                |_, _| None,
                &mut response,
            ),
            Some(ActiveDrag::External(state)) => step(
                &mut self.external,
                state,
                document,
                &mut event,
                target,
                |source, dt| Some(source.finalized(dt)),
                &mut response,
            ),
            Some(ActiveDrag::TextSelection(state)) => step(
                &mut self.text_selection,
                state,
                document,
                &mut event,
                target,
                |_, _| None,
                &mut response,
            ),
            None => Flow::Continue,
        };
        if flow == Flow::Finish {
            self.finish();
        }
        response
    }

    fn handle_idle(
        &mut self,
        document: &Document,
        event: &mut NativeEvent<'_>,
        target: Option<ElementId>,
        response: &mut EventResponse,
    ) {
        match event.kind {
            NativeEventKind::PointerDown => self.pressed = target,
            NativeEventKind::DragStart => {
                let Some(target) = target else {
                    return;
                };
                if !self.start_element_drag(document, event, target, response) {
                    self.start_text_selection_drag(document, event, target, response);
                }
            }
            NativeEventKind::DragEnter => {
                let entering_window = event.related_target.is_none();
                let external = event
                    .data_transfer
                    .as_deref()
                    .filter(|dt| external::is_external(dt))
                    .map(ExternalSource::entering);
                if let (true, Some(source)) = (entering_window, external) {
                    let serial = self.next_serial();
                    let mut state = begin(
                        &mut self.external,
                        document,
                        source,
                        None,
                        event.input,
                        serial,
                    );
                    log::debug!("external drag entered the window");
                    // The platform owns the preview of external drags, so the
                    // requested image only goes to the host.
                    response.drag_image = state.dispatcher.start(&mut self.external);
                    let flow = step(
                        &mut self.external,
                        &mut state,
                        document,
                        event,
                        target,
                        |_, _| None,
                        response,
                    );
                    if flow == Flow::Continue {
                        self.active = Some(ActiveDrag::External(state));
                    }
                }
            }
            _ => {}
        }
    }

    /// Returns `false` when no draggable is involved.
    fn start_element_drag(
        &mut self,
        document: &Document,
        event: &mut NativeEvent<'_>,
        target: ElementId,
        response: &mut EventResponse,
    ) -> bool {
        let (source, external) =
            match self
                .element
                .prepare_start(document, target, &event.input, self.pressed)
            {
                StartDecision::NotDraggable => return false,
                StartDecision::Refused => {
                    response.default_prevented = true;
                    return true;
                }
                StartDecision::Accepted { source, external } => (source, external),
            };
        if let Some(dt) = event.data_transfer.as_deref_mut() {
            for (media_type, value) in &external {
                dt.set_data(media_type, value);
            }
            dt.set_data(ELEMENT_DRAG_MARKER, "");
        }
        log::debug!("element drag of {:?} started", source.element);
        let serial = self.next_serial();
        let mut state = begin(
            &mut self.element,
            document,
            source,
            Some(target),
            event.input,
            serial,
        );
        let image = state.dispatcher.start(&mut self.element);
        apply_drag_image(event, response, image);
        self.active = Some(ActiveDrag::Element(state));
        true
    }

    fn start_text_selection_drag(
        &mut self,
        document: &Document,
        event: &mut NativeEvent<'_>,
        target: ElementId,
        response: &mut EventResponse,
    ) {
        let Some(source) =
            TextSelectionSource::from_drag_start(document, target, event.data_transfer.as_deref())
        else {
            return;
        };
        log::debug!("text selection drag started from {target:?}");
        let serial = self.next_serial();
        let mut state = begin(
            &mut self.text_selection,
            document,
            source,
            Some(target),
            event.input,
            serial,
        );
        let image = state.dispatcher.start(&mut self.text_selection);
        apply_drag_image(event, response, image);
        self.active = Some(ActiveDrag::TextSelection(state));
    }

    fn next_serial(&mut self) -> u64 {
        self.drags_started += 1;
        self.drags_started
    }

    fn finish(&mut self) {
        if let Some(active) = self.active.take() {
            log::debug!("{:?} drag finished", active.kind());
        }
        self.pressed = None;
    }
}

fn apply_drag_image(event: &mut NativeEvent<'_>, response: &mut EventResponse, image: Option<DragImage>) {
    response.drag_image = image;
    if let (Some(dt), Some(image)) = (event.data_transfer.as_deref_mut(), image) {
        dt.drag_image = Some(image);
    }
}

/// State of a new drag, not yet started. External drags have no `target` and
/// start over no drop targets.
fn begin<S: Clone, A: DragAdapter<S>>(
    adapter: &mut A,
    document: &Document,
    source: S,
    target: Option<ElementId>,
    input: Input,
    serial: u64,
) -> ActiveDragState<S> {
    let external = target.is_none();
    let drop_targets = if external {
        Vec::new()
    } else {
        adapter
            .drop_targets()
            .resolve(document, &source, target, &input, &[])
    };
    let initial = DragLocation {
        input,
        drop_targets,
    };
    ActiveDragState {
        dispatcher: Dispatcher::new(source, initial.clone()),
        current: initial,
        external,
        serial,
    }
}

fn step<S: Clone, A: DragAdapter<S>>(
    adapter: &mut A,
    state: &mut ActiveDragState<S>,
    document: &Document,
    event: &mut NativeEvent<'_>,
    target: Option<ElementId>,
    finalize: impl FnOnce(&S, &DataTransfer) -> Option<S>,
    response: &mut EventResponse,
) -> Flow {
    match event.kind {
        NativeEventKind::PointerDown | NativeEventKind::PointerMove => {
            log::debug!("pointer event during a drag: the drag end was missed");
            state.current.input = event.input;
            cancel(adapter, state);
            Flow::Finish
        }
        NativeEventKind::DragStart => Flow::Continue,
        NativeEventKind::DragEnter | NativeEventKind::DragOver => {
            let drop_targets = adapter.drop_targets().resolve(
                document,
                state.dispatcher.source(),
                target,
                &event.input,
                &state.current.drop_targets,
            );
            let changed = has_hierarchy_changed(&state.current.drop_targets, &drop_targets);
            state.current = DragLocation {
                input: event.input,
                drop_targets,
            };
            if changed {
                state.dispatcher.update(&state.current, adapter);
            }
            if event.kind == NativeEventKind::DragOver {
                state.dispatcher.drag(&state.current);
            }
            accept(state, event, response);
            Flow::Continue
        }
        NativeEventKind::DragLeave => {
            if event.related_target.is_some() {
                return Flow::Continue;
            }
            state.current.input = event.input;
            if state.external {
                cancel(adapter, state);
                return Flow::Finish;
            }
            clear(adapter, state);
            Flow::Continue
        }
        NativeEventKind::Drop => {
            state.current.input = event.input;
            if state.current.drop_targets.is_empty() {
                cancel(adapter, state);
                return Flow::Finish;
            }
            accept(state, event, response);
            let updated = event
                .data_transfer
                .as_deref()
                .and_then(|dt| finalize(state.dispatcher.source(), dt));
            state.dispatcher.drop(&state.current, updated, adapter);
            Flow::Finish
        }
        NativeEventKind::DragEnd => {
            cancel(adapter, state);
            Flow::Finish
        }
    }
}

/// Accepts the event for the innermost drop target, if any.
fn accept<S>(state: &ActiveDragState<S>, event: &mut NativeEvent<'_>, response: &mut EventResponse) {
    let Some(innermost) = state.current.innermost() else {
        return;
    };
    response.default_prevented = true;
    response.drop_effect = Some(innermost.drop_effect);
    if let Some(dt) = event.data_transfer.as_deref_mut() {
        dt.drop_effect = innermost.drop_effect;
    }
}

fn clear<S: Clone, A: DragAdapter<S>>(adapter: &mut A, state: &mut ActiveDragState<S>) {
    if state.current.drop_targets.is_empty() {
        return;
    }
    state.current.drop_targets.clear();
    state.dispatcher.update(&state.current, adapter);
}

fn cancel<S: Clone, A: DragAdapter<S>>(adapter: &mut A, state: &mut ActiveDragState<S>) {
    log::debug!("drag cancelled");
    clear(adapter, state);
    state.dispatcher.drop(&state.current, None, adapter);
}
