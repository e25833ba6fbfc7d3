// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element adapter: drags of registered draggable elements.
//!
//! A drag starts from the closest registered [`Draggable`] at or above the
//! native `dragstart` target. The draggable can refuse the drag through
//! `can_drag`, or by having a drag handle that the pointer was not over.
//! Refusals cancel the native drag.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use dropline_dom::{Document, ElementId};

use crate::adapter::{Adapter, DragAdapter};
use crate::data::Data;
use crate::data_transfer::DropEffect;
use crate::dispatch::EventSink;
use crate::drop_target::{DropTarget, DropTargetRegistry};
use crate::event::{EventKind, EventPayload, LifecycleCallbacks};
use crate::input::Input;
use crate::monitor::{Monitor, MonitorId};
use crate::registry::{RegistrationId, Registry, RegistryError};

/// The source of an element drag.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementSource {
    /// The draggable element.
    pub element: ElementId,
    /// The drag handle, if the draggable has one.
    pub drag_handle: Option<ElementId>,
    /// Result of the draggable's `get_initial_data`.
    pub data: Data,
}

/// Arguments passed to a draggable's predicate and data callbacks.
#[derive(Debug)]
pub struct CanDragArgs<'a> {
    /// The draggable element.
    pub element: ElementId,
    /// The drag handle, if any.
    pub drag_handle: Option<ElementId>,
    /// Input of the `dragstart` event.
    pub input: &'a Input,
}

/// A drop target for element drags.
pub type ElementDropTarget = DropTarget<ElementSource>;

/// A monitor for element drags.
pub type ElementMonitor = Monitor<ElementSource>;

type DragPredicate = Box<dyn Fn(&CanDragArgs<'_>) -> bool>;
type InitialData = Box<dyn Fn(&CanDragArgs<'_>) -> Data>;
type ExternalData = Box<dyn Fn(&CanDragArgs<'_>) -> Vec<(String, String)>>;

/// A draggable element registration.
pub struct Draggable {
    element: ElementId,
    drag_handle: Option<ElementId>,
    can_drag: Option<DragPredicate>,
    get_initial_data: Option<InitialData>,
    get_initial_data_for_external: Option<ExternalData>,
    callbacks: LifecycleCallbacks<ElementSource>,
}

impl Draggable {
    /// A draggable for `element` that can always be dragged.
    pub fn new(element: ElementId) -> Self {
        Self {
            element,
            drag_handle: None,
            can_drag: None,
            get_initial_data: None,
            get_initial_data_for_external: None,
            callbacks: LifecycleCallbacks::default(),
        }
    }

    /// The registered element.
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Only start drags when the pointer is over `handle` (or inside it).
    #[must_use]
    pub fn drag_handle(mut self, handle: ElementId) -> Self {
        self.drag_handle = Some(handle);
        self
    }

    /// Allow or refuse a drag when it is about to start.
    #[must_use]
    pub fn can_drag(mut self, f: impl Fn(&CanDragArgs<'_>) -> bool + 'static) -> Self {
        self.can_drag = Some(Box::new(f));
        self
    }

    /// Data attached to [`ElementSource::data`] for the whole drag.
    #[must_use]
    pub fn get_initial_data(mut self, f: impl Fn(&CanDragArgs<'_>) -> Data + 'static) -> Self {
        self.get_initial_data = Some(Box::new(f));
        self
    }

    /// Media type and value pairs written to the native data transfer, for
    /// other windows and applications.
    #[must_use]
    pub fn get_initial_data_for_external(
        mut self,
        f: impl Fn(&CanDragArgs<'_>) -> Vec<(String, String)> + 'static,
    ) -> Self {
        self.get_initial_data_for_external = Some(Box::new(f));
        self
    }

    /// See [`EventKind::GenerateDragPreview`].
    #[must_use]
    pub fn on_generate_drag_preview(
        mut self,
        f: impl FnMut(&EventPayload<ElementSource>) + 'static,
    ) -> Self {
        self.callbacks.on_generate_drag_preview = Some(Box::new(f));
        self
    }

    /// See [`EventKind::DragStart`].
    #[must_use]
    pub fn on_drag_start(mut self, f: impl FnMut(&EventPayload<ElementSource>) + 'static) -> Self {
        self.callbacks.on_drag_start = Some(Box::new(f));
        self
    }

    /// See [`EventKind::Drag`].
    #[must_use]
    pub fn on_drag(mut self, f: impl FnMut(&EventPayload<ElementSource>) + 'static) -> Self {
        self.callbacks.on_drag = Some(Box::new(f));
        self
    }

    /// See [`EventKind::DropTargetChange`].
    #[must_use]
    pub fn on_drop_target_change(
        mut self,
        f: impl FnMut(&EventPayload<ElementSource>) + 'static,
    ) -> Self {
        self.callbacks.on_drop_target_change = Some(Box::new(f));
        self
    }

    /// See [`EventKind::Drop`].
    #[must_use]
    pub fn on_drop(mut self, f: impl FnMut(&EventPayload<ElementSource>) + 'static) -> Self {
        self.callbacks.on_drop = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for Draggable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Draggable")
            .field("element", &self.element)
            .field("drag_handle", &self.drag_handle)
            .field("can_drag", &self.can_drag.is_some())
            .field("callbacks", &self.callbacks)
            .finish_non_exhaustive()
    }
}

/// Outcome of a `dragstart` for the element adapter.
#[derive(Debug)]
pub(crate) enum StartDecision {
    /// No registered draggable at or above the target.
    NotDraggable,
    /// A draggable was found but refused the drag.
    Refused,
    /// The drag starts with this source.
    Accepted {
        source: ElementSource,
        external: Vec<(String, String)>,
    },
}

/// Draggables, drop targets, and monitors for element drags.
#[derive(Debug)]
pub struct ElementAdapter {
    draggables: Registry<Draggable>,
    inner: Adapter<ElementSource>,
}

impl Default for ElementAdapter {
    fn default() -> Self {
        Self {
            draggables: Registry::new("draggable"),
            inner: Adapter::new(DropEffect::Move),
        }
    }
}

impl ElementAdapter {
    /// An adapter with no registrations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a draggable.
    pub fn draggable(&mut self, draggable: Draggable) -> Result<RegistrationId, RegistryError> {
        self.draggables.register(draggable.element, draggable)
    }

    /// Removes a draggable. Returns `false` for stale handles.
    pub fn remove_draggable(&mut self, id: RegistrationId) -> bool {
        self.draggables.unregister(id)
    }

    /// Returns `true` if `element` is a registered draggable.
    pub fn is_draggable(&self, element: ElementId) -> bool {
        self.draggables.contains(element)
    }

    /// Registers a drop target for element drags.
    pub fn drop_target(
        &mut self,
        target: ElementDropTarget,
    ) -> Result<RegistrationId, RegistryError> {
        self.inner.drop_target(target)
    }

    /// Removes a drop target.
    pub fn remove_drop_target(&mut self, id: RegistrationId) -> bool {
        self.inner.remove_drop_target(id)
    }

    /// Registers a monitor for element drags.
    pub fn monitor(&mut self, monitor: ElementMonitor) -> MonitorId {
        self.inner.monitor(monitor)
    }

    /// Removes a monitor.
    pub fn remove_monitor(&mut self, id: MonitorId) -> bool {
        self.inner.remove_monitor(id)
    }

    /// Drops registrations whose elements were removed from `document`.
    pub fn prune(&mut self, document: &Document) -> usize {
        self.draggables.prune(document)
    }

    /// Decides whether a `dragstart` on `target` begins an element drag.
    ///
    /// `pressed` is the element the pointer went down on, used for drag
    /// handle checks before falling back to hit testing.
    pub(crate) fn prepare_start(
        &self,
        document: &Document,
        target: ElementId,
        input: &Input,
        pressed: Option<ElementId>,
    ) -> StartDecision {
        let Some(element) = self.draggables.closest(document, target) else {
            return StartDecision::NotDraggable;
        };
        let Some(draggable) = self.draggables.get(element) else {
            return StartDecision::NotDraggable;
        };
        let args = CanDragArgs {
            element,
            drag_handle: draggable.drag_handle,
            input,
        };
        if !draggable.can_drag.as_ref().is_none_or(|f| f(&args)) {
            log::debug!("{element:?} refused to be dragged");
            return StartDecision::Refused;
        }
        if let Some(handle) = draggable.drag_handle {
            let under = pressed
                .filter(|p| document.is_alive(*p))
                .or_else(|| document.element_from_point(input.client));
            if !under.is_some_and(|u| document.contains(handle, u)) {
                log::debug!("drag of {element:?} did not start from its handle");
                return StartDecision::Refused;
            }
        }
        StartDecision::Accepted {
            source: ElementSource {
                element,
                drag_handle: draggable.drag_handle,
                data: draggable
                    .get_initial_data
                    .as_ref()
                    .map(|f| f(&args))
                    .unwrap_or_default(),
            },
            external: draggable
                .get_initial_data_for_external
                .as_ref()
                .map(|f| f(&args))
                .unwrap_or_default(),
        }
    }
}

impl EventSink<ElementSource> for ElementAdapter {
    fn dispatch(&mut self, kind: EventKind, payload: &EventPayload<ElementSource>) {
        // Looked up per event: an unmounted draggable stops hearing about its drag.
        if let Some(draggable) = self.draggables.get_mut(payload.source.element) {
            draggable.callbacks.call(kind, payload);
        }
        self.inner.dispatch(kind, payload);
    }
}

impl DragAdapter<ElementSource> for ElementAdapter {
    fn drop_targets(&self) -> &DropTargetRegistry<ElementSource> {
        self.inner.drop_targets()
    }
}
