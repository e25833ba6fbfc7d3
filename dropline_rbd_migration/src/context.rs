// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drag and drop context: registrations, pointer drags, keyboard drags.
//!
//! Pointer drags run through the core [`DragDropManager`]. A single monitor
//! records what the core reports, and the context turns those records into
//! responder calls after each native event and each animation frame.
//! Keyboard drags never touch the core: the context moves the destination
//! one slot per key press.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use dropline_core::{
    Data, DragDropManager, Draggable, DropTargetRecord, ElementDropTarget, ElementMonitor,
    EventResponse, NativeEvent, NativeEventKind, RegistrationId,
};
use dropline_dom::{Document, ElementId};
use dropline_hitbox::attach_closest_edge;
use hashbrown::HashMap;
use log::{debug, trace, warn};

use crate::error::MigrationError;
use crate::responders::Responders;
use crate::state::{DRAGGABLE_ID_KEY, Registrations, draggable_data, droppable_data};
use crate::types::{
    BeforeCapture, Direction, DragStart, DragUpdate, DraggableLocation, DraggableProps,
    DraggableStateSnapshot, DropReason, DropResult, DroppableProps, DroppableStateSnapshot, Key,
    MovementMode,
};

/// What the core reported for the current pointer drag.
#[derive(Debug)]
enum Observed {
    Preview(String),
    Start,
    Location(Vec<DropTargetRecord>),
    Drop(Vec<DropTargetRecord>),
}

type Queue = Rc<RefCell<Vec<Observed>>>;

#[derive(Clone, Copy, Debug)]
struct DraggableHandles {
    draggable: RegistrationId,
    target: RegistrationId,
}

#[derive(Clone, Debug)]
struct ActiveDrag {
    draggable_id: String,
    type_: String,
    source: DraggableLocation,
    mode: MovementMode,
    destination: Option<DraggableLocation>,
}

impl ActiveDrag {
    fn start(&self) -> DragStart {
        DragStart {
            draggable_id: self.draggable_id.clone(),
            type_: self.type_.clone(),
            source: self.source.clone(),
            mode: self.mode,
        }
    }

    fn update(&self) -> DragUpdate {
        DragUpdate {
            draggable_id: self.draggable_id.clone(),
            type_: self.type_.clone(),
            source: self.source.clone(),
            mode: self.mode,
            destination: self.destination.clone(),
            combine: None,
        }
    }

    /// A cancelled drag never has a destination.
    fn result(self, reason: DropReason) -> DropResult {
        DropResult {
            draggable_id: self.draggable_id,
            type_: self.type_,
            source: self.source,
            mode: self.mode,
            destination: match reason {
                DropReason::Drop => self.destination,
                DropReason::Cancel => None,
            },
            combine: None,
            reason,
        }
    }
}

/// Owns every droppable and draggable of one drag and drop area.
///
/// Register droppables before the draggables they hold. Forward native events
/// with [`handle`](Self::handle), call [`animation_frame`](Self::animation_frame)
/// once per frame, and forward key presses with [`key_down`](Self::key_down).
pub struct DragDropContext {
    manager: DragDropManager,
    responders: Responders,
    state: Rc<RefCell<Registrations>>,
    queue: Queue,
    droppable_targets: HashMap<String, RegistrationId>,
    draggable_handles: HashMap<String, DraggableHandles>,
    active: Option<ActiveDrag>,
}

impl core::fmt::Debug for DragDropContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DragDropContext")
            .field("responders", &self.responders)
            .field("droppables", &self.droppable_targets.len())
            .field("draggables", &self.draggable_handles.len())
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl DragDropContext {
    /// An empty context calling `responders`.
    pub fn new(responders: Responders) -> Self {
        let queue = Queue::default();
        let mut manager = DragDropManager::new();
        manager.element_mut().monitor(observer(&queue));
        Self {
            manager,
            responders,
            state: Rc::default(),
            queue,
            droppable_targets: HashMap::new(),
            draggable_handles: HashMap::new(),
            active: None,
        }
    }

    /// The core manager, for reading the active pointer drag (auto-scroll).
    pub fn manager(&self) -> &DragDropManager {
        &self.manager
    }

    /// Returns `true` while a pointer or keyboard drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Registers a droppable.
    pub fn add_droppable(&mut self, props: DroppableProps) -> Result<(), MigrationError> {
        if self.droppable_targets.contains_key(&props.droppable_id) {
            warn!("droppable {:?} registered twice", props.droppable_id);
            return Err(MigrationError::DuplicateDroppable(props.droppable_id));
        }
        let target = self.register_droppable_target(&props)?;
        self.droppable_targets.insert(props.droppable_id.clone(), target);
        self.state.borrow_mut().droppables.push(props);
        Ok(())
    }

    /// Replaces the props of a registered droppable.
    pub fn update_droppable(&mut self, props: DroppableProps) -> Result<(), MigrationError> {
        let Some(&target) = self.droppable_targets.get(&props.droppable_id) else {
            return Err(MigrationError::UnknownDroppable(props.droppable_id));
        };
        if target.element() != props.element {
            self.manager.element_mut().remove_drop_target(target);
            let target = self.register_droppable_target(&props)?;
            self.droppable_targets.insert(props.droppable_id.clone(), target);
        }
        if let Some(slot) = self.state.borrow_mut().droppable_mut(&props.droppable_id) {
            *slot = props;
        }
        Ok(())
    }

    /// Unregisters a droppable. Its draggables stay registered.
    pub fn remove_droppable(
        &mut self,
        droppable_id: &str,
    ) -> Result<DroppableProps, MigrationError> {
        let Some(target) = self.droppable_targets.remove(droppable_id) else {
            return Err(MigrationError::UnknownDroppable(droppable_id.into()));
        };
        self.manager.element_mut().remove_drop_target(target);
        let mut state = self.state.borrow_mut();
        let position = state
            .droppables
            .iter()
            .position(|d| d.droppable_id == droppable_id)
            .ok_or_else(|| MigrationError::UnknownDroppable(droppable_id.into()))?;
        Ok(state.droppables.remove(position))
    }

    /// Registers a draggable inside an already registered droppable.
    pub fn add_draggable(&mut self, props: DraggableProps) -> Result<(), MigrationError> {
        if self.draggable_handles.contains_key(&props.draggable_id) {
            warn!("draggable {:?} registered twice", props.draggable_id);
            return Err(MigrationError::DuplicateDraggable(props.draggable_id));
        }
        if !self.droppable_targets.contains_key(&props.droppable_id) {
            return Err(MigrationError::UnknownDroppable(props.droppable_id));
        }
        let handles = self.register_draggable(&props)?;
        self.draggable_handles.insert(props.draggable_id.clone(), handles);
        self.state
            .borrow_mut()
            .draggables
            .insert(props.draggable_id.clone(), props);
        Ok(())
    }

    /// Replaces the props of a registered draggable, for example after a reorder.
    pub fn update_draggable(&mut self, props: DraggableProps) -> Result<(), MigrationError> {
        let Some(&handles) = self.draggable_handles.get(&props.draggable_id) else {
            return Err(MigrationError::UnknownDraggable(props.draggable_id));
        };
        if !self.droppable_targets.contains_key(&props.droppable_id) {
            return Err(MigrationError::UnknownDroppable(props.droppable_id));
        }
        let previous = self.state.borrow().draggables.get(&props.draggable_id).cloned();
        let rebind = previous.is_none_or(|previous| {
            previous.element != props.element || previous.drag_handle != props.drag_handle
        });
        if rebind {
            self.unregister_draggable(handles);
            let handles = self.register_draggable(&props)?;
            self.draggable_handles.insert(props.draggable_id.clone(), handles);
        }
        self.state
            .borrow_mut()
            .draggables
            .insert(props.draggable_id.clone(), props);
        Ok(())
    }

    /// Unregisters a draggable.
    pub fn remove_draggable(
        &mut self,
        draggable_id: &str,
    ) -> Result<DraggableProps, MigrationError> {
        let Some(handles) = self.draggable_handles.remove(draggable_id) else {
            return Err(MigrationError::UnknownDraggable(draggable_id.into()));
        };
        self.unregister_draggable(handles);
        self.state
            .borrow_mut()
            .draggables
            .remove(draggable_id)
            .ok_or_else(|| MigrationError::UnknownDraggable(draggable_id.into()))
    }

    /// Render state of a draggable.
    pub fn draggable_snapshot(&self, draggable_id: &str) -> DraggableStateSnapshot {
        match &self.active {
            Some(drag) if drag.draggable_id == draggable_id => DraggableStateSnapshot {
                is_dragging: true,
                dragging_over: drag.destination.as_ref().map(|d| d.droppable_id.clone()),
                mode: Some(drag.mode),
            },
            _ => DraggableStateSnapshot::default(),
        }
    }

    /// Render state of a droppable.
    pub fn droppable_snapshot(&self, droppable_id: &str) -> DroppableStateSnapshot {
        let Some(drag) = &self.active else {
            return DroppableStateSnapshot::default();
        };
        let is_over = drag
            .destination
            .as_ref()
            .is_some_and(|d| d.droppable_id == droppable_id);
        let is_home = drag.source.droppable_id == droppable_id;
        DroppableStateSnapshot {
            is_dragging_over: is_over,
            dragging_over_with: is_over.then(|| drag.draggable_id.clone()),
            dragging_from_this_with: is_home.then(|| drag.draggable_id.clone()),
            is_using_placeholder: is_over || is_home,
        }
    }

    /// Handles one native event and reports the resulting responder calls.
    pub fn handle(&mut self, document: &Document, event: NativeEvent<'_>) -> EventResponse {
        let kind = event.kind;
        let response = self.manager.handle(document, event);
        self.flush(Some(kind));
        response
    }

    /// Runs the work scheduled for this animation frame.
    pub fn animation_frame(&mut self) {
        self.manager.animation_frame();
        self.flush(None);
    }

    /// Handles a key press while `focused` has focus.
    ///
    /// Returns `true` when the key was used, in which case the host should
    /// prevent its default action.
    pub fn key_down(&mut self, key: Key, focused: Option<ElementId>) -> bool {
        match (self.active.as_ref().map(|drag| drag.mode), key) {
            (None, Key::Space) => focused.is_some_and(|focused| self.lift(focused)),
            (None, _) | (Some(MovementMode::Fluid), _) => false,
            (Some(MovementMode::Snap), Key::Space) => {
                self.end(DropReason::Drop);
                true
            }
            (Some(MovementMode::Snap), Key::Escape) => {
                self.end(DropReason::Cancel);
                true
            }
            (Some(MovementMode::Snap), _) => self.step(key),
        }
    }

    fn register_droppable_target(
        &mut self,
        props: &DroppableProps,
    ) -> Result<RegistrationId, MigrationError> {
        let (state, id) = (self.state.clone(), props.droppable_id.clone());
        let data_id = id.clone();
        let target = ElementDropTarget::new(props.element)
            .can_drop(move |args| {
                args.source
                    .data
                    .get_str(DRAGGABLE_ID_KEY)
                    .is_some_and(|dragged| state.borrow().accepts(&id, dragged))
            })
            .get_data(move |_| droppable_data(&data_id));
        Ok(self.manager.element_mut().drop_target(target)?)
    }

    fn register_draggable(
        &mut self,
        props: &DraggableProps,
    ) -> Result<DraggableHandles, MigrationError> {
        let (state, id) = (self.state.clone(), props.draggable_id.clone());
        let data_id = id.clone();
        let mut draggable = Draggable::new(props.element)
            .can_drag(move |_| {
                let state = state.borrow();
                !state.keyboard_drag
                    && state
                        .draggables
                        .get(&id)
                        .is_some_and(|props| !props.is_drag_disabled)
            })
            .get_initial_data(move |_| {
                Data::new().with(DRAGGABLE_ID_KEY, data_id.as_str())
            });
        if let Some(handle) = props.drag_handle {
            draggable = draggable.drag_handle(handle);
        }
        let draggable = self.manager.element_mut().draggable(draggable)?;

        let (state, id) = (self.state.clone(), props.draggable_id.clone());
        let data_state = state.clone();
        let data_id = id.clone();
        let target = ElementDropTarget::new(props.element)
            .can_drop(move |args| {
                let state = state.borrow();
                let (Some(dragged), Some(props)) = (
                    args.source.data.get_str(DRAGGABLE_ID_KEY),
                    state.draggables.get(&id),
                ) else {
                    return false;
                };
                state.accepts(&props.droppable_id, dragged)
            })
            .get_data(move |args| {
                let state = data_state.borrow();
                let Some(props) = state.draggables.get(&data_id) else {
                    return Data::new();
                };
                let direction = state
                    .droppable(&props.droppable_id)
                    .map_or(Direction::Vertical, |d| d.direction);
                attach_closest_edge(
                    draggable_data(&data_id, &props.droppable_id),
                    args.rect,
                    args.input,
                    &direction.edges(),
                )
            });
        match self.manager.element_mut().drop_target(target) {
            Ok(target) => Ok(DraggableHandles { draggable, target }),
            Err(err) => {
                self.manager.element_mut().remove_draggable(draggable);
                Err(err.into())
            }
        }
    }

    fn unregister_draggable(&mut self, handles: DraggableHandles) {
        let element = self.manager.element_mut();
        element.remove_draggable(handles.draggable);
        element.remove_drop_target(handles.target);
    }

    /// Turns what the core reported into responder calls.
    fn flush(&mut self, native: Option<NativeEventKind>) {
        let observed = core::mem::take(&mut *self.queue.borrow_mut());
        // A drop supersedes the target changes reported alongside it.
        let ends = observed.iter().any(|o| matches!(o, Observed::Drop(_)));
        for observed in observed {
            match observed {
                Observed::Preview(draggable_id) => {
                    self.capture(draggable_id, MovementMode::Fluid);
                }
                Observed::Start => {
                    if let Some(drag) = &self.active {
                        let start = drag.start();
                        self.responders.before_drag_start(&start);
                        self.responders.drag_start(&start);
                    }
                }
                Observed::Location(_) if ends => {}
                Observed::Location(targets) => {
                    let destination = self.destination(&targets);
                    self.set_destination(destination);
                }
                // Only a native drop counts as a drop, even over nothing.
                Observed::Drop(targets) if native == Some(NativeEventKind::Drop) => {
                    let destination = self.destination(&targets);
                    if let Some(drag) = &mut self.active {
                        drag.destination = destination;
                    }
                    self.end(DropReason::Drop);
                }
                Observed::Drop(_) => self.end(DropReason::Cancel),
            }
        }
    }

    fn destination(&self, targets: &[DropTargetRecord]) -> Option<DraggableLocation> {
        let drag = self.active.as_ref()?;
        self.state.borrow().destination(&drag.source, targets)
    }

    /// Starts tracking a drag and calls `on_before_capture`.
    ///
    /// Returns `false` when the draggable is no longer registered.
    fn capture(&mut self, draggable_id: String, mode: MovementMode) -> bool {
        let (source, type_) = {
            let state = self.state.borrow();
            let (Some(source), Some(type_)) =
                (state.location_of(&draggable_id), state.type_of(&draggable_id))
            else {
                trace!("drag of unregistered draggable {draggable_id:?} ignored");
                return false;
            };
            if state.has_index_gaps(&source.droppable_id) {
                warn!(
                    "draggables of droppable {:?} do not have consecutive indices",
                    source.droppable_id
                );
            }
            (source, String::from(type_))
        };
        debug!("{mode:?} drag of {draggable_id:?} from {source:?}");
        self.responders.before_capture(&BeforeCapture {
            draggable_id: draggable_id.clone(),
            mode,
        });
        self.active = Some(ActiveDrag {
            draggable_id,
            type_,
            destination: Some(source.clone()),
            source,
            mode,
        });
        true
    }

    fn set_destination(&mut self, destination: Option<DraggableLocation>) {
        let Some(drag) = &mut self.active else {
            return;
        };
        if drag.destination == destination {
            return;
        }
        trace!("{:?} now heading to {destination:?}", drag.draggable_id);
        drag.destination = destination;
        let update = drag.update();
        self.responders.drag_update(&update);
    }

    fn end(&mut self, reason: DropReason) {
        let Some(drag) = self.active.take() else {
            return;
        };
        self.state.borrow_mut().keyboard_drag = false;
        let result = drag.result(reason);
        debug!(
            "drag of {:?} ended ({:?}) at {:?}",
            result.draggable_id, result.reason, result.destination
        );
        self.responders.drag_end(&result);
    }

    /// Lifts the draggable owning `focused` for a keyboard drag.
    fn lift(&mut self, focused: ElementId) -> bool {
        if self.manager.is_dragging() {
            return false;
        }
        let draggable_id = {
            let state = self.state.borrow();
            let Some(props) = state.draggables.values().find(|props| {
                props.element == focused || props.drag_handle == Some(focused)
            }) else {
                return false;
            };
            if props.is_drag_disabled {
                debug!("{:?} refused to be lifted", props.draggable_id);
                return false;
            }
            props.draggable_id.clone()
        };
        if !self.capture(draggable_id, MovementMode::Snap) {
            return false;
        }
        self.state.borrow_mut().keyboard_drag = true;
        if let Some(drag) = &self.active {
            let start = drag.start();
            self.responders.before_drag_start(&start);
            self.responders.drag_start(&start);
        }
        true
    }

    /// Moves a keyboard drag one slot.
    fn step(&mut self, key: Key) -> bool {
        let Some(drag) = &self.active else {
            return false;
        };
        let state = self.state.borrow();
        let Some(current) = drag.destination.clone() else {
            return false;
        };
        let Some(droppable) = state.droppable(&current.droppable_id) else {
            return false;
        };
        let (back, forward, previous_list, next_list) = match droppable.direction {
            Direction::Vertical => (Key::ArrowUp, Key::ArrowDown, Key::ArrowLeft, Key::ArrowRight),
            Direction::Horizontal => {
                (Key::ArrowLeft, Key::ArrowRight, Key::ArrowUp, Key::ArrowDown)
            }
        };
        let next = if key == back || key == forward {
            let last = state.last_index(&current.droppable_id, &drag.source);
            let index = if key == back {
                current.index.saturating_sub(1)
            } else {
                (current.index + 1).min(last)
            };
            DraggableLocation { index, ..current }
        } else if key == previous_list || key == next_list {
            let lists: Vec<&str> = state
                .droppables
                .iter()
                .map(|d| d.droppable_id.as_str())
                .filter(|id| *id == current.droppable_id || state.accepts(id, &drag.draggable_id))
                .collect();
            let Some(position) = lists.iter().position(|id| *id == current.droppable_id) else {
                return false;
            };
            let target = if key == previous_list {
                position.checked_sub(1).and_then(|p| lists.get(p))
            } else {
                lists.get(position + 1)
            };
            let Some(target) = target else {
                // Already at the first or last list.
                return true;
            };
            DraggableLocation {
                droppable_id: String::from(*target),
                index: current.index.min(state.last_index(target, &drag.source)),
            }
        } else {
            return false;
        };
        drop(state);
        self.set_destination(Some(next));
        true
    }
}

/// The monitor feeding a context's queue.
fn observer(queue: &Queue) -> ElementMonitor {
    let (preview, start, change, drag, dropped) = (
        queue.clone(),
        queue.clone(),
        queue.clone(),
        queue.clone(),
        queue.clone(),
    );
    ElementMonitor::new()
        .can_monitor(|args| args.source.data.contains_key(DRAGGABLE_ID_KEY))
        .on_generate_drag_preview(move |payload| {
            if let Some(id) = payload.source.data.get_str(DRAGGABLE_ID_KEY) {
                preview.borrow_mut().push(Observed::Preview(id.into()));
            }
        })
        .on_drag_start(move |_| start.borrow_mut().push(Observed::Start))
        .on_drop_target_change(move |payload| {
            let targets = payload.location.current.drop_targets.clone();
            change.borrow_mut().push(Observed::Location(targets));
        })
        .on_drag(move |payload| {
            let targets = payload.location.current.drop_targets.clone();
            drag.borrow_mut().push(Observed::Location(targets));
        })
        .on_drop(move |payload| {
            let targets = payload.location.current.drop_targets.clone();
            dropped.borrow_mut().push(Observed::Drop(targets));
        })
}
