// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drop target registrations, resolution, and fan-out.
//!
//! ## Resolution
//!
//! [`DropTargetRegistry::resolve`] turns "the element under the pointer" into
//! the ordered stack of active drop targets:
//!
//! 1) Walk from the element up through its ancestors. Each registered target
//!    whose `can_drop` accepts the drag contributes a [`DropTargetRecord`].
//!    A refusing target is skipped, but its ancestors are still considered.
//! 2) If the fresh stack is shorter than the current one, sticky targets may
//!    be retained (see [`DropTargetRegistry::resolve`]).
//!
//! ## Fan-out
//!
//! On [`EventKind::DropTargetChange`], previous targets are visited first
//! (`on_drop_target_change`, then `on_drag_leave` if they are no longer
//! current), then newly entered targets (`on_drop_target_change`, then
//! `on_drag_enter`). Every other event visits the current stack innermost
//! first.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use dropline_dom::{Document, ElementId};
use hashbrown::HashSet;
use kurbo::Rect;
use smallvec::SmallVec;

use crate::data::Data;
use crate::data_transfer::DropEffect;
use crate::event::{DropTargetEvent, DropTargetRecord, EventKind, EventPayload};
use crate::input::Input;
use crate::registry::{Registry, RegistrationId, RegistryError};

/// Arguments passed to the predicate and data callbacks of a drop target.
#[derive(Debug)]
pub struct DropTargetArgs<'a, S> {
    /// The drop target element.
    pub element: ElementId,
    /// Client rectangle of the element.
    pub rect: Rect,
    /// Input of the event being resolved.
    pub input: &'a Input,
    /// What is being dragged.
    pub source: &'a S,
}

type Predicate<S> = Box<dyn Fn(&DropTargetArgs<'_, S>) -> bool>;
type DataFn<S> = Box<dyn Fn(&DropTargetArgs<'_, S>) -> Data>;
type EffectFn<S> = Box<dyn Fn(&DropTargetArgs<'_, S>) -> DropEffect>;
type TargetHandler<S> = Box<dyn FnMut(&DropTargetEvent<'_, S>)>;

/// A drop target registration.
///
/// Build with [`DropTarget::new`] and the builder methods, then register it
/// with the adapter for the matching source type.
pub struct DropTarget<S> {
    pub(crate) element: ElementId,
    can_drop: Option<Predicate<S>>,
    get_data: Option<DataFn<S>>,
    get_drop_effect: Option<EffectFn<S>>,
    get_is_sticky: Option<Predicate<S>>,
    on_generate_drag_preview: Option<TargetHandler<S>>,
    on_drag_start: Option<TargetHandler<S>>,
    on_drag_enter: Option<TargetHandler<S>>,
    on_drag: Option<TargetHandler<S>>,
    on_drag_leave: Option<TargetHandler<S>>,
    on_drop_target_change: Option<TargetHandler<S>>,
    on_drop: Option<TargetHandler<S>>,
}

impl<S> DropTarget<S> {
    /// A drop target for `element` that accepts everything and has no callbacks.
    pub fn new(element: ElementId) -> Self {
        Self {
            element,
            can_drop: None,
            get_data: None,
            get_drop_effect: None,
            get_is_sticky: None,
            on_generate_drag_preview: None,
            on_drag_start: None,
            on_drag_enter: None,
            on_drag: None,
            on_drag_leave: None,
            on_drop_target_change: None,
            on_drop: None,
        }
    }

    /// The registered element.
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Accept or refuse a drag. Refusing targets are skipped during resolution.
    #[must_use]
    pub fn can_drop(mut self, f: impl Fn(&DropTargetArgs<'_, S>) -> bool + 'static) -> Self {
        self.can_drop = Some(Box::new(f));
        self
    }

    /// Data attached to this target's record, recomputed on every resolution.
    #[must_use]
    pub fn get_data(mut self, f: impl Fn(&DropTargetArgs<'_, S>) -> Data + 'static) -> Self {
        self.get_data = Some(Box::new(f));
        self
    }

    /// Drop effect shown while this target is innermost.
    #[must_use]
    pub fn get_drop_effect(
        mut self,
        f: impl Fn(&DropTargetArgs<'_, S>) -> DropEffect + 'static,
    ) -> Self {
        self.get_drop_effect = Some(Box::new(f));
        self
    }

    /// Whether this target stays active after the pointer leaves it.
    #[must_use]
    pub fn get_is_sticky(mut self, f: impl Fn(&DropTargetArgs<'_, S>) -> bool + 'static) -> Self {
        self.get_is_sticky = Some(Box::new(f));
        self
    }

    /// Called when a drag starts with this target in the initial stack.
    #[must_use]
    pub fn on_generate_drag_preview(
        mut self,
        f: impl FnMut(&DropTargetEvent<'_, S>) + 'static,
    ) -> Self {
        self.on_generate_drag_preview = Some(Box::new(f));
        self
    }

    /// Called one frame after drag start with this target in the initial stack.
    #[must_use]
    pub fn on_drag_start(mut self, f: impl FnMut(&DropTargetEvent<'_, S>) + 'static) -> Self {
        self.on_drag_start = Some(Box::new(f));
        self
    }

    /// Called when this target joins the stack.
    #[must_use]
    pub fn on_drag_enter(mut self, f: impl FnMut(&DropTargetEvent<'_, S>) + 'static) -> Self {
        self.on_drag_enter = Some(Box::new(f));
        self
    }

    /// Called on (throttled) movement while this target is in the stack.
    #[must_use]
    pub fn on_drag(mut self, f: impl FnMut(&DropTargetEvent<'_, S>) + 'static) -> Self {
        self.on_drag = Some(Box::new(f));
        self
    }

    /// Called when this target leaves the stack.
    #[must_use]
    pub fn on_drag_leave(mut self, f: impl FnMut(&DropTargetEvent<'_, S>) + 'static) -> Self {
        self.on_drag_leave = Some(Box::new(f));
        self
    }

    /// Called on any stack change this target was or is part of.
    #[must_use]
    pub fn on_drop_target_change(
        mut self,
        f: impl FnMut(&DropTargetEvent<'_, S>) + 'static,
    ) -> Self {
        self.on_drop_target_change = Some(Box::new(f));
        self
    }

    /// Called when the drag is dropped with this target in the stack.
    #[must_use]
    pub fn on_drop(mut self, f: impl FnMut(&DropTargetEvent<'_, S>) + 'static) -> Self {
        self.on_drop = Some(Box::new(f));
        self
    }

    fn accepts(&self, args: &DropTargetArgs<'_, S>) -> bool {
        self.can_drop.as_ref().is_none_or(|f| f(args))
    }

    fn is_sticky(&self, args: &DropTargetArgs<'_, S>) -> bool {
        self.get_is_sticky.as_ref().is_some_and(|f| f(args))
    }

    fn record(&self, args: &DropTargetArgs<'_, S>, default_effect: DropEffect) -> DropTargetRecord {
        DropTargetRecord {
            element: self.element,
            data: self.get_data.as_ref().map(|f| f(args)).unwrap_or_default(),
            drop_effect: self
                .get_drop_effect
                .as_ref()
                .map_or(default_effect, |f| f(args)),
            is_active_due_to_stickiness: false,
        }
    }

    fn handler(&mut self, kind: EventKind) -> Option<&mut TargetHandler<S>> {
        match kind {
            EventKind::GenerateDragPreview => self.on_generate_drag_preview.as_mut(),
            EventKind::DragStart => self.on_drag_start.as_mut(),
            EventKind::Drag => self.on_drag.as_mut(),
            EventKind::DropTargetChange => self.on_drop_target_change.as_mut(),
            EventKind::Drop => self.on_drop.as_mut(),
        }
    }
}

impl<S> fmt::Debug for DropTarget<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropTarget")
            .field("element", &self.element)
            .field("can_drop", &self.can_drop.is_some())
            .field("get_is_sticky", &self.get_is_sticky.is_some())
            .finish_non_exhaustive()
    }
}

/// All drop targets of one adapter.
#[derive(Debug)]
pub struct DropTargetRegistry<S> {
    entries: Registry<DropTarget<S>>,
    default_drop_effect: DropEffect,
}

impl<S> DropTargetRegistry<S> {
    /// An empty registry whose targets default to `default_drop_effect`.
    pub fn new(default_drop_effect: DropEffect) -> Self {
        Self {
            entries: Registry::new("drop target"),
            default_drop_effect,
        }
    }

    /// Adds a drop target.
    pub fn register(&mut self, target: DropTarget<S>) -> Result<RegistrationId, RegistryError> {
        self.entries.register(target.element, target)
    }

    /// Removes a drop target.
    pub fn unregister(&mut self, id: RegistrationId) -> bool {
        self.entries.unregister(id)
    }

    /// Returns `true` if `element` is a registered drop target.
    pub fn contains(&self, element: ElementId) -> bool {
        self.entries.contains(element)
    }

    /// Number of registered drop targets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no drop targets are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fresh drop targets from `target` upwards, innermost first, without stickiness.
    pub fn actual_drop_targets(
        &self,
        document: &Document,
        source: &S,
        target: Option<ElementId>,
        input: &Input,
    ) -> Vec<DropTargetRecord> {
        let Some(target) = target else {
            return Vec::new();
        };
        document
            .ancestors(target)
            .filter_map(|element| {
                let entry = self.entries.get(element)?;
                let args = DropTargetArgs {
                    element,
                    rect: document.client_rect(element).unwrap_or(Rect::ZERO),
                    input,
                    source,
                };
                entry
                    .accepts(&args)
                    .then(|| entry.record(&args, self.default_drop_effect))
            })
            .collect()
    }

    /// Active drop targets for `target`, honouring stickiness against `current`.
    ///
    /// When fewer targets are found than are currently active, both stacks are
    /// compared outermost first. A level without a fresh record keeps its
    /// previous record only while:
    ///
    /// - the level above it resolved to the same element as before,
    /// - the target is still registered and its element is mounted,
    /// - `can_drop` still accepts the drag, and
    /// - `get_is_sticky` returns `true`.
    ///
    /// The first level that fails stops the walk; retained records are
    /// flagged with `is_active_due_to_stickiness`.
    pub fn resolve(
        &self,
        document: &Document,
        source: &S,
        target: Option<ElementId>,
        input: &Input,
        current: &[DropTargetRecord],
    ) -> Vec<DropTargetRecord> {
        let fresh = self.actual_drop_targets(document, source, target, input);
        if fresh.len() >= current.len() {
            return fresh;
        }

        let last_outer_first: SmallVec<[&DropTargetRecord; 8]> = current.iter().rev().collect();
        let mut fresh_outer_first = fresh.into_iter().rev();
        let mut result: Vec<DropTargetRecord> = Vec::with_capacity(last_outer_first.len());

        for (index, last) in last_outer_first.iter().enumerate() {
            if let Some(next) = fresh_outer_first.next() {
                result.push(next);
                continue;
            }

            let parent = index.checked_sub(1).and_then(|i| result.get(i)).map(|r| r.element);
            let last_parent = index
                .checked_sub(1)
                .and_then(|i| last_outer_first.get(i))
                .map(|r| r.element);
            if parent != last_parent {
                break;
            }

            let Some(entry) = self.entries.get(last.element) else {
                break;
            };
            if !document.is_alive(last.element) {
                break;
            }
            let args = DropTargetArgs {
                element: last.element,
                rect: document.client_rect(last.element).unwrap_or(Rect::ZERO),
                input,
                source,
            };
            if !entry.accepts(&args) || !entry.is_sticky(&args) {
                break;
            }
            log::trace!("keeping sticky drop target {:?}", last.element);
            result.push(DropTargetRecord {
                is_active_due_to_stickiness: true,
                ..(*last).clone()
            });
        }

        result.reverse();
        result
    }

    /// Delivers one lifecycle event to the affected drop targets.
    pub fn dispatch(&mut self, kind: EventKind, payload: &EventPayload<S>) {
        match kind {
            EventKind::DropTargetChange => {
                let location = &payload.location;
                let mut visited: HashSet<ElementId> = HashSet::new();
                for record in &location.previous {
                    visited.insert(record.element);
                    let still_over = location
                        .current
                        .drop_targets
                        .iter()
                        .any(|r| r.element == record.element);
                    let Some(entry) = self.entries.get_mut(record.element) else {
                        continue;
                    };
                    let event = DropTargetEvent {
                        payload,
                        this: record,
                    };
                    if let Some(f) = entry.on_drop_target_change.as_mut() {
                        f(&event);
                    }
                    if !still_over && let Some(f) = entry.on_drag_leave.as_mut() {
                        f(&event);
                    }
                }
                for record in &location.current.drop_targets {
                    if visited.contains(&record.element) {
                        continue;
                    }
                    let Some(entry) = self.entries.get_mut(record.element) else {
                        continue;
                    };
                    let event = DropTargetEvent {
                        payload,
                        this: record,
                    };
                    if let Some(f) = entry.on_drop_target_change.as_mut() {
                        f(&event);
                    }
                    if let Some(f) = entry.on_drag_enter.as_mut() {
                        f(&event);
                    }
                }
            }
            _ => {
                for record in &payload.location.current.drop_targets {
                    let Some(entry) = self.entries.get_mut(record.element) else {
                        continue;
                    };
                    if let Some(f) = entry.handler(kind) {
                        f(&DropTargetEvent {
                            payload,
                            this: record,
                        });
                    }
                }
            }
        }
    }
}
