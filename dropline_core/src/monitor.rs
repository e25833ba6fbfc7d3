// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Monitors: observe every drag of a source type, regardless of position.
//!
//! A monitor opts into a drag when the drag starts (through `can_monitor`).
//! Monitors registered while a drag is in flight are checked immediately and
//! join for the remaining events. Removing a monitor takes effect at once.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::event::{EventKind, EventPayload, LifecycleCallbacks};
use crate::input::Input;

/// Arguments passed to `can_monitor`.
#[derive(Debug)]
pub struct MonitorArgs<'a, S> {
    /// What is being dragged.
    pub source: &'a S,
    /// Input when the drag started.
    pub initial: &'a Input,
}

/// Handle returned when registering a monitor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MonitorId(u64);

type MonitorPredicate<S> = Box<dyn Fn(&MonitorArgs<'_, S>) -> bool>;

/// A monitor registration.
pub struct Monitor<S> {
    can_monitor: Option<MonitorPredicate<S>>,
    callbacks: LifecycleCallbacks<S>,
}

impl<S> Default for Monitor<S> {
    fn default() -> Self {
        Self {
            can_monitor: None,
            callbacks: LifecycleCallbacks::default(),
        }
    }
}

impl<S> Monitor<S> {
    /// A monitor that observes every drag and has no callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opt in or out of a drag when it starts.
    #[must_use]
    pub fn can_monitor(mut self, f: impl Fn(&MonitorArgs<'_, S>) -> bool + 'static) -> Self {
        self.can_monitor = Some(Box::new(f));
        self
    }

    /// See [`EventKind::GenerateDragPreview`].
    #[must_use]
    pub fn on_generate_drag_preview(mut self, f: impl FnMut(&EventPayload<S>) + 'static) -> Self {
        self.callbacks.on_generate_drag_preview = Some(Box::new(f));
        self
    }

    /// See [`EventKind::DragStart`].
    #[must_use]
    pub fn on_drag_start(mut self, f: impl FnMut(&EventPayload<S>) + 'static) -> Self {
        self.callbacks.on_drag_start = Some(Box::new(f));
        self
    }

    /// See [`EventKind::Drag`].
    #[must_use]
    pub fn on_drag(mut self, f: impl FnMut(&EventPayload<S>) + 'static) -> Self {
        self.callbacks.on_drag = Some(Box::new(f));
        self
    }

    /// See [`EventKind::DropTargetChange`].
    #[must_use]
    pub fn on_drop_target_change(mut self, f: impl FnMut(&EventPayload<S>) + 'static) -> Self {
        self.callbacks.on_drop_target_change = Some(Box::new(f));
        self
    }

    /// See [`EventKind::Drop`].
    #[must_use]
    pub fn on_drop(mut self, f: impl FnMut(&EventPayload<S>) + 'static) -> Self {
        self.callbacks.on_drop = Some(Box::new(f));
        self
    }

    fn accepts(&self, args: &MonitorArgs<'_, S>) -> bool {
        self.can_monitor.as_ref().is_none_or(|f| f(args))
    }
}

impl<S> fmt::Debug for Monitor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Monitor")
            .field("can_monitor", &self.can_monitor.is_some())
            .field("callbacks", &self.callbacks)
            .finish()
    }
}

struct MonitorEntry<S> {
    id: MonitorId,
    monitor: Monitor<S>,
    active: bool,
}

/// All monitors of one adapter.
pub struct MonitorRegistry<S> {
    entries: Vec<MonitorEntry<S>>,
    next_id: u64,
    drag: Option<(S, Input)>,
}

impl<S> Default for MonitorRegistry<S> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
            drag: None,
        }
    }
}

impl<S: Clone> MonitorRegistry<S> {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a monitor. During a drag it joins immediately if `can_monitor` accepts.
    pub fn register(&mut self, monitor: Monitor<S>) -> MonitorId {
        let id = MonitorId(self.next_id);
        self.next_id += 1;
        let active = self.drag.as_ref().is_some_and(|(source, initial)| {
            monitor.accepts(&MonitorArgs { source, initial })
        });
        if active {
            log::trace!("{id:?} joined an active drag");
        }
        self.entries.push(MonitorEntry {
            id,
            monitor,
            active,
        });
        id
    }

    /// Removes a monitor.
    pub fn unregister(&mut self, id: MonitorId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        before != self.entries.len()
    }

    /// Number of registered monitors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no monitors are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of monitors taking part in the current drag.
    pub fn active_len(&self) -> usize {
        self.entries.iter().filter(|e| e.active).count()
    }

    /// Delivers one lifecycle event to the active monitors.
    ///
    /// [`EventKind::GenerateDragPreview`] starts a drag: monitors are
    /// activated first. [`EventKind::Drop`] ends it: monitors are deactivated
    /// after delivery.
    pub fn dispatch(&mut self, kind: EventKind, payload: &EventPayload<S>) {
        if kind == EventKind::GenerateDragPreview {
            let initial = payload.location.initial.input;
            for entry in &mut self.entries {
                entry.active = entry.monitor.accepts(&MonitorArgs {
                    source: &payload.source,
                    initial: &initial,
                });
            }
            self.drag = Some((payload.source.clone(), initial));
        }
        for entry in self.entries.iter_mut().filter(|e| e.active) {
            entry.monitor.callbacks.call(kind, payload);
        }
        if kind == EventKind::Drop {
            for entry in &mut self.entries {
                entry.active = false;
            }
            self.drag = None;
        }
    }
}

impl<S> fmt::Debug for MonitorRegistry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorRegistry")
            .field("len", &self.entries.len())
            .field("dragging", &self.drag.is_some())
            .finish_non_exhaustive()
    }
}
