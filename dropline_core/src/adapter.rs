// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drop targets and monitors for one source type.

use crate::data_transfer::DropEffect;
use crate::dispatch::EventSink;
use crate::drop_target::{DropTarget, DropTargetRegistry};
use crate::event::{EventKind, EventPayload};
use crate::monitor::{Monitor, MonitorId, MonitorRegistry};
use crate::registry::{RegistrationId, RegistryError};

/// The registrations an adapter resolves and dispatches against.
pub(crate) trait DragAdapter<S>: EventSink<S> {
    fn drop_targets(&self) -> &DropTargetRegistry<S>;
}

/// Drop targets and monitors for drags of source type `S`.
///
/// Events reach drop targets first and monitors last.
#[derive(Debug)]
pub struct Adapter<S> {
    drop_targets: DropTargetRegistry<S>,
    monitors: MonitorRegistry<S>,
}

impl<S: Clone> Adapter<S> {
    /// An adapter whose drop targets default to `default_drop_effect`.
    pub fn new(default_drop_effect: DropEffect) -> Self {
        Self {
            drop_targets: DropTargetRegistry::new(default_drop_effect),
            monitors: MonitorRegistry::new(),
        }
    }

    /// Registers a drop target.
    pub fn drop_target(&mut self, target: DropTarget<S>) -> Result<RegistrationId, RegistryError> {
        self.drop_targets.register(target)
    }

    /// Removes a drop target. Returns `false` for stale handles.
    pub fn remove_drop_target(&mut self, id: RegistrationId) -> bool {
        self.drop_targets.unregister(id)
    }

    /// Registers a monitor.
    pub fn monitor(&mut self, monitor: Monitor<S>) -> MonitorId {
        self.monitors.register(monitor)
    }

    /// Removes a monitor.
    pub fn remove_monitor(&mut self, id: MonitorId) -> bool {
        self.monitors.unregister(id)
    }

    /// Registered drop targets.
    pub fn drop_targets(&self) -> &DropTargetRegistry<S> {
        &self.drop_targets
    }

    /// Registered monitors.
    pub fn monitors(&self) -> &MonitorRegistry<S> {
        &self.monitors
    }
}

impl<S: Clone> EventSink<S> for Adapter<S> {
    fn dispatch(&mut self, kind: EventKind, payload: &EventPayload<S>) {
        self.drop_targets.dispatch(kind, payload);
        self.monitors.dispatch(kind, payload);
    }
}

impl<S: Clone> DragAdapter<S> for Adapter<S> {
    fn drop_targets(&self) -> &DropTargetRegistry<S> {
        &self.drop_targets
    }
}
