// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registrations keyed by element identity.
//!
//! A [`Registry`] maps an [`ElementId`] to one entry for a single role
//! (draggable, drop target, auto-scroll container, ...). Entries can be added
//! and removed at any time, including in the middle of a drag; every lookup
//! made by the adapters happens at the moment it is needed, so an unmounted
//! registration stops receiving callbacks immediately.

use dropline_dom::{Document, ElementId};
use hashbrown::HashMap;

/// Errors raised by registration calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The element already has a registration for this role.
    #[error("{element:?} is already registered as a {role}")]
    AlreadyRegistered {
        /// The element passed to `register`.
        element: ElementId,
        /// Human readable role of the registry.
        role: &'static str,
    },
}

/// Handle returned by [`Registry::register`].
///
/// Handles carry a serial number so removing an outdated handle never removes
/// a newer registration for the same element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegistrationId {
    element: ElementId,
    serial: u64,
}

impl RegistrationId {
    /// The registered element.
    pub fn element(self) -> ElementId {
        self.element
    }
}

/// One registration per element for a given role.
#[derive(Debug)]
pub struct Registry<T> {
    role: &'static str,
    entries: HashMap<ElementId, (u64, T)>,
    next_serial: u64,
}

impl<T> Registry<T> {
    /// An empty registry for `role` (used in diagnostics).
    pub fn new(role: &'static str) -> Self {
        Self {
            role,
            entries: HashMap::new(),
            next_serial: 1,
        }
    }

    /// Adds a registration for `element`.
    ///
    /// An element can only hold one registration per role; a second call is
    /// rejected and the original registration is kept.
    pub fn register(&mut self, element: ElementId, entry: T) -> Result<RegistrationId, RegistryError> {
        if self.entries.contains_key(&element) {
            log::warn!("{element:?} is already registered as a {}", self.role);
            return Err(RegistryError::AlreadyRegistered {
                element,
                role: self.role,
            });
        }
        let serial = self.next_serial;
        self.next_serial += 1;
        self.entries.insert(element, (serial, entry));
        log::trace!("registered {element:?} as a {}", self.role);
        Ok(RegistrationId { element, serial })
    }

    /// Removes a registration.
    ///
    /// Outdated handles are ignored and return `false`.
    pub fn unregister(&mut self, id: RegistrationId) -> bool {
        match self.entries.get(&id.element) {
            Some((serial, _)) if *serial == id.serial => {
                log::trace!("unregistered {:?} as a {}", id.element, self.role);
                self.entries.remove(&id.element).is_some()
            }
            _ => false,
        }
    }

    /// Entry for `element`.
    pub fn get(&self, element: ElementId) -> Option<&T> {
        self.entries.get(&element).map(|(_, e)| e)
    }

    /// Mutable entry for `element`.
    pub fn get_mut(&mut self, element: ElementId) -> Option<&mut T> {
        self.entries.get_mut(&element).map(|(_, e)| e)
    }

    /// Returns `true` if `element` has a registration.
    pub fn contains(&self, element: ElementId) -> bool {
        self.entries.contains_key(&element)
    }

    /// Nearest registered element from `element` upwards (inclusive), like `Element.closest`.
    pub fn closest(&self, document: &Document, element: ElementId) -> Option<ElementId> {
        document.ancestors(element).find(|a| self.contains(*a))
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no registrations.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops registrations whose element is no longer mounted.
    ///
    /// Returns how many were removed.
    pub fn prune(&mut self, document: &Document) -> usize {
        let before = self.entries.len();
        self.entries.retain(|element, _| document.is_alive(*element));
        let removed = before - self.entries.len();
        if removed > 0 {
            log::debug!("pruned {removed} stale {} registrations", self.role);
        }
        removed
    }
}
