// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

use dropline_core::RegistryError;

/// Errors raised while registering droppables and draggables.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    /// A droppable with this id is already registered.
    #[error("droppable {0:?} is already registered")]
    DuplicateDroppable(String),
    /// A draggable with this id is already registered.
    #[error("draggable {0:?} is already registered")]
    DuplicateDraggable(String),
    /// No droppable with this id is registered.
    #[error("droppable {0:?} is not registered")]
    UnknownDroppable(String),
    /// No draggable with this id is registered.
    #[error("draggable {0:?} is not registered")]
    UnknownDraggable(String),
    /// The element already carries a registration of the same role.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
