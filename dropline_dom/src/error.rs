// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::ElementId;

/// Errors returned by mutating [`Document`](crate::Document) operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// The element was removed (or never existed in this document).
    #[error("element {0:?} is not mounted")]
    StaleElement(ElementId),
    /// The element has no scroll state.
    #[error("element {0:?} is not a scroll container")]
    NotScrollable(ElementId),
}
