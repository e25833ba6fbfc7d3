// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document: element identifiers, flags, and geometry.

use kurbo::{Rect, Size, Vec2};

/// Identifier for an element in a [`Document`](crate::Document).
///
/// This is a small, copyable handle that stays stable while the element is
/// mounted and becomes stale once it is removed.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `ElementId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `ElementId`.
///
/// Registries in `dropline_core` key their entries by `ElementId`, so a stale
/// id can never be confused with an element mounted later in the same slot.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Returns the generation of this handle.
    pub const fn generation(self) -> u32 {
        self.1
    }
}

bitflags::bitflags! {
    /// Element flags controlling point queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// Element participates in [`Document::element_from_point`](crate::Document::element_from_point).
        ///
        /// Clearing this is the equivalent of `pointer-events: none`; children
        /// are still considered.
        const HIT_TESTABLE = 0b0000_0001;
        /// Element is a text node. Text selection drags start from text nodes.
        const TEXT         = 0b0000_0010;
    }
}

impl Default for ElementFlags {
    fn default() -> Self {
        Self::HIT_TESTABLE
    }
}

/// Scroll state for a scroll container.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollState {
    /// Current scroll offset (`scrollLeft`, `scrollTop`).
    pub offset: Vec2,
    /// Full size of the scrollable content (`scrollWidth`, `scrollHeight`).
    pub content_size: Size,
}

/// A direction a container can be scrolled in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScrollDirection {
    /// Towards the top edge (decreasing `y` offset).
    Up,
    /// Towards the bottom edge (increasing `y` offset).
    Down,
    /// Towards the left edge (decreasing `x` offset).
    Left,
    /// Towards the right edge (increasing `x` offset).
    Right,
}

impl ScrollDirection {
    /// All four directions, vertical first.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];
}

/// Per-element data supplied by the host.
#[derive(Clone, Debug)]
pub struct ElementNode {
    /// Border box in document coordinates, before any scrolling is applied.
    pub bounds: Rect,
    /// Present for scroll containers.
    pub scroll: Option<ScrollState>,
    /// Point query flags.
    pub flags: ElementFlags,
}

impl Default for ElementNode {
    fn default() -> Self {
        Self {
            bounds: Rect::ZERO,
            scroll: None,
            flags: ElementFlags::default(),
        }
    }
}

impl ElementNode {
    /// A plain element with the given bounds.
    pub fn with_bounds(bounds: Rect) -> Self {
        Self {
            bounds,
            ..Self::default()
        }
    }

    /// A scroll container with the given bounds and content size.
    pub fn scroll_container(bounds: Rect, content_size: Size) -> Self {
        Self {
            bounds,
            scroll: Some(ScrollState {
                offset: Vec2::ZERO,
                content_size,
            }),
            ..Self::default()
        }
    }

    /// A text node with the given bounds.
    pub fn text(bounds: Rect) -> Self {
        Self {
            bounds,
            scroll: None,
            flags: ElementFlags::HIT_TESTABLE | ElementFlags::TEXT,
        }
    }
}

/// The window hosting the document.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Window {
    /// Size of the visible viewport in CSS pixels.
    pub viewport: Size,
    /// Current window scroll offset (`scrollX`, `scrollY`).
    pub scroll: Vec2,
    /// Full scrollable size of the document.
    pub content_size: Size,
}

impl Window {
    /// A window whose content fits the viewport exactly.
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            scroll: Vec2::ZERO,
            content_size: viewport,
        }
    }

    /// The viewport in client coordinates.
    pub fn viewport_rect(&self) -> Rect {
        Rect::from_origin_size((0.0, 0.0), self.viewport)
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new(Size::new(1024.0, 768.0))
    }
}
