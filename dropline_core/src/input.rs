// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer input captured from native events.

use dropline_dom::Document;
use kurbo::{Point, Vec2};

bitflags::bitflags! {
    /// Modifier keys held during an event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// `altKey`.
        const ALT   = 0b0001;
        /// `ctrlKey`.
        const CTRL  = 0b0010;
        /// `metaKey`.
        const META  = 0b0100;
        /// `shiftKey`.
        const SHIFT = 0b1000;
    }
}

/// The pointer portion of a native event, as every callback sees it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Input {
    /// Position relative to the viewport (`clientX`, `clientY`).
    pub client: Point,
    /// Position relative to the document (`pageX`, `pageY`).
    pub page: Point,
    /// Position relative to the screen (`screenX`, `screenY`).
    pub screen: Point,
    /// Button that changed state (`button`); `0` is the primary button.
    pub button: i16,
    /// Buttons currently held (`buttons`).
    pub buttons: u16,
    /// Modifier keys.
    pub modifiers: Modifiers,
}

impl Input {
    /// Input at a client position with the primary button held.
    ///
    /// Page and screen positions equal the client position.
    pub fn at(client: impl Into<Point>) -> Self {
        let client = client.into();
        Self {
            client,
            page: client,
            screen: client,
            button: 0,
            buttons: 1,
            modifiers: Modifiers::empty(),
        }
    }

    /// Input at a client position, deriving the page position from the window scroll.
    pub fn in_document(document: &Document, client: impl Into<Point>) -> Self {
        let client = client.into();
        Self {
            page: client + document.window().scroll,
            ..Self::at(client)
        }
    }

    /// Replaces the modifier keys.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Returns a copy moved by `delta` in every coordinate space.
    #[must_use]
    pub fn translated(mut self, delta: Vec2) -> Self {
        self.client += delta;
        self.page += delta;
        self.screen += delta;
        self
    }
}

impl Default for Input {
    fn default() -> Self {
        Self::at(Point::ZERO)
    }
}
