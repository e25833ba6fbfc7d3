// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement helpers for custom drag previews.
//!
//! A custom preview is an element the host renders into a container, which
//! the platform then snapshots. Placement decides where the pointer sits on
//! that snapshot and how much padding the container gets. Apply a placement
//! during `on_generate_drag_preview` with [`PreviewPlacement::apply`].

use dropline_dom::{Document, ElementId};
use kurbo::{Size, Vec2};

use crate::data_transfer::DragImage;
use crate::event::EventPayload;
use crate::input::Input;

/// Where the pointer sits on a custom preview.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PreviewPlacement {
    /// Pointer position relative to the top-left of the preview container.
    pub offset: Vec2,
    /// Padding the host adds to the top-left of the preview container.
    pub padding: Vec2,
}

impl PreviewPlacement {
    /// Requests `element` as the drag image with this placement.
    ///
    /// Returns `false` outside of `on_generate_drag_preview`.
    pub fn apply<S>(self, payload: &EventPayload<S>, element: ElementId) -> bool {
        payload.set_drag_image(DragImage {
            element,
            offset: self.offset,
        })
    }
}

/// Centers a preview of `preview_size` under the pointer.
pub fn center_under_pointer(preview_size: Size) -> PreviewPlacement {
    PreviewPlacement {
        offset: Vec2::new(preview_size.width / 2., preview_size.height / 2.),
        padding: Vec2::ZERO,
    }
}

/// Keeps the pointer where it grabbed `source`, as the default preview does.
///
/// Falls back to the top-left corner when `source` is no longer mounted.
pub fn preserve_offset_on_source(
    document: &Document,
    source: ElementId,
    input: &Input,
) -> PreviewPlacement {
    let offset = document
        .client_rect(source)
        .map_or(Vec2::ZERO, |rect| input.client - rect.origin());
    PreviewPlacement {
        offset,
        padding: Vec2::ZERO,
    }
}

/// Places the preview below and to the right of the pointer, `gap` away.
pub fn pointer_outside_of_preview(gap: Vec2) -> PreviewPlacement {
    PreviewPlacement {
        offset: Vec2::ZERO,
        padding: gap,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::DragLocationHistory;
    use dropline_dom::ElementNode;
    use kurbo::Rect;

    #[test]
    fn offsets() {
        let mut doc = Document::new();
        let el = doc
            .insert(None, ElementNode::with_bounds(Rect::new(100., 50., 300., 150.)))
            .unwrap();
        assert_eq!(
            center_under_pointer(Size::new(200., 100.)).offset,
            Vec2::new(100., 50.)
        );
        assert_eq!(
            preserve_offset_on_source(&doc, el, &Input::at((110., 70.))).offset,
            Vec2::new(10., 20.)
        );
        let outside = pointer_outside_of_preview(Vec2::new(16., 8.));
        assert_eq!(outside.offset, Vec2::ZERO);
        assert_eq!(outside.padding, Vec2::new(16., 8.));
    }

    #[test]
    fn apply_is_ignored_outside_preview_generation() {
        let mut doc = Document::new();
        let el = doc.insert(None, ElementNode::default()).unwrap();
        let payload = EventPayload::new((), DragLocationHistory::default());
        assert!(!center_under_pointer(Size::new(10., 10.)).apply(&payload, el));
    }
}
