// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text selection adapter: drags of selected text inside the document.

use alloc::string::String;

use dropline_dom::{Document, ElementFlags, ElementId};

use crate::adapter::Adapter;
use crate::data_transfer::{DataTransfer, DropEffect};
use crate::drop_target::DropTarget;
use crate::monitor::Monitor;

/// The source of a text selection drag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextSelectionSource {
    /// The text node the drag started from.
    pub target: ElementId,
    /// The selection as plain text.
    pub plain: String,
    /// The selection as HTML.
    pub html: String,
}

impl TextSelectionSource {
    /// Source for a `dragstart` on `target`, if it is a text node.
    pub fn from_drag_start(
        document: &Document,
        target: ElementId,
        data_transfer: Option<&DataTransfer>,
    ) -> Option<Self> {
        let flags = document.flags(target)?;
        if !flags.contains(ElementFlags::TEXT) {
            return None;
        }
        let read = |media_type: &str| {
            data_transfer
                .and_then(|dt| dt.get_data(media_type))
                .map(String::from)
                .unwrap_or_default()
        };
        Some(Self {
            target,
            plain: read("text/plain"),
            html: read("text/html"),
        })
    }
}

/// A drop target for text selection drags.
pub type TextSelectionDropTarget = DropTarget<TextSelectionSource>;

/// A monitor for text selection drags.
pub type TextSelectionMonitor = Monitor<TextSelectionSource>;

/// Drop targets and monitors for text selection drags.
pub type TextSelectionAdapter = Adapter<TextSelectionSource>;

pub(crate) fn new_adapter() -> TextSelectionAdapter {
    Adapter::new(DropEffect::Move)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dropline_dom::ElementNode;
    use kurbo::Rect;

    #[test]
    fn only_text_nodes_start_selection_drags() {
        let mut doc = Document::new();
        let para = doc.insert(None, ElementNode::default()).unwrap();
        let text = doc
            .insert(Some(para), ElementNode::text(Rect::new(0., 0., 80., 16.)))
            .unwrap();
        let dt = DataTransfer::new()
            .with_data("text/plain", "hi")
            .with_data("text/html", "<b>hi</b>");

        assert_eq!(TextSelectionSource::from_drag_start(&doc, para, Some(&dt)), None);
        let source = TextSelectionSource::from_drag_start(&doc, text, Some(&dt)).unwrap();
        assert_eq!(source.plain, "hi");
        assert_eq!(source.html, "<b>hi</b>");
        assert_eq!(
            TextSelectionSource::from_drag_start(&doc, text, None)
                .unwrap()
                .plain,
            ""
        );
    }
}
