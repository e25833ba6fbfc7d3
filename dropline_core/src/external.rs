// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! External adapter: drags that start outside the document.
//!
//! Files from the desktop, text from another application, or an element drag
//! from another window. While the drag is in flight only the media types are
//! known; the data and files are attached to the source passed to `on_drop`.

use alloc::string::String;
use alloc::vec::Vec;

use crate::adapter::Adapter;
use crate::data_transfer::{
    DataTransfer, DataTransferItem, DropEffect, ELEMENT_DRAG_MARKER, FILES_TYPE, NativeFile,
};
use crate::drop_target::DropTarget;
use crate::monitor::Monitor;

/// The source of an external drag.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExternalSource {
    /// Media types carried by the drag.
    pub types: Vec<String>,
    /// Kind and type of every item.
    pub items: Vec<DataTransferItem>,
    /// Media type and value pairs. Empty until the drop.
    pub data: Vec<(String, String)>,
    /// Files. Empty until the drop.
    pub files: Vec<NativeFile>,
}

impl ExternalSource {
    /// Source for an external drag entering the document.
    pub fn entering(data_transfer: &DataTransfer) -> Self {
        Self {
            types: data_transfer.types(),
            items: data_transfer.items(),
            data: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Copy of this source with the data that became readable on drop.
    #[must_use]
    pub fn finalized(&self, data_transfer: &DataTransfer) -> Self {
        let data = self
            .types
            .iter()
            .filter(|ty| *ty != FILES_TYPE)
            .filter_map(|ty| {
                data_transfer
                    .get_data(ty)
                    .map(|value| (ty.clone(), String::from(value)))
            })
            .collect();
        Self {
            data,
            files: data_transfer.files().to_vec(),
            ..self.clone()
        }
    }

    /// Returns `true` if the drag carries at least one file.
    pub fn contains_files(&self) -> bool {
        self.types.iter().any(|ty| ty == FILES_TYPE)
    }

    /// Returns `true` if the drag carries plain text.
    pub fn contains_text(&self) -> bool {
        self.types.iter().any(|ty| ty == "text/plain")
    }

    /// Returns `true` if the drag carries `media_type`.
    pub fn contains_type(&self, media_type: &str) -> bool {
        self.types.iter().any(|ty| ty == media_type)
    }

    /// Value for `media_type`, available in `on_drop`.
    pub fn get_string_data(&self, media_type: &str) -> Option<&str> {
        self.data
            .iter()
            .find(|(ty, _)| ty == media_type)
            .map(|(_, value)| value.as_str())
    }

    /// Plain text, available in `on_drop`.
    pub fn get_text(&self) -> Option<&str> {
        self.get_string_data("text/plain")
    }

    /// HTML, available in `on_drop`.
    pub fn get_html(&self) -> Option<&str> {
        self.get_string_data("text/html")
    }

    /// Files, available in `on_drop`.
    pub fn get_files(&self) -> &[NativeFile] {
        &self.files
    }
}

/// A drop target for external drags.
pub type ExternalDropTarget = DropTarget<ExternalSource>;

/// A monitor for external drags.
pub type ExternalMonitor = Monitor<ExternalSource>;

/// Drop targets and monitors for external drags.
pub type ExternalAdapter = Adapter<ExternalSource>;

/// Returns `true` if a `dragenter` carrying `data_transfer` starts an external drag.
///
/// Drags started by this document's element adapter carry
/// [`ELEMENT_DRAG_MARKER`] and are ignored.
pub fn is_external(data_transfer: &DataTransfer) -> bool {
    !data_transfer.has_type(ELEMENT_DRAG_MARKER)
}

pub(crate) fn new_adapter() -> ExternalAdapter {
    Adapter::new(DropEffect::Copy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_transfer::DataTransferMode;

    fn transfer() -> DataTransfer {
        DataTransfer::new()
            .with_data("text/plain", "hello")
            .with_data("text/uri-list", "https://example.com")
            .with_file(NativeFile {
                name: "notes.txt".into(),
                media_type: "text/plain".into(),
                size: 12,
            })
            .with_mode(DataTransferMode::Protected)
    }

    #[test]
    fn data_is_hidden_until_drop() {
        let mut dt = transfer();
        let source = ExternalSource::entering(&dt);
        assert!(source.contains_files());
        assert!(source.contains_text());
        assert_eq!(source.get_text(), None);
        assert!(source.get_files().is_empty());

        dt.set_mode(DataTransferMode::ReadOnly);
        let dropped = source.finalized(&dt);
        assert_eq!(dropped.get_text(), Some("hello"));
        assert_eq!(dropped.get_string_data("text/uri-list"), Some("https://example.com"));
        assert_eq!(dropped.get_files()[0].name, "notes.txt");
        assert_eq!(dropped.types, source.types);
    }

    #[test]
    fn own_element_drags_are_not_external() {
        let dt = DataTransfer::new().with_data(ELEMENT_DRAG_MARKER, "");
        assert!(!is_external(&dt));
        assert!(is_external(&transfer()));
    }
}
