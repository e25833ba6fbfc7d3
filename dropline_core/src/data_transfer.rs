// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A model of the native `DataTransfer` object.

use alloc::string::String;
use alloc::vec::Vec;

use dropline_dom::ElementId;
use kurbo::Vec2;

/// Media type written by the element adapter so other listeners (and other
/// windows of the same app) can tell an element drag from an external one.
pub const ELEMENT_DRAG_MARKER: &str = "application/vnd.dropline.element";

/// Pseudo type reported by [`DataTransfer::types`] when files are present.
pub const FILES_TYPE: &str = "Files";

/// Operation a drop target will perform (`dataTransfer.dropEffect`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DropEffect {
    /// Dropping is not allowed.
    None,
    /// Copy the source.
    Copy,
    /// Link to the source.
    Link,
    /// Move the source.
    #[default]
    Move,
}

/// Access mode of the drag data store.
///
/// Browsers only expose the list of types while a drag is over the page and
/// unlock the data itself on `drop`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DataTransferMode {
    /// `dragstart`: data can be written and read.
    #[default]
    ReadWrite,
    /// `dragenter` / `dragover` / `dragleave`: only types are visible.
    Protected,
    /// `drop`: data can be read.
    ReadOnly,
}

/// A file carried by an external drag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NativeFile {
    /// File name.
    pub name: String,
    /// Media type, possibly empty.
    pub media_type: String,
    /// Size in bytes.
    pub size: u64,
}

/// Kind of a [`DataTransferItem`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// A string entry.
    String,
    /// A file.
    File,
}

/// Kind and media type of one entry, visible in every mode (`dataTransfer.items`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DataTransferItem {
    /// String or file.
    pub kind: ItemKind,
    /// Media type, possibly empty for files.
    pub media_type: String,
}

/// A custom drag image: the element to snapshot and where the pointer sits on it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragImage {
    /// Element rendered as the drag preview.
    pub element: ElementId,
    /// Pointer offset from the top-left corner of the preview.
    pub offset: Vec2,
}

/// The drag data store shared between the host and the adapters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataTransfer {
    entries: Vec<(String, String)>,
    files: Vec<NativeFile>,
    mode: DataTransferMode,
    /// Feedback shown by the host for the current position.
    pub drop_effect: DropEffect,
    /// Custom drag image requested during `on_generate_drag_preview`.
    pub drag_image: Option<DragImage>,
}

impl DataTransfer {
    /// An empty, writable data store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`DataTransfer::set_data`] that ignores the mode.
    #[must_use]
    pub fn with_data(mut self, media_type: impl Into<String>, value: impl Into<String>) -> Self {
        self.write(media_type.into(), value.into());
        self
    }

    /// Builder-style file attachment.
    #[must_use]
    pub fn with_file(mut self, file: NativeFile) -> Self {
        self.files.push(file);
        self
    }

    /// Builder-style mode change.
    #[must_use]
    pub fn with_mode(mut self, mode: DataTransferMode) -> Self {
        self.mode = mode;
        self
    }

    /// Current access mode.
    pub fn mode(&self) -> DataTransferMode {
        self.mode
    }

    /// Changes the access mode.
    pub fn set_mode(&mut self, mode: DataTransferMode) {
        self.mode = mode;
    }

    /// Writes a value. Ignored unless the store is [`DataTransferMode::ReadWrite`].
    pub fn set_data(&mut self, media_type: &str, value: &str) -> bool {
        if self.mode != DataTransferMode::ReadWrite {
            log::trace!("ignoring write of {media_type} to a {:?} data transfer", self.mode);
            return false;
        }
        self.write(media_type.into(), value.into());
        true
    }

    /// Reads a value. Returns `None` while the store is protected.
    pub fn get_data(&self, media_type: &str) -> Option<&str> {
        if self.mode == DataTransferMode::Protected {
            return None;
        }
        self.entries
            .iter()
            .find(|(ty, _)| ty == media_type)
            .map(|(_, v)| v.as_str())
    }

    /// Media types present, in insertion order, with [`FILES_TYPE`] last when files are present.
    pub fn types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.entries.iter().map(|(ty, _)| ty.clone()).collect();
        if !self.files.is_empty() {
            types.push(FILES_TYPE.into());
        }
        types
    }

    /// Returns `true` if `media_type` is present.
    pub fn has_type(&self, media_type: &str) -> bool {
        if media_type == FILES_TYPE {
            return !self.files.is_empty();
        }
        self.entries.iter().any(|(ty, _)| ty == media_type)
    }

    /// Files, readable only outside protected mode.
    pub fn files(&self) -> &[NativeFile] {
        if self.mode == DataTransferMode::Protected {
            return &[];
        }
        &self.files
    }

    /// Kind and type of every entry, strings first, regardless of mode.
    pub fn items(&self) -> Vec<DataTransferItem> {
        let strings = self.entries.iter().map(|(ty, _)| DataTransferItem {
            kind: ItemKind::String,
            media_type: ty.clone(),
        });
        let files = self.files.iter().map(|f| DataTransferItem {
            kind: ItemKind::File,
            media_type: f.media_type.clone(),
        });
        strings.chain(files).collect()
    }

    /// Number of files regardless of mode (like `items.length`).
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    fn write(&mut self, media_type: String, value: String) {
        if let Some(entry) = self.entries.iter_mut().find(|(ty, _)| *ty == media_type) {
            entry.1 = value;
        } else {
            self.entries.push((media_type, value));
        }
    }
}
