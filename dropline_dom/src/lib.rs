// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dropline DOM: a headless document model for drag and drop.
//!
//! The drag adapters in `dropline_core` need to ask the same questions a browser
//! answers during a native drag: which element is under the pointer, which of
//! its ancestors are registered, where is an element on screen, and can this
//! container still scroll. This crate answers those questions over a small
//! element arena that the host keeps in sync with its real tree.
//!
//! - [`Document`]: element hierarchy, geometry, scroll containers and the window.
//! - [`ElementId`]: generational handle used as the identity key by every registry.
//! - [`ElementNode`]: per-element bounds, optional [`ScrollState`] and [`ElementFlags`].
//! - [`Window`]: viewport size, window scroll and document size.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Rect, Size};
//! use dropline_dom::{Document, ElementNode};
//!
//! let mut doc = Document::new();
//! let list = doc
//!     .insert(None, ElementNode::scroll_container(Rect::new(0.0, 0.0, 200.0, 100.0), Size::new(200.0, 400.0)))
//!     .unwrap();
//! let card = doc
//!     .insert(Some(list), ElementNode::with_bounds(Rect::new(0.0, 0.0, 200.0, 40.0)))
//!     .unwrap();
//!
//! assert_eq!(doc.element_from_point(Point::new(10.0, 10.0)), Some(card));
//! assert!(doc.contains(list, card));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod document;
mod error;
mod types;

pub use document::{Ancestors, Document};
pub use error::DomError;
pub use types::{ElementFlags, ElementId, ElementNode, ScrollDirection, ScrollState, Window};
