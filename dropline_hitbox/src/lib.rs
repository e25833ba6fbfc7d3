// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dropline Hitbox: what a drop on a target would mean.
//!
//! Drop targets only know that the pointer is somewhere over them. Lists and
//! trees need more: is the pointer nearer the top or the bottom edge, should
//! the dragged item nest inside this one, which index does it end up at.
//! These helpers compute that from the target's client rectangle (passed to
//! `get_data` as [`DropTargetArgs::rect`](dropline_core::DropTargetArgs::rect))
//! and the pointer, and store the answer in the target's
//! [`Data`](dropline_core::Data) so every callback sees the same result.
//!
//! - [`attach_closest_edge`] / [`extract_closest_edge`]: nearest allowed [`Edge`].
//! - [`get_reorder_destination_index`]: final index for a reorder within one list.
//! - [`list_item`]: reorder before, combine, or reorder after.
//! - [`tree_item`]: reorder above or below, make child, or reparent.
//!
//! ## Minimal example
//!
//! ```rust
//! use dropline_core::{Data, Input};
//! use dropline_hitbox::{Edge, attach_closest_edge, extract_closest_edge};
//! use kurbo::Rect;
//!
//! let card = Rect::new(0., 0., 200., 40.);
//! let data = attach_closest_edge(
//!     Data::new(),
//!     card,
//!     &Input::at((100., 30.)),
//!     &[Edge::Top, Edge::Bottom],
//! );
//! assert_eq!(extract_closest_edge(&data), Some(Edge::Bottom));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod closest_edge;
pub mod list_item;
pub mod tree_item;

pub use closest_edge::{
    Axis, CLOSEST_EDGE_KEY, Edge, ReorderDestination, attach_closest_edge, closest_edge,
    extract_closest_edge, get_reorder_destination_index,
};
