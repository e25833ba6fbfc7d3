// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registered droppables and draggables, and destination rules.

use alloc::string::String;
use alloc::vec::Vec;

use dropline_core::{Data, DropTargetRecord};
use dropline_hitbox::{
    Edge, ReorderDestination, extract_closest_edge, get_reorder_destination_index,
};
use hashbrown::HashMap;

use crate::types::{DraggableLocation, DraggableProps, DroppableProps};

pub(crate) const KIND_KEY: &str = "rbd:kind";
pub(crate) const DRAGGABLE_ID_KEY: &str = "rbd:draggable-id";
pub(crate) const DROPPABLE_ID_KEY: &str = "rbd:droppable-id";

const DRAGGABLE_KIND: &str = "draggable";
const DROPPABLE_KIND: &str = "droppable";

/// Everything registered with one context.
///
/// Shared with the core callbacks, which only read it.
#[derive(Debug, Default)]
pub(crate) struct Registrations {
    /// In registration order.
    pub(crate) droppables: Vec<DroppableProps>,
    pub(crate) draggables: HashMap<String, DraggableProps>,
    /// Set while a keyboard drag is in progress.
    pub(crate) keyboard_drag: bool,
}

impl Registrations {
    pub(crate) fn droppable(&self, id: &str) -> Option<&DroppableProps> {
        self.droppables.iter().find(|d| d.droppable_id == id)
    }

    pub(crate) fn droppable_mut(&mut self, id: &str) -> Option<&mut DroppableProps> {
        self.droppables.iter_mut().find(|d| d.droppable_id == id)
    }

    /// Type of the droppable holding `draggable_id`.
    pub(crate) fn type_of(&self, draggable_id: &str) -> Option<&str> {
        let entry = self.draggables.get(draggable_id)?;
        self.droppable(&entry.droppable_id).map(|d| d.type_.as_str())
    }

    pub(crate) fn location_of(&self, draggable_id: &str) -> Option<DraggableLocation> {
        self.draggables.get(draggable_id).map(|entry| DraggableLocation {
            droppable_id: entry.droppable_id.clone(),
            index: entry.index,
        })
    }

    /// Whether `droppable_id` accepts a drag of `draggable_id`.
    pub(crate) fn accepts(&self, droppable_id: &str, draggable_id: &str) -> bool {
        let Some(droppable) = self.droppable(droppable_id) else {
            return false;
        };
        !droppable.is_drop_disabled
            && self.type_of(draggable_id) == Some(droppable.type_.as_str())
    }

    /// Number of draggables in a droppable.
    pub(crate) fn len_of(&self, droppable_id: &str) -> usize {
        self.draggables
            .values()
            .filter(|d| d.droppable_id == droppable_id)
            .count()
    }

    /// Highest index a drag from `source` may take in `droppable_id`.
    pub(crate) fn last_index(&self, droppable_id: &str, source: &DraggableLocation) -> usize {
        let len = self.len_of(droppable_id);
        if droppable_id == source.droppable_id {
            len.saturating_sub(1)
        } else {
            len
        }
    }

    /// Returns `true` when the indices in a droppable are not `0..len`.
    pub(crate) fn has_index_gaps(&self, droppable_id: &str) -> bool {
        let mut indices: Vec<usize> = self
            .draggables
            .values()
            .filter(|d| d.droppable_id == droppable_id)
            .map(|d| d.index)
            .collect();
        indices.sort_unstable();
        indices.iter().enumerate().any(|(i, index)| i != *index)
    }

    /// Destination for a drag from `source` over `targets` (innermost first).
    ///
    /// Over a draggable, the closest edge along the droppable direction picks
    /// the slot before or after it. Over a droppable only, the drag goes to
    /// the end of the list. Otherwise there is no destination.
    pub(crate) fn destination(
        &self,
        source: &DraggableLocation,
        targets: &[DropTargetRecord],
    ) -> Option<DraggableLocation> {
        for record in targets {
            match record.data.get_str(KIND_KEY) {
                Some(DRAGGABLE_KIND) => {
                    let entry = self
                        .draggables
                        .get(record.data.get_str(DRAGGABLE_ID_KEY)?)?;
                    let droppable = self.droppable(&entry.droppable_id)?;
                    let edge = extract_closest_edge(&record.data);
                    let index = if entry.droppable_id == source.droppable_id {
                        get_reorder_destination_index(ReorderDestination {
                            start_index: source.index,
                            index_of_target: entry.index,
                            closest_edge_of_target: edge,
                            axis: droppable.direction.axis(),
                        })
                    } else if matches!(edge, Some(Edge::Bottom | Edge::Right)) {
                        entry.index + 1
                    } else {
                        entry.index
                    };
                    return Some(DraggableLocation {
                        droppable_id: entry.droppable_id.clone(),
                        index,
                    });
                }
                Some(DROPPABLE_KIND) => {
                    let droppable_id = record.data.get_str(DROPPABLE_ID_KEY)?;
                    return Some(DraggableLocation {
                        droppable_id: droppable_id.into(),
                        index: self.last_index(droppable_id, source),
                    });
                }
                _ => {}
            }
        }
        None
    }
}

/// Drop target data for a draggable.
pub(crate) fn draggable_data(draggable_id: &str, droppable_id: &str) -> Data {
    Data::new()
        .with(KIND_KEY, DRAGGABLE_KIND)
        .with(DRAGGABLE_ID_KEY, draggable_id)
        .with(DROPPABLE_ID_KEY, droppable_id)
}

/// Drop target data for a droppable.
pub(crate) fn droppable_data(droppable_id: &str) -> Data {
    Data::new()
        .with(KIND_KEY, DROPPABLE_KIND)
        .with(DROPPABLE_ID_KEY, droppable_id)
}
