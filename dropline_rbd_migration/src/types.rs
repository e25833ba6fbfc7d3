// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

use dropline_dom::ElementId;
use dropline_hitbox::{Axis, Edge};

/// Type used by droppables that do not set one.
pub const DEFAULT_TYPE: &str = "DEFAULT";

/// Layout direction of a droppable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Items stacked top to bottom.
    #[default]
    Vertical,
    /// Items laid out left to right.
    Horizontal,
}

impl Direction {
    pub(crate) fn axis(self) -> Axis {
        match self {
            Self::Vertical => Axis::Vertical,
            Self::Horizontal => Axis::Horizontal,
        }
    }

    pub(crate) fn edges(self) -> [Edge; 2] {
        match self {
            Self::Vertical => [Edge::Top, Edge::Bottom],
            Self::Horizontal => [Edge::Left, Edge::Right],
        }
    }
}

/// How the drag is being moved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MovementMode {
    /// Pointer drags.
    Fluid,
    /// Keyboard drags, moving one slot at a time.
    Snap,
}

/// Why a drag ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DropReason {
    /// The user dropped.
    Drop,
    /// The drag was abandoned.
    Cancel,
}

/// A slot in a droppable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DraggableLocation {
    /// The droppable.
    pub droppable_id: String,
    /// Index within the droppable.
    pub index: usize,
}

/// Passed to `on_before_capture`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BeforeCapture {
    /// The draggable about to be lifted.
    pub draggable_id: String,
    /// How it is being moved.
    pub mode: MovementMode,
}

/// Passed to `on_before_drag_start` and `on_drag_start`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragStart {
    /// The lifted draggable.
    pub draggable_id: String,
    /// Type of its droppable.
    pub type_: String,
    /// Where it was lifted from.
    pub source: DraggableLocation,
    /// How it is being moved.
    pub mode: MovementMode,
}

/// Passed to `on_drag_update`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragUpdate {
    /// The dragged draggable.
    pub draggable_id: String,
    /// Type of its droppable.
    pub type_: String,
    /// Where it was lifted from.
    pub source: DraggableLocation,
    /// How it is being moved.
    pub mode: MovementMode,
    /// Where it would land, if anywhere.
    pub destination: Option<DraggableLocation>,
    /// Always `None`: combining is not supported.
    pub combine: Option<DraggableLocation>,
}

/// Passed to `on_drag_end`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropResult {
    /// The dragged draggable.
    pub draggable_id: String,
    /// Type of its droppable.
    pub type_: String,
    /// Where it was lifted from.
    pub source: DraggableLocation,
    /// How it was moved.
    pub mode: MovementMode,
    /// Where it landed, if anywhere.
    pub destination: Option<DraggableLocation>,
    /// Always `None`: combining is not supported.
    pub combine: Option<DraggableLocation>,
    /// Why the drag ended.
    pub reason: DropReason,
}

/// Registration of a droppable list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DroppableProps {
    /// Unique id.
    pub droppable_id: String,
    /// Only draggables of droppables with the same type can be dropped here.
    pub type_: String,
    /// Layout direction.
    pub direction: Direction,
    /// Refuses every drop while set.
    pub is_drop_disabled: bool,
    /// The list element.
    pub element: ElementId,
}

impl DroppableProps {
    /// A vertical droppable of [`DEFAULT_TYPE`].
    pub fn new(droppable_id: impl Into<String>, element: ElementId) -> Self {
        Self {
            droppable_id: droppable_id.into(),
            type_: DEFAULT_TYPE.into(),
            direction: Direction::Vertical,
            is_drop_disabled: false,
            element,
        }
    }

    /// Sets the type.
    #[must_use]
    pub fn with_type(mut self, type_: impl Into<String>) -> Self {
        self.type_ = type_.into();
        self
    }

    /// Sets the direction.
    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Enables or disables dropping.
    #[must_use]
    pub fn with_drop_disabled(mut self, disabled: bool) -> Self {
        self.is_drop_disabled = disabled;
        self
    }
}

/// Registration of a draggable item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DraggableProps {
    /// Unique id.
    pub draggable_id: String,
    /// The droppable holding the item.
    pub droppable_id: String,
    /// Position in the droppable, counting from zero without gaps.
    pub index: usize,
    /// Refuses to be lifted while set.
    pub is_drag_disabled: bool,
    /// The item element.
    pub element: ElementId,
    /// Restricts lifting to this descendant.
    pub drag_handle: Option<ElementId>,
}

impl DraggableProps {
    /// A draggable at `index` in `droppable_id`.
    pub fn new(
        draggable_id: impl Into<String>,
        droppable_id: impl Into<String>,
        index: usize,
        element: ElementId,
    ) -> Self {
        Self {
            draggable_id: draggable_id.into(),
            droppable_id: droppable_id.into(),
            index,
            is_drag_disabled: false,
            element,
            drag_handle: None,
        }
    }

    /// Enables or disables lifting.
    #[must_use]
    pub fn with_drag_disabled(mut self, disabled: bool) -> Self {
        self.is_drag_disabled = disabled;
        self
    }

    /// Sets the drag handle.
    #[must_use]
    pub fn with_drag_handle(mut self, handle: ElementId) -> Self {
        self.drag_handle = Some(handle);
        self
    }
}

/// Render state of one draggable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DraggableStateSnapshot {
    /// `true` for the draggable being dragged.
    pub is_dragging: bool,
    /// Droppable the dragged item is over.
    pub dragging_over: Option<String>,
    /// Movement mode of the drag, for the dragged item.
    pub mode: Option<MovementMode>,
}

/// Render state of one droppable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DroppableStateSnapshot {
    /// `true` while the destination is in this droppable.
    pub is_dragging_over: bool,
    /// The draggable over this droppable.
    pub dragging_over_with: Option<String>,
    /// The draggable lifted from this droppable.
    pub dragging_from_this_with: Option<String>,
    /// `true` while the dragged item left a gap here that needs a placeholder.
    pub is_using_placeholder: bool,
}

/// Keys handled by the keyboard drag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Lifts and drops.
    Space,
    /// Cancels.
    Escape,
    /// Moves up.
    ArrowUp,
    /// Moves down.
    ArrowDown,
    /// Moves left.
    ArrowLeft,
    /// Moves right.
    ArrowRight,
}
