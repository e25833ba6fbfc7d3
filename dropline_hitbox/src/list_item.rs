// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! List item hitbox: reorder before, combine with, or reorder after an item.
//!
//! The item is split into bands along the list axis:
//!
//! ```text
//!  combine offered          combine not offered
//! +----------------+       +----------------+
//! | reorder-before |  1/4  |                |
//! +----------------+       | reorder-before |  1/2
//! |                |       |                |
//! |    combine     |  1/2  +----------------+
//! |                |       |                |
//! +----------------+       | reorder-after  |  1/2
//! | reorder-after  |  1/4  |                |
//! +----------------+       +----------------+
//! ```
//!
//! A reorder operation that is not offered gives its band to its neighbour.
//! A [`Availability::Blocked`] operation keeps its band and produces a
//! blocked instruction, so the UI can show that the drop is refused there.

use dropline_core::{Data, Input};
use kurbo::Rect;

use crate::closest_edge::Axis;

const OPERATION_KEY: &str = "dropline:list-item:operation";
const BLOCKED_KEY: &str = "dropline:list-item:blocked";
const AXIS_KEY: &str = "dropline:list-item:axis";

/// Whether an operation is offered on an item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Availability {
    /// The operation is offered.
    Available,
    /// The operation is not offered; its band goes to a neighbour.
    #[default]
    NotAvailable,
    /// The operation is shown but refused.
    Blocked,
}

impl Availability {
    fn is_offered(self) -> bool {
        self != Self::NotAvailable
    }
}

/// An operation on a list item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Insert before the item.
    ReorderBefore,
    /// Merge with the item.
    Combine,
    /// Insert after the item.
    ReorderAfter,
}

impl Operation {
    fn as_str(self) -> &'static str {
        match self {
            Self::ReorderBefore => "reorder-before",
            Self::Combine => "combine",
            Self::ReorderAfter => "reorder-after",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        [Self::ReorderBefore, Self::Combine, Self::ReorderAfter]
            .into_iter()
            .find(|op| op.as_str() == name)
    }
}

/// The operations offered on an item, plus its layout axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListItemOptions {
    /// Availability of [`Operation::ReorderBefore`].
    pub reorder_before: Availability,
    /// Availability of [`Operation::Combine`].
    pub combine: Availability,
    /// Availability of [`Operation::ReorderAfter`].
    pub reorder_after: Availability,
    /// Layout direction of the list.
    pub axis: Axis,
}

impl ListItemOptions {
    /// Both reorder operations available, no combining.
    pub fn reorder() -> Self {
        Self {
            reorder_before: Availability::Available,
            reorder_after: Availability::Available,
            ..Self::default()
        }
    }

    /// Sets the availability of [`Operation::ReorderBefore`].
    #[must_use]
    pub fn with_reorder_before(mut self, availability: Availability) -> Self {
        self.reorder_before = availability;
        self
    }

    /// Sets the availability of [`Operation::Combine`].
    #[must_use]
    pub fn with_combine(mut self, availability: Availability) -> Self {
        self.combine = availability;
        self
    }

    /// Sets the availability of [`Operation::ReorderAfter`].
    #[must_use]
    pub fn with_reorder_after(mut self, availability: Availability) -> Self {
        self.reorder_after = availability;
        self
    }

    /// Sets the layout axis.
    #[must_use]
    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    fn availability(&self, operation: Operation) -> Availability {
        match operation {
            Operation::ReorderBefore => self.reorder_before,
            Operation::Combine => self.combine,
            Operation::ReorderAfter => self.reorder_after,
        }
    }
}

/// What dropping on a list item would do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListInstruction {
    /// The operation under the pointer.
    pub operation: Operation,
    /// `true` when the operation is shown but refused.
    pub blocked: bool,
    /// Layout direction of the list.
    pub axis: Axis,
}

/// Instruction for the pointer over an item occupying `rect` (client coordinates).
pub fn get_instruction(rect: Rect, input: &Input, options: &ListItemOptions) -> Option<ListInstruction> {
    let (start, size, point) = match options.axis {
        Axis::Vertical => (rect.y0, rect.height(), input.client.y),
        Axis::Horizontal => (rect.x0, rect.width(), input.client.x),
    };
    let offset = point - start;
    let before = options.reorder_before.is_offered();
    let after = options.reorder_after.is_offered();
    let combine = options.combine.is_offered();

    let operation = if combine {
        let band = size / 4.;
        if before && offset < band {
            Operation::ReorderBefore
        } else if after && offset >= size - band {
            Operation::ReorderAfter
        } else {
            Operation::Combine
        }
    } else {
        match (before, after) {
            (true, true) if offset < size / 2. => Operation::ReorderBefore,
            (true, true) => Operation::ReorderAfter,
            (true, false) => Operation::ReorderBefore,
            (false, true) => Operation::ReorderAfter,
            (false, false) => return None,
        }
    };
    Some(ListInstruction {
        operation,
        blocked: options.availability(operation) == Availability::Blocked,
        axis: options.axis,
    })
}

/// Returns `data` with the instruction for an item at `rect` attached.
///
/// Use from a drop target's `get_data`, passing the target's client rectangle.
#[must_use]
pub fn attach_instruction(
    mut data: Data,
    rect: Rect,
    input: &Input,
    options: &ListItemOptions,
) -> Data {
    match get_instruction(rect, input, options) {
        Some(instruction) => {
            data.insert(OPERATION_KEY, instruction.operation.as_str());
            data.insert(BLOCKED_KEY, instruction.blocked);
            data.insert(
                AXIS_KEY,
                match instruction.axis {
                    Axis::Vertical => "vertical",
                    Axis::Horizontal => "horizontal",
                },
            );
        }
        None => log::trace!("list item at {rect:?} offers no operation"),
    }
    data
}

/// Instruction stored by [`attach_instruction`].
pub fn extract_instruction(data: &Data) -> Option<ListInstruction> {
    let operation = Operation::parse(data.get_str(OPERATION_KEY)?)?;
    let axis = match data.get_str(AXIS_KEY)? {
        "horizontal" => Axis::Horizontal,
        _ => Axis::Vertical,
    };
    Some(ListInstruction {
        operation,
        blocked: data.get_bool(BLOCKED_KEY).unwrap_or(false),
        axis,
    })
}
