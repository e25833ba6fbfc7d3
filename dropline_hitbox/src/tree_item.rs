// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree item hitbox: reorder above or below an item, nest inside it, or move
//! out to a shallower level.
//!
//! The item is split into a top quarter, a middle half and a bottom quarter.
//! The top quarter always reorders above and the middle always makes the
//! dragged item a child. The bottom quarter depends on [`ItemMode`]:
//!
//! - [`ItemMode::Standard`]: reorder below.
//! - [`ItemMode::Expanded`]: make child, since the item below is the first child.
//! - [`ItemMode::LastInGroup`]: the horizontal pointer position picks a level.
//!   A level shallower than the item reparents; otherwise reorder below.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `floor`

use alloc::vec::Vec;

use dropline_core::{Data, Input, Value};
use kurbo::Rect;

const TYPE_KEY: &str = "dropline:tree-item:type";
const CURRENT_LEVEL_KEY: &str = "dropline:tree-item:current-level";
const INDENT_KEY: &str = "dropline:tree-item:indent-per-level";
const DESIRED_LEVEL_KEY: &str = "dropline:tree-item:desired-level";
const BLOCKED_KEY: &str = "dropline:tree-item:blocked";

/// Position of the item within its tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ItemMode {
    /// An ordinary item.
    #[default]
    Standard,
    /// An item whose children are shown.
    Expanded,
    /// The last item of its parent's children.
    LastInGroup,
}

/// The kinds of [`Instruction`], used to block some of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InstructionKind {
    /// See [`Instruction::ReorderAbove`].
    ReorderAbove,
    /// See [`Instruction::ReorderBelow`].
    ReorderBelow,
    /// See [`Instruction::MakeChild`].
    MakeChild,
    /// See [`Instruction::Reparent`].
    Reparent,
}

impl InstructionKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::ReorderAbove => "reorder-above",
            Self::ReorderBelow => "reorder-below",
            Self::MakeChild => "make-child",
            Self::Reparent => "reparent",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        [
            Self::ReorderAbove,
            Self::ReorderBelow,
            Self::MakeChild,
            Self::Reparent,
        ]
        .into_iter()
        .find(|kind| kind.as_str() == name)
    }
}

/// A drop operation on a tree item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Instruction {
    /// Insert above the item, at its level.
    ReorderAbove {
        /// Depth of the item, zero for roots.
        current_level: usize,
        /// Indentation in pixels per level.
        indent_per_level: f64,
    },
    /// Insert below the item, at its level.
    ReorderBelow {
        /// Depth of the item, zero for roots.
        current_level: usize,
        /// Indentation in pixels per level.
        indent_per_level: f64,
    },
    /// Insert as the first child of the item.
    MakeChild {
        /// Depth of the item, zero for roots.
        current_level: usize,
        /// Indentation in pixels per level.
        indent_per_level: f64,
    },
    /// Insert after the ancestor of the item at `desired_level`.
    Reparent {
        /// Depth of the item, zero for roots.
        current_level: usize,
        /// Indentation in pixels per level.
        indent_per_level: f64,
        /// Level the dropped item ends up at; less than `current_level`.
        desired_level: usize,
    },
}

impl Instruction {
    /// The kind of this instruction.
    pub fn kind(&self) -> InstructionKind {
        match self {
            Self::ReorderAbove { .. } => InstructionKind::ReorderAbove,
            Self::ReorderBelow { .. } => InstructionKind::ReorderBelow,
            Self::MakeChild { .. } => InstructionKind::MakeChild,
            Self::Reparent { .. } => InstructionKind::Reparent,
        }
    }

    fn levels(&self) -> (usize, f64) {
        match *self {
            Self::ReorderAbove {
                current_level,
                indent_per_level,
            }
            | Self::ReorderBelow {
                current_level,
                indent_per_level,
            }
            | Self::MakeChild {
                current_level,
                indent_per_level,
            }
            | Self::Reparent {
                current_level,
                indent_per_level,
                ..
            } => (current_level, indent_per_level),
        }
    }
}

/// What dropping on a tree item would do.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TreeInstruction {
    /// The instruction is allowed.
    Allowed(Instruction),
    /// The instruction under the pointer is listed in [`TreeItemOptions::block`].
    Blocked {
        /// The instruction that would apply if it were not blocked.
        desired: Instruction,
    },
}

impl TreeInstruction {
    /// The instruction under the pointer, blocked or not.
    pub fn desired(&self) -> Instruction {
        match *self {
            Self::Allowed(instruction) | Self::Blocked { desired: instruction } => instruction,
        }
    }

    /// Returns `true` for [`TreeInstruction::Blocked`].
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }
}

/// Describes a tree item for [`get_instruction`].
#[derive(Clone, Debug, PartialEq)]
pub struct TreeItemOptions {
    /// Depth of the item, zero for roots.
    pub current_level: usize,
    /// Indentation in pixels per level.
    pub indent_per_level: f64,
    /// Position of the item within its tree.
    pub mode: ItemMode,
    /// Instruction kinds that are shown but refused.
    pub block: Vec<InstructionKind>,
}

impl TreeItemOptions {
    /// Options for an item at `current_level`.
    pub fn new(current_level: usize, indent_per_level: f64) -> Self {
        Self {
            current_level,
            indent_per_level,
            mode: ItemMode::Standard,
            block: Vec::new(),
        }
    }

    /// Sets the item mode.
    #[must_use]
    pub fn with_mode(mut self, mode: ItemMode) -> Self {
        self.mode = mode;
        self
    }

    /// Adds an instruction kind to the block list.
    #[must_use]
    pub fn with_blocked(mut self, kind: InstructionKind) -> Self {
        if !self.block.contains(&kind) {
            self.block.push(kind);
        }
        self
    }
}

/// Instruction for the pointer over an item occupying `rect` (client coordinates).
pub fn get_instruction(rect: Rect, input: &Input, options: &TreeItemOptions) -> TreeInstruction {
    let TreeItemOptions {
        current_level,
        indent_per_level,
        mode,
        ..
    } = *options;
    let offset = input.client.y - rect.y0;
    let quarter = rect.height() / 4.;

    let instruction = if offset < quarter {
        Instruction::ReorderAbove {
            current_level,
            indent_per_level,
        }
    } else if offset < rect.height() - quarter {
        Instruction::MakeChild {
            current_level,
            indent_per_level,
        }
    } else {
        match mode {
            ItemMode::Standard => Instruction::ReorderBelow {
                current_level,
                indent_per_level,
            },
            ItemMode::Expanded => Instruction::MakeChild {
                current_level,
                indent_per_level,
            },
            ItemMode::LastInGroup => {
                let desired_level = desired_level(rect, input, indent_per_level, current_level);
                if desired_level < current_level {
                    Instruction::Reparent {
                        current_level,
                        indent_per_level,
                        desired_level,
                    }
                } else {
                    Instruction::ReorderBelow {
                        current_level,
                        indent_per_level,
                    }
                }
            }
        }
    };

    if options.block.contains(&instruction.kind()) {
        TreeInstruction::Blocked {
            desired: instruction,
        }
    } else {
        TreeInstruction::Allowed(instruction)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "the level is floored, non-negative and bounded by the item width"
)]
fn desired_level(rect: Rect, input: &Input, indent_per_level: f64, current_level: usize) -> usize {
    if indent_per_level <= 0. {
        return current_level;
    }
    ((input.client.x - rect.x0) / indent_per_level).floor().max(0.) as usize
}

/// Returns `data` with the instruction for an item at `rect` attached.
///
/// Use from a drop target's `get_data`, passing the target's client rectangle.
#[must_use]
pub fn attach_instruction(
    mut data: Data,
    rect: Rect,
    input: &Input,
    options: &TreeItemOptions,
) -> Data {
    let instruction = get_instruction(rect, input, options);
    let desired = instruction.desired();
    let (current_level, indent_per_level) = desired.levels();
    data.insert(TYPE_KEY, desired.kind().as_str());
    data.insert(CURRENT_LEVEL_KEY, current_level);
    data.insert(INDENT_KEY, indent_per_level);
    data.insert(BLOCKED_KEY, instruction.is_blocked());
    if let Instruction::Reparent { desired_level, .. } = desired {
        data.insert(DESIRED_LEVEL_KEY, desired_level);
    } else {
        data.remove(DESIRED_LEVEL_KEY);
    }
    data
}

/// Instruction stored by [`attach_instruction`].
pub fn extract_instruction(data: &Data) -> Option<TreeInstruction> {
    let kind = InstructionKind::parse(data.get_str(TYPE_KEY)?)?;
    let current_level = usize::try_from(data.get_int(CURRENT_LEVEL_KEY)?).ok()?;
    let indent_per_level = match data.get(INDENT_KEY)? {
        Value::Float(indent) => *indent,
        _ => return None,
    };
    let desired = match kind {
        InstructionKind::ReorderAbove => Instruction::ReorderAbove {
            current_level,
            indent_per_level,
        },
        InstructionKind::ReorderBelow => Instruction::ReorderBelow {
            current_level,
            indent_per_level,
        },
        InstructionKind::MakeChild => Instruction::MakeChild {
            current_level,
            indent_per_level,
        },
        InstructionKind::Reparent => Instruction::Reparent {
            current_level,
            indent_per_level,
            desired_level: usize::try_from(data.get_int(DESIRED_LEVEL_KEY)?).ok()?,
        },
    };
    Some(if data.get_bool(BLOCKED_KEY).unwrap_or(false) {
        TreeInstruction::Blocked { desired }
    } else {
        TreeInstruction::Allowed(desired)
    })
}
