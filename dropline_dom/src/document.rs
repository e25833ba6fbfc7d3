// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The element arena and its queries.

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size, Vec2};
use smallvec::SmallVec;

use crate::error::DomError;
use crate::types::{ElementFlags, ElementId, ElementNode, ScrollDirection, ScrollState, Window};

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    data: Option<ElementData>,
}

#[derive(Clone, Debug)]
struct ElementData {
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    node: ElementNode,
}

/// A headless stand-in for a DOM document.
///
/// Holds the element hierarchy, the border box of each element in document
/// coordinates, scroll containers and the window. Everything the drag
/// adapters need to ask a browser (`closest`, `contains`,
/// `getBoundingClientRect`, `elementFromPoint`, `scrollBy`) is answered here.
///
/// ## Coordinates
///
/// [`ElementNode::bounds`] is in document space. [`Document::client_rect`]
/// subtracts the window scroll and the offset of every scrolling ancestor,
/// which is what a browser reports for `getBoundingClientRect`.
#[derive(Clone, Debug, Default)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<u32>,
    roots: Vec<ElementId>,
    window: Window,
}

impl Document {
    /// Creates an empty document with a default window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty document with the given window.
    pub fn with_window(window: Window) -> Self {
        Self {
            window,
            ..Self::default()
        }
    }

    /// Returns the window.
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Replaces the viewport size; the window scroll is clamped afterwards.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.window.viewport = viewport;
        self.window.scroll = clamp_offset(
            self.window.scroll,
            self.window.content_size,
            self.window.viewport,
        );
    }

    /// Replaces the scrollable document size; the window scroll is clamped afterwards.
    pub fn set_window_content_size(&mut self, content_size: Size) {
        self.window.content_size = content_size;
        self.window.scroll = clamp_offset(
            self.window.scroll,
            self.window.content_size,
            self.window.viewport,
        );
    }

    /// Number of mounted elements.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.data.is_some()).count()
    }

    /// Returns `true` if no elements are mounted.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Mounts a new element under `parent` (or as a new root) and returns its id.
    ///
    /// The element is appended after its existing siblings, so it paints above them.
    pub fn insert(
        &mut self,
        parent: Option<ElementId>,
        node: ElementNode,
    ) -> Result<ElementId, DomError> {
        if let Some(p) = parent
            && !self.is_alive(p)
        {
            return Err(DomError::StaleElement(p));
        }
        let data = ElementData {
            parent,
            children: Vec::new(),
            node,
        };
        let id = if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.data = Some(data);
            ElementId::new(idx, slot.generation)
        } else {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "documents never hold more than u32::MAX elements"
            )]
            let idx = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 1,
                data: Some(data),
            });
            ElementId::new(idx, 1)
        };
        match parent {
            Some(p) => {
                if let Some(pd) = self.data_mut(p) {
                    pd.children.push(id);
                }
            }
            None => self.roots.push(id),
        }
        log::trace!("mounted {id:?} under {parent:?}");
        Ok(id)
    }

    /// Unmounts an element and its whole subtree.
    pub fn remove(&mut self, id: ElementId) -> Result<(), DomError> {
        let parent = self.data(id).ok_or(DomError::StaleElement(id))?.parent;
        match parent {
            Some(p) => {
                if let Some(pd) = self.data_mut(p) {
                    pd.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }
        let mut stack: Vec<ElementId> = Vec::new();
        stack.push(id);
        while let Some(next) = stack.pop() {
            let slot = &mut self.slots[next.idx()];
            if let Some(data) = slot.data.take() {
                stack.extend(data.children);
                self.free.push(next.0);
            }
        }
        log::trace!("unmounted {id:?}");
        Ok(())
    }

    /// Returns `true` if `id` refers to a mounted element.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.data(id).is_some()
    }

    /// Parent of a mounted element.
    pub fn parent_of(&self, id: ElementId) -> Option<ElementId> {
        self.data(id)?.parent
    }

    /// Children of a mounted element in paint order; empty for stale ids.
    pub fn children_of(&self, id: ElementId) -> &[ElementId] {
        self.data(id).map(|d| d.children.as_slice()).unwrap_or(&[])
    }

    /// Iterate `id` and then each of its ancestors up to the root.
    ///
    /// Yields nothing for a stale id.
    pub fn ancestors(&self, id: ElementId) -> Ancestors<'_> {
        Ancestors {
            document: self,
            next: self.is_alive(id).then_some(id),
        }
    }

    /// Returns `true` if `node` is `ancestor` or lies inside it (like `Node.contains`).
    pub fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        self.ancestors(node).any(|a| a == ancestor)
    }

    /// Flags of a mounted element.
    pub fn flags(&self, id: ElementId) -> Option<ElementFlags> {
        self.data(id).map(|d| d.node.flags)
    }

    /// Replaces the flags of an element.
    pub fn set_flags(&mut self, id: ElementId, flags: ElementFlags) -> Result<(), DomError> {
        self.data_mut(id).ok_or(DomError::StaleElement(id))?.node.flags = flags;
        Ok(())
    }

    /// Border box in document coordinates.
    pub fn bounds(&self, id: ElementId) -> Option<Rect> {
        self.data(id).map(|d| d.node.bounds)
    }

    /// Replaces the border box of an element (after a host layout pass).
    pub fn set_bounds(&mut self, id: ElementId, bounds: Rect) -> Result<(), DomError> {
        self.data_mut(id).ok_or(DomError::StaleElement(id))?.node.bounds = bounds;
        Ok(())
    }

    /// Scroll state of a scroll container.
    pub fn scroll_state(&self, id: ElementId) -> Option<ScrollState> {
        self.data(id)?.node.scroll
    }

    /// Replaces the scrollable content size of a scroll container.
    pub fn set_content_size(&mut self, id: ElementId, content_size: Size) -> Result<(), DomError> {
        let data = self.data_mut(id).ok_or(DomError::StaleElement(id))?;
        let client = data.node.bounds.size();
        let scroll = data.node.scroll.as_mut().ok_or(DomError::NotScrollable(id))?;
        scroll.content_size = content_size;
        scroll.offset = clamp_offset(scroll.offset, content_size, client);
        Ok(())
    }

    /// The element's border box as the viewport sees it (`getBoundingClientRect`).
    pub fn client_rect(&self, id: ElementId) -> Option<Rect> {
        let bounds = self.bounds(id)?;
        let mut shift = self.window.scroll;
        let mut cursor = self.parent_of(id);
        while let Some(p) = cursor {
            if let Some(scroll) = self.scroll_state(p) {
                shift += scroll.offset;
            }
            cursor = self.parent_of(p);
        }
        Some(bounds - shift)
    }

    /// Topmost hit-testable element under a client-space point.
    ///
    /// Points outside the viewport hit nothing. Elements are clipped by their
    /// scrolling ancestors. Later siblings are above earlier siblings and
    /// children are above their parents.
    pub fn element_from_point(&self, pt: Point) -> Option<ElementId> {
        let viewport = self.window.viewport_rect();
        if !viewport.contains(pt) {
            return None;
        }
        let mut hit = None;
        let mut stack: SmallVec<[(ElementId, Rect); 32]> = SmallVec::new();
        for root in self.roots.iter().rev() {
            stack.push((*root, viewport));
        }
        while let Some((id, clip)) = stack.pop() {
            let Some(data) = self.data(id) else {
                continue;
            };
            let Some(rect) = self.client_rect(id) else {
                continue;
            };
            if data.node.flags.contains(ElementFlags::HIT_TESTABLE) && rect.contains(pt) {
                hit = Some(id);
            }
            let child_clip = if data.node.scroll.is_some() {
                clip.intersect(rect)
            } else {
                clip
            };
            if !child_clip.contains(pt) {
                continue;
            }
            for child in data.children.iter().rev() {
                stack.push((*child, child_clip));
            }
        }
        hit
    }

    /// Scrolls a container by `delta`, clamped to its scrollable range.
    ///
    /// Returns the delta that was actually applied.
    pub fn scroll_by(&mut self, id: ElementId, delta: Vec2) -> Result<Vec2, DomError> {
        let data = self.data_mut(id).ok_or(DomError::StaleElement(id))?;
        let client = data.node.bounds.size();
        let scroll = data.node.scroll.as_mut().ok_or(DomError::NotScrollable(id))?;
        let before = scroll.offset;
        scroll.offset = clamp_offset(before + delta, scroll.content_size, client);
        Ok(scroll.offset - before)
    }

    /// Scrolls the window by `delta`, clamped to the document size.
    ///
    /// Returns the delta that was actually applied.
    pub fn scroll_window_by(&mut self, delta: Vec2) -> Vec2 {
        let before = self.window.scroll;
        self.window.scroll = clamp_offset(
            before + delta,
            self.window.content_size,
            self.window.viewport,
        );
        self.window.scroll - before
    }

    /// Returns `true` if the container has room to scroll in `direction`.
    pub fn can_scroll(&self, id: ElementId, direction: ScrollDirection) -> bool {
        let Some(data) = self.data(id) else {
            return false;
        };
        let Some(scroll) = data.node.scroll else {
            return false;
        };
        has_room(scroll.offset, scroll.content_size, data.node.bounds.size(), direction)
    }

    /// Returns `true` if the window has room to scroll in `direction`.
    pub fn can_scroll_window(&self, direction: ScrollDirection) -> bool {
        has_room(
            self.window.scroll,
            self.window.content_size,
            self.window.viewport,
            direction,
        )
    }

    fn data(&self, id: ElementId) -> Option<&ElementData> {
        let slot = self.slots.get(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.data.as_ref()
    }

    fn data_mut(&mut self, id: ElementId) -> Option<&mut ElementData> {
        let slot = self.slots.get_mut(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.data.as_mut()
    }
}

fn max_offset(content: Size, client: Size) -> Vec2 {
    Vec2::new(
        (content.width - client.width).max(0.0),
        (content.height - client.height).max(0.0),
    )
}

fn clamp_offset(offset: Vec2, content: Size, client: Size) -> Vec2 {
    let max = max_offset(content, client);
    Vec2::new(offset.x.clamp(0.0, max.x), offset.y.clamp(0.0, max.y))
}

fn has_room(offset: Vec2, content: Size, client: Size, direction: ScrollDirection) -> bool {
    let max = max_offset(content, client);
    match direction {
        ScrollDirection::Up => offset.y > 0.0,
        ScrollDirection::Down => offset.y < max.y,
        ScrollDirection::Left => offset.x > 0.0,
        ScrollDirection::Right => offset.x < max.x,
    }
}

/// Iterator over an element and its ancestors, innermost first.
#[derive(Clone, Debug)]
pub struct Ancestors<'a> {
    document: &'a Document,
    next: Option<ElementId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        let current = self.next?;
        self.next = self.document.parent_of(current);
        Some(current)
    }
}
