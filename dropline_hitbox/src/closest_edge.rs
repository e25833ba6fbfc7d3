// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Closest edge of a drop target, and the reorder index it implies.

use dropline_core::{Data, Input};
use kurbo::{Point, Rect};

/// Key under which [`attach_closest_edge`] stores the edge.
pub const CLOSEST_EDGE_KEY: &str = "dropline:closest-edge";

/// An edge of a rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// The top edge.
    Top,
    /// The right edge.
    Right,
    /// The bottom edge.
    Bottom,
    /// The left edge.
    Left,
}

impl Edge {
    /// Every edge, clockwise from the top.
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    /// Lowercase name, as stored in drop target data.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }

    /// Parses a name produced by [`Edge::as_str`].
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|edge| edge.as_str() == name)
    }

    /// The axis this edge sits across: top and bottom are on the vertical axis.
    pub fn axis(self) -> Axis {
        match self {
            Self::Top | Self::Bottom => Axis::Vertical,
            Self::Left | Self::Right => Axis::Horizontal,
        }
    }

    fn distance(self, rect: Rect, point: Point) -> f64 {
        match self {
            Self::Top => point.y - rect.y0,
            Self::Right => rect.x1 - point.x,
            Self::Bottom => rect.y1 - point.y,
            Self::Left => point.x - rect.x0,
        }
    }
}

/// Direction in which list items are laid out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Items stacked top to bottom.
    #[default]
    Vertical,
    /// Items laid out left to right.
    Horizontal,
}

/// Edge of `rect` in `allowed` nearest to `point`.
///
/// Ties go to the edge listed first. Returns `None` when `allowed` is empty.
pub fn closest_edge(rect: Rect, point: Point, allowed: &[Edge]) -> Option<Edge> {
    let mut best: Option<(Edge, f64)> = None;
    for &edge in allowed {
        let distance = edge.distance(rect, point);
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((edge, distance));
        }
    }
    best.map(|(edge, _)| edge)
}

/// Returns `data` with the edge of `rect` closest to the pointer attached.
///
/// Use from a drop target's `get_data`, passing the target's client rectangle.
/// The data is returned unchanged when no edge is allowed.
#[must_use]
pub fn attach_closest_edge(mut data: Data, rect: Rect, input: &Input, allowed: &[Edge]) -> Data {
    if let Some(edge) = closest_edge(rect, input.client, allowed) {
        data.insert(CLOSEST_EDGE_KEY, edge.as_str());
    }
    data
}

/// Edge stored by [`attach_closest_edge`].
pub fn extract_closest_edge(data: &Data) -> Option<Edge> {
    data.get_str(CLOSEST_EDGE_KEY).and_then(Edge::parse)
}

/// Inputs to [`get_reorder_destination_index`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReorderDestination {
    /// Index of the dragged item.
    pub start_index: usize,
    /// Index of the item being dropped on.
    pub index_of_target: usize,
    /// Edge of the target the drop is closest to.
    pub closest_edge_of_target: Option<Edge>,
    /// Layout direction of the list.
    pub axis: Axis,
}

/// Final index of an item dropped next to a target in the same list.
///
/// Accounts for the dragged item leaving its original slot: moving forward
/// onto the leading edge of a target lands one slot earlier.
pub fn get_reorder_destination_index(args: ReorderDestination) -> usize {
    let ReorderDestination {
        start_index,
        index_of_target,
        closest_edge_of_target,
        axis,
    } = args;
    if start_index == index_of_target {
        return start_index;
    }
    let Some(edge) = closest_edge_of_target else {
        return index_of_target;
    };
    let is_going_after = matches!(
        (axis, edge),
        (Axis::Vertical, Edge::Bottom) | (Axis::Horizontal, Edge::Right)
    );
    let is_moving_forward = start_index < index_of_target;
    match (is_moving_forward, is_going_after) {
        (true, true) => index_of_target,
        (true, false) => index_of_target - 1,
        (false, true) => index_of_target + 1,
        (false, false) => index_of_target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_allowed_edge_wins() {
        let rect = Rect::new(0., 0., 100., 40.);
        let vertical = [Edge::Top, Edge::Bottom];
        assert_eq!(closest_edge(rect, Point::new(50., 10.), &vertical), Some(Edge::Top));
        assert_eq!(closest_edge(rect, Point::new(50., 30.), &vertical), Some(Edge::Bottom));
        assert_eq!(closest_edge(rect, Point::new(2., 20.), &Edge::ALL), Some(Edge::Left));
        assert_eq!(closest_edge(rect, Point::new(2., 20.), &[]), None);
    }

    #[test]
    fn ties_go_to_the_first_allowed_edge() {
        let rect = Rect::new(0., 0., 100., 40.);
        let middle = Point::new(50., 20.);
        assert_eq!(closest_edge(rect, middle, &[Edge::Top, Edge::Bottom]), Some(Edge::Top));
        assert_eq!(closest_edge(rect, middle, &[Edge::Bottom, Edge::Top]), Some(Edge::Bottom));
    }

    #[test]
    fn attach_and_extract() {
        let data = attach_closest_edge(
            Data::new().with("id", 3),
            Rect::new(0., 100., 200., 140.),
            &Input::at((10., 135.)),
            &[Edge::Top, Edge::Bottom],
        );
        assert_eq!(extract_closest_edge(&data), Some(Edge::Bottom));
        assert_eq!(data.get_int("id"), Some(3));
        assert_eq!(extract_closest_edge(&Data::new()), None);
    }

    #[test]
    fn reorder_destination() {
        let index = |start_index, index_of_target, edge| {
            get_reorder_destination_index(ReorderDestination {
                start_index,
                index_of_target,
                closest_edge_of_target: edge,
                axis: Axis::Vertical,
            })
        };
        // Moving forward.
        assert_eq!(index(0, 2, Some(Edge::Top)), 1);
        assert_eq!(index(0, 2, Some(Edge::Bottom)), 2);
        // Moving backward.
        assert_eq!(index(3, 1, Some(Edge::Top)), 1);
        assert_eq!(index(3, 1, Some(Edge::Bottom)), 2);
        // Onto itself, or without an edge.
        assert_eq!(index(2, 2, Some(Edge::Bottom)), 2);
        assert_eq!(index(0, 2, None), 2);
        // Edges off the list axis count as leading edges.
        assert_eq!(index(0, 2, Some(Edge::Right)), 1);
    }
}
