// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Edge hitboxes and the speed curve.

use core::time::Duration;

use dropline_dom::ScrollDirection;
use kurbo::{Point, Rect};

use crate::config::AutoScrollConfig;

/// The pointer inside the hitbox of one edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct EdgeHit {
    pub(crate) direction: ScrollDirection,
    /// Distance from the pointer to the edge.
    pub(crate) distance: f64,
    /// Depth of the hitbox.
    pub(crate) hitbox: f64,
}

/// Quadratic ease-in over `[0, 1]`.
pub(crate) fn ease_in(t: f64) -> f64 {
    t * t
}

/// Top or bottom hitbox of `rect` containing `point`.
pub(crate) fn vertical_edge(rect: Rect, point: Point, config: &AutoScrollConfig) -> Option<EdgeHit> {
    if !rect.contains(point) {
        return None;
    }
    axis_edge(
        rect.y0,
        rect.y1,
        point.y,
        config,
        ScrollDirection::Up,
        ScrollDirection::Down,
    )
}

/// Left or right hitbox of `rect` containing `point`.
pub(crate) fn horizontal_edge(
    rect: Rect,
    point: Point,
    config: &AutoScrollConfig,
) -> Option<EdgeHit> {
    if !rect.contains(point) {
        return None;
    }
    axis_edge(
        rect.x0,
        rect.x1,
        point.x,
        config,
        ScrollDirection::Left,
        ScrollDirection::Right,
    )
}

fn axis_edge(
    start: f64,
    end: f64,
    position: f64,
    config: &AutoScrollConfig,
    backward: ScrollDirection,
    forward: ScrollDirection,
) -> Option<EdgeHit> {
    let hitbox = ((end - start) * config.start_hitbox_at_percentage_remaining)
        .min(config.max_main_axis_hitbox_size);
    if hitbox <= 0. {
        return None;
    }
    let to_start = position - start;
    let to_end = end - position;
    let (direction, distance) = if to_start <= to_end {
        (backward, to_start)
    } else {
        (forward, to_end)
    };
    (distance < hitbox).then_some(EdgeHit {
        direction,
        distance,
        hitbox,
    })
}

/// Undampened step for `hit`, given the maximum step per frame.
pub(crate) fn edge_speed(hit: &EdgeHit, config: &AutoScrollConfig, max_per_frame: f64) -> f64 {
    let full_speed_at = hit.hitbox * config.max_scroll_at_percentage_remaining_of_hitbox;
    let progress = if hit.distance <= full_speed_at {
        1.
    } else {
        (hit.hitbox - hit.distance) / (hit.hitbox - full_speed_at)
    };
    max_per_frame * ease_in(progress.clamp(0., 1.))
}

/// Scales `speed` while a container is still within its ramp-up time.
pub(crate) fn dampen(speed: f64, engaged_for: Duration, config: &AutoScrollConfig) -> f64 {
    let duration = config.time_dampening_duration;
    if duration.is_zero() || engaged_for >= duration {
        return speed;
    }
    speed * ease_in(engaged_for.as_secs_f64() / duration.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST: Rect = Rect::new(0., 0., 200., 400.);

    fn down(y: f64) -> Option<EdgeHit> {
        vertical_edge(LIST, Point::new(100., y), &AutoScrollConfig::default())
    }

    #[test]
    fn hitbox_is_a_quarter_capped_at_the_maximum() {
        assert_eq!(down(200.), None);
        assert_eq!(down(300.5).map(|h| h.direction), Some(ScrollDirection::Down));
        assert_eq!(down(300.), None);
        assert_eq!(down(20.).map(|h| h.direction), Some(ScrollDirection::Up));
        assert_eq!(down(401.), None);

        let tall = Rect::new(0., 0., 200., 2000.);
        let hit = vertical_edge(tall, Point::new(10., 1900.), &AutoScrollConfig::default());
        assert_eq!(hit.map(|h| h.hitbox), Some(180.));
    }

    #[test]
    fn speed_ramps_with_ease_in() {
        let config = AutoScrollConfig::default();
        let speed = |y| edge_speed(&down(y).unwrap(), &config, 20.);
        // 75px from the edge of a 100px hitbox: halfway to full speed.
        assert_eq!(speed(325.), 5.);
        assert_eq!(speed(350.), 20.);
        assert_eq!(speed(399.), 20.);
    }

    #[test]
    fn horizontal_edges() {
        let config = AutoScrollConfig::default();
        let hit = horizontal_edge(LIST, Point::new(190., 200.), &config).unwrap();
        assert_eq!(hit.direction, ScrollDirection::Right);
        assert_eq!(hit.hitbox, 50.);
        assert_eq!(hit.distance, 10.);
    }

    #[test]
    fn dampening_eases_in_over_the_duration() {
        let config = AutoScrollConfig::default();
        assert_eq!(dampen(20., Duration::ZERO, &config), 0.);
        assert_eq!(dampen(20., Duration::from_millis(150), &config), 5.);
        assert_eq!(dampen(20., Duration::from_millis(300), &config), 20.);
        let instant = config.with_time_dampening_duration(Duration::ZERO);
        assert_eq!(dampen(20., Duration::ZERO, &instant), 20.);
    }
}
