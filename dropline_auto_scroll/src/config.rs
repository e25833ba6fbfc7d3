// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::time::Duration;

/// Engine-wide tuning for [`AutoScroller`](crate::AutoScroller).
///
/// The defaults give a hitbox of a quarter of the container (at most 180px)
/// on each edge, full speed in the outer half of that hitbox, and a 300ms
/// ease-in once a container starts scrolling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AutoScrollConfig {
    /// Fraction of the container size, from each edge, where scrolling starts.
    pub start_hitbox_at_percentage_remaining: f64,
    /// Fraction of the hitbox, from the edge, where the maximum speed is reached.
    pub max_scroll_at_percentage_remaining_of_hitbox: f64,
    /// Upper bound for a hitbox along the scrolled axis, in pixels.
    pub max_main_axis_hitbox_size: f64,
    /// Standard maximum speed.
    pub max_pixel_scroll_per_second: f64,
    /// Frame rate the per-second speed is divided by.
    pub frames_per_second: f64,
    /// Multiplier applied for [`MaxScrollSpeed::Fast`].
    pub fast_multiplier: f64,
    /// Ramp-up time after a container becomes engaged.
    pub time_dampening_duration: Duration,
    /// Smallest scroll step while the pointer is inside a hitbox.
    pub min_scroll_per_frame: f64,
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            start_hitbox_at_percentage_remaining: 0.25,
            max_scroll_at_percentage_remaining_of_hitbox: 0.5,
            max_main_axis_hitbox_size: 180.,
            max_pixel_scroll_per_second: 1200.,
            frames_per_second: 60.,
            fast_multiplier: 2.,
            time_dampening_duration: Duration::from_millis(300),
            min_scroll_per_frame: 1.,
        }
    }
}

impl AutoScrollConfig {
    /// Sets the standard maximum speed.
    #[must_use]
    pub fn with_max_pixel_scroll_per_second(mut self, speed: f64) -> Self {
        self.max_pixel_scroll_per_second = speed;
        self
    }

    /// Sets the ramp-up time; [`Duration::ZERO`] disables it.
    #[must_use]
    pub fn with_time_dampening_duration(mut self, duration: Duration) -> Self {
        self.time_dampening_duration = duration;
        self
    }

    /// Sets the hitbox size cap.
    #[must_use]
    pub fn with_max_main_axis_hitbox_size(mut self, size: f64) -> Self {
        self.max_main_axis_hitbox_size = size;
        self
    }

    /// Maximum step per frame for `speed`.
    pub fn max_scroll_per_frame(&self, speed: MaxScrollSpeed) -> f64 {
        let standard = self.max_pixel_scroll_per_second / self.frames_per_second;
        match speed {
            MaxScrollSpeed::Standard => standard,
            MaxScrollSpeed::Fast => standard * self.fast_multiplier,
        }
    }
}

/// Maximum speed of one container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MaxScrollSpeed {
    /// [`AutoScrollConfig::max_pixel_scroll_per_second`].
    #[default]
    Standard,
    /// Standard speed times [`AutoScrollConfig::fast_multiplier`].
    Fast,
}

/// Axes a container may scroll on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AllowedAxis {
    /// Both axes.
    #[default]
    All,
    /// Left and right only.
    Horizontal,
    /// Up and down only.
    Vertical,
}

impl AllowedAxis {
    pub(crate) fn vertical(self) -> bool {
        self != Self::Horizontal
    }

    pub(crate) fn horizontal(self) -> bool {
        self != Self::Vertical
    }
}

/// Per-container settings returned by `get_configuration`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ScrollConfiguration {
    /// Maximum speed.
    pub max_scroll_speed: MaxScrollSpeed,
    /// Axes the container may scroll on.
    pub allowed_axis: AllowedAxis,
}

impl ScrollConfiguration {
    /// Standard speed on both axes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum speed.
    #[must_use]
    pub fn with_max_scroll_speed(mut self, speed: MaxScrollSpeed) -> Self {
        self.max_scroll_speed = speed;
        self
    }

    /// Restricts the axes.
    #[must_use]
    pub fn with_allowed_axis(mut self, axis: AllowedAxis) -> Self {
        self.allowed_axis = axis;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_frame_speed() {
        let config = AutoScrollConfig::default();
        assert_eq!(config.max_scroll_per_frame(MaxScrollSpeed::Standard), 20.);
        assert_eq!(config.max_scroll_per_frame(MaxScrollSpeed::Fast), 40.);
    }
}
