// Copyright 2025 the Dropline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::time::Duration;

use dropline_core::{
    DragView, ElementSource, ExternalSource, Input, RegistrationId, Registry, RegistryError,
    TextSelectionSource,
};
use dropline_dom::{Document, ElementId, ScrollDirection};
use hashbrown::HashMap;
use kurbo::{Point, Rect, Vec2};
use smallvec::SmallVec;

use crate::config::{AutoScrollConfig, ScrollConfiguration};
use crate::edge::{EdgeHit, dampen, edge_speed, horizontal_edge, vertical_edge};

/// Arguments passed to `can_scroll` and `get_configuration`.
#[derive(Debug)]
pub struct AutoScrollArgs<'a, S> {
    /// The container, or `None` for the window.
    pub element: Option<ElementId>,
    /// What is being dragged.
    pub source: &'a S,
    /// Latest drag input.
    pub input: &'a Input,
}

type CanScroll<S> = Box<dyn Fn(&AutoScrollArgs<'_, S>) -> bool>;
type GetConfiguration<S> = Box<dyn Fn(&AutoScrollArgs<'_, S>) -> ScrollConfiguration>;

/// Hooks shared by container and window registrations.
struct Hooks<S> {
    can_scroll: Option<CanScroll<S>>,
    get_configuration: Option<GetConfiguration<S>>,
}

impl<S> Default for Hooks<S> {
    fn default() -> Self {
        Self {
            can_scroll: None,
            get_configuration: None,
        }
    }
}

impl<S> Hooks<S> {
    fn accepts(&self, args: &AutoScrollArgs<'_, S>) -> bool {
        self.can_scroll.as_ref().is_none_or(|f| f(args))
    }

    fn configuration(&self, args: &AutoScrollArgs<'_, S>) -> ScrollConfiguration {
        self.get_configuration
            .as_ref()
            .map(|f| f(args))
            .unwrap_or_default()
    }
}

impl<S> fmt::Debug for Hooks<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("can_scroll", &self.can_scroll.is_some())
            .field("get_configuration", &self.get_configuration.is_some())
            .finish()
    }
}

/// A scroll container registration.
#[derive(Debug)]
pub struct ScrollContainer<S> {
    element: ElementId,
    hooks: Hooks<S>,
}

impl<S> ScrollContainer<S> {
    /// Auto-scrolls `element` during every drag at standard speed.
    pub fn new(element: ElementId) -> Self {
        Self {
            element,
            hooks: Hooks::default(),
        }
    }

    /// The registered element.
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Checked every frame before scrolling.
    #[must_use]
    pub fn can_scroll(mut self, f: impl Fn(&AutoScrollArgs<'_, S>) -> bool + 'static) -> Self {
        self.hooks.can_scroll = Some(Box::new(f));
        self
    }

    /// Per-frame speed and axis settings.
    #[must_use]
    pub fn get_configuration(
        mut self,
        f: impl Fn(&AutoScrollArgs<'_, S>) -> ScrollConfiguration + 'static,
    ) -> Self {
        self.hooks.get_configuration = Some(Box::new(f));
        self
    }
}

/// A window registration.
#[derive(Debug)]
pub struct WindowScroll<S> {
    hooks: Hooks<S>,
}

impl<S> Default for WindowScroll<S> {
    fn default() -> Self {
        Self {
            hooks: Hooks::default(),
        }
    }
}

impl<S> WindowScroll<S> {
    /// Auto-scrolls the window during every drag at standard speed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checked every frame before scrolling.
    #[must_use]
    pub fn can_scroll(mut self, f: impl Fn(&AutoScrollArgs<'_, S>) -> bool + 'static) -> Self {
        self.hooks.can_scroll = Some(Box::new(f));
        self
    }

    /// Per-frame speed and axis settings.
    #[must_use]
    pub fn get_configuration(
        mut self,
        f: impl Fn(&AutoScrollArgs<'_, S>) -> ScrollConfiguration + 'static,
    ) -> Self {
        self.hooks.get_configuration = Some(Box::new(f));
        self
    }
}

/// Handle returned when registering a [`WindowScroll`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WindowScrollId(u64);

/// Something that auto-scrolls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScrollTarget {
    /// A registered container.
    Element(ElementId),
    /// The window.
    Window,
}

/// One scroll applied during [`AutoScroller::frame`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollStep {
    /// What was scrolled.
    pub target: ScrollTarget,
    /// Requested scroll delta.
    pub requested: Vec2,
    /// Delta actually applied after clamping to the scroll range.
    pub applied: Vec2,
}

#[derive(Clone, Copy, Default)]
struct Consumed {
    vertical: bool,
    horizontal: bool,
}

/// Auto-scroll engine for drags of source type `S`.
///
/// Call [`AutoScroller::frame`] once per animation frame, after
/// [`DragDropManager::animation_frame`](dropline_core::DragDropManager::animation_frame).
pub struct AutoScroller<S> {
    config: AutoScrollConfig,
    containers: Registry<ScrollContainer<S>>,
    windows: Vec<(WindowScrollId, WindowScroll<S>)>,
    next_window_id: u64,
    engaged: HashMap<ScrollTarget, Duration>,
    armed: bool,
    drag_serial: Option<u64>,
}

impl<S> fmt::Debug for AutoScroller<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoScroller")
            .field("config", &self.config)
            .field("containers", &self.containers.len())
            .field("windows", &self.windows.len())
            .field("engaged", &self.engaged)
            .field("armed", &self.armed)
            .field("drag_serial", &self.drag_serial)
            .finish()
    }
}

impl<S> Default for AutoScroller<S> {
    fn default() -> Self {
        Self::new(AutoScrollConfig::default())
    }
}

impl<S> AutoScroller<S> {
    /// An engine with no registrations.
    pub fn new(config: AutoScrollConfig) -> Self {
        Self {
            config,
            containers: Registry::new("auto-scroll container"),
            windows: Vec::new(),
            next_window_id: 1,
            engaged: HashMap::new(),
            armed: false,
            drag_serial: None,
        }
    }

    /// The engine configuration.
    pub fn config(&self) -> &AutoScrollConfig {
        &self.config
    }

    /// Registers a scroll container. One registration per element.
    pub fn container(
        &mut self,
        container: ScrollContainer<S>,
    ) -> Result<RegistrationId, RegistryError> {
        self.containers.register(container.element, container)
    }

    /// Removes a scroll container registration.
    pub fn remove_container(&mut self, id: RegistrationId) -> bool {
        self.engaged.remove(&ScrollTarget::Element(id.element()));
        self.containers.unregister(id)
    }

    /// Registers window scrolling. The first registration whose `can_scroll`
    /// accepts decides the window configuration for a frame.
    pub fn window(&mut self, window: WindowScroll<S>) -> WindowScrollId {
        let id = WindowScrollId(self.next_window_id);
        self.next_window_id += 1;
        self.windows.push((id, window));
        id
    }

    /// Removes a window registration.
    pub fn remove_window(&mut self, id: WindowScrollId) -> bool {
        let before = self.windows.len();
        self.windows.retain(|(w, _)| *w != id);
        before != self.windows.len()
    }

    /// Drops container registrations whose element has been removed.
    pub fn prune(&mut self, document: &Document) -> usize {
        self.containers.prune(document)
    }

    /// Returns `true` while `target` is scrolling, i.e. it scrolled on the last frame.
    pub fn is_engaged(&self, target: ScrollTarget) -> bool {
        self.engaged.contains_key(&target)
    }

    /// Runs one frame.
    ///
    /// `drag` is the active drag, if any, and `now` a monotonic timestamp.
    /// Nothing scrolls until the frame after the drag start was delivered.
    /// Containers are visited innermost first from the element under the
    /// pointer, then the window; once an axis has scrolled, outer targets
    /// leave it alone for this frame.
    pub fn frame(
        &mut self,
        document: &mut Document,
        drag: Option<DragView<'_, S>>,
        now: Duration,
    ) -> SmallVec<[ScrollStep; 2]> {
        let mut steps = SmallVec::new();
        let Some(drag) = drag else {
            self.disarm();
            self.drag_serial = None;
            return steps;
        };
        if self.drag_serial != Some(drag.serial) {
            // Hosts may skip idle frames between two drags.
            self.disarm();
            self.drag_serial = Some(drag.serial);
        }
        if drag.is_start_pending {
            return steps;
        }
        if !self.armed {
            // The frame that delivered the drag start.
            log::debug!("auto-scroll armed");
            self.armed = true;
            return steps;
        }

        let input = drag.current.input;
        let point = input.client;
        let mut consumed = Consumed::default();
        let mut engaged_now: SmallVec<[ScrollTarget; 4]> = SmallVec::new();

        let chain: SmallVec<[ElementId; 8]> = document
            .element_from_point(point)
            .map(|under| {
                document
                    .ancestors(under)
                    .filter(|el| self.containers.contains(*el))
                    .collect()
            })
            .unwrap_or_default();

        for element in chain {
            let Some(entry) = self.containers.get(element) else {
                continue;
            };
            let args = AutoScrollArgs {
                element: Some(element),
                source: drag.source,
                input: &input,
            };
            if !entry.hooks.accepts(&args) {
                continue;
            }
            let Some(rect) = document.client_rect(element) else {
                continue;
            };
            let configuration = entry.hooks.configuration(&args);
            let target = ScrollTarget::Element(element);
            let requested = self.request(
                target,
                rect,
                point,
                configuration,
                consumed,
                now,
                |direction| document.can_scroll(element, direction),
            );
            if requested == Vec2::ZERO {
                continue;
            }
            let applied = match document.scroll_by(element, requested) {
                Ok(applied) => applied,
                Err(err) => {
                    log::warn!("auto-scroll of {element:?} failed: {err}");
                    continue;
                }
            };
            consumed.vertical |= requested.y != 0.;
            consumed.horizontal |= requested.x != 0.;
            engaged_now.push(target);
            steps.push(ScrollStep {
                target,
                requested,
                applied,
            });
        }

        let args = AutoScrollArgs {
            element: None,
            source: drag.source,
            input: &input,
        };
        let window = self
            .windows
            .iter()
            .find(|(_, window)| window.hooks.accepts(&args))
            .map(|(_, window)| window.hooks.configuration(&args));
        if let Some(configuration) = window {
            let rect = document.window().viewport_rect();
            let requested = self.request(
                ScrollTarget::Window,
                rect,
                point,
                configuration,
                consumed,
                now,
                |direction| document.can_scroll_window(direction),
            );
            if requested != Vec2::ZERO {
                let applied = document.scroll_window_by(requested);
                engaged_now.push(ScrollTarget::Window);
                steps.push(ScrollStep {
                    target: ScrollTarget::Window,
                    requested,
                    applied,
                });
            }
        }

        self.engaged.retain(|target, _| engaged_now.contains(target));
        for target in engaged_now {
            self.engaged.entry(target).or_insert(now);
        }
        if !steps.is_empty() {
            log::trace!("auto-scroll steps: {steps:?}");
        }
        steps
    }

    fn disarm(&mut self) {
        if self.armed {
            log::trace!("auto-scroll disarmed");
        }
        self.armed = false;
        self.engaged.clear();
    }

    fn request(
        &self,
        target: ScrollTarget,
        rect: Rect,
        point: Point,
        configuration: ScrollConfiguration,
        consumed: Consumed,
        now: Duration,
        can_scroll: impl Fn(ScrollDirection) -> bool,
    ) -> Vec2 {
        let engaged_for = self
            .engaged
            .get(&target)
            .map_or(Duration::ZERO, |since| now.saturating_sub(*since));
        let max_per_frame = self
            .config
            .max_scroll_per_frame(configuration.max_scroll_speed);
        let step = |hit: EdgeHit| {
            if !can_scroll(hit.direction) {
                return 0.;
            }
            let speed = edge_speed(&hit, &self.config, max_per_frame);
            let speed =
                dampen(speed, engaged_for, &self.config).max(self.config.min_scroll_per_frame);
            match hit.direction {
                ScrollDirection::Up | ScrollDirection::Left => -speed,
                ScrollDirection::Down | ScrollDirection::Right => speed,
            }
        };

        let mut delta = Vec2::ZERO;
        if configuration.allowed_axis.vertical()
            && !consumed.vertical
            && let Some(hit) = vertical_edge(rect, point, &self.config)
        {
            delta.y = step(hit);
        }
        if configuration.allowed_axis.horizontal()
            && !consumed.horizontal
            && let Some(hit) = horizontal_edge(rect, point, &self.config)
        {
            delta.x = step(hit);
        }
        delta
    }
}

/// Auto-scroller for element drags.
pub type ElementAutoScroller = AutoScroller<ElementSource>;
/// Auto-scroller for external drags.
pub type ExternalAutoScroller = AutoScroller<ExternalSource>;
/// Auto-scroller for text selection drags.
pub type TextSelectionAutoScroller = AutoScroller<TextSelectionSource>;
