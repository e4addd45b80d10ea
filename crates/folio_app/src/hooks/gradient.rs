//! Pointer-driven background gradient
//!
//! The gradient angle follows the pointer's vertical position, mapped from
//! `[0, viewport height]` onto a fixed angle range, through a critically
//! damped spring so it settles without overshoot.

use std::cell::RefCell;
use std::ops::RangeInclusive;
use std::rc::Rc;

use folio_animation::{clamp_map, AnimatedValue, SchedulerHandle, SpringConfig};
use folio_core::{DispatcherHandle, SharedViewport};

use crate::hooks::mouse::{MouseTracker, PointerPosition};

/// Angle range of the gradient, in degrees
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientRange {
    pub min_deg: f32,
    pub max_deg: f32,
}

impl GradientRange {
    pub fn new(min_deg: f32, max_deg: f32) -> Self {
        Self { min_deg, max_deg }
    }

    fn degrees(&self) -> RangeInclusive<f32> {
        self.min_deg..=self.max_deg
    }

    /// Angle for a pointer at `y` in a viewport `height` pixels tall
    pub fn angle_for(&self, y: f32, height: f32) -> f32 {
        clamp_map(y, 0.0..=height, self.degrees())
    }
}

impl Default for GradientRange {
    fn default() -> Self {
        Self::new(20.0, 165.0)
    }
}

/// Background gradient that tracks the pointer while mounted
pub struct PointerGradient {
    angle: Rc<RefCell<AnimatedValue>>,
    tracker: MouseTracker,
    range: GradientRange,
}

impl PointerGradient {
    pub fn mount(
        dispatcher: &DispatcherHandle,
        scheduler: SchedulerHandle,
        viewport: SharedViewport,
        range: GradientRange,
    ) -> Self {
        Self::mount_with_spring(dispatcher, scheduler, viewport, range, SpringConfig::settle())
    }

    pub fn mount_with_spring(
        dispatcher: &DispatcherHandle,
        scheduler: SchedulerHandle,
        viewport: SharedViewport,
        range: GradientRange,
        spring: SpringConfig,
    ) -> Self {
        if !spring.is_critically_damped() && !spring.is_overdamped() {
            tracing::warn!("gradient spring is underdamped and will overshoot");
        }

        // The pointer starts at the origin, so does the angle
        let initial = range.angle_for(0.0, viewport.get().height);
        let angle = Rc::new(RefCell::new(AnimatedValue::new(scheduler, initial, spring)));

        let target = Rc::downgrade(&angle);
        let tracker = MouseTracker::mount_with(dispatcher, move |position: PointerPosition| {
            let Some(angle) = target.upgrade() else {
                return;
            };
            // Height is read at event time so resizes apply to the next move
            let deg = range.angle_for(position.y, viewport.get().height);
            angle.borrow_mut().set_target(deg);
        });

        Self {
            angle,
            tracker,
            range,
        }
    }

    /// Current animated angle
    pub fn angle_deg(&self) -> f32 {
        self.angle.borrow().get()
    }

    /// Angle the spring is heading for
    pub fn target_deg(&self) -> f32 {
        self.angle.borrow().target()
    }

    pub fn is_animating(&self) -> bool {
        self.angle.borrow().is_animating()
    }

    pub fn range(&self) -> GradientRange {
        self.range
    }

    pub fn pointer(&self) -> PointerPosition {
        self.tracker.position()
    }

    pub fn is_mounted(&self) -> bool {
        self.tracker.is_mounted()
    }

    /// Stop following the pointer. Returns false if already unmounted.
    pub fn unmount(&mut self) -> bool {
        let removed = self.tracker.unmount();
        if removed {
            tracing::debug!("pointer gradient unmounted at {:.1}deg", self.angle_deg());
        }
        removed
    }
}
