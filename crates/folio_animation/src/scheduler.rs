//! Animation scheduler
//!
//! Owns every live spring and steps them once per frame. Springs are
//! implicitly registered when created through wrapper types:
//! - `AnimatedValue` - a single spring-animated scalar
//! - `EntranceTrail` - a group of chained springs (see [`crate::trail`])
//!
//! The scheduler is single-threaded: it is ticked from the page's frame loop
//! after due timers have run.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use slotmap::{new_key_type, SlotMap};

use crate::spring::{Spring, SpringConfig, DEFAULT_PRECISION};

/// Largest integration step. Longer frames are split into substeps.
const MAX_STEP_SECS: f32 = 1.0 / 60.0;

new_key_type! {
    /// Handle to a registered spring animation
    pub struct SpringId;
    /// Handle to a registered tick callback
    pub struct TickCallbackId;
}

/// All springs owned by a scheduler
pub type Springs = SlotMap<SpringId, Spring>;

/// Callback run before the springs are stepped on every substep
///
/// The callback receives the spring store directly and must not call back into
/// the scheduler or its handles.
pub type TickCallback = Box<dyn FnMut(&mut Springs)>;

/// Internal state of the animation scheduler
struct SchedulerInner {
    springs: Springs,
    tick_callbacks: SlotMap<TickCallbackId, TickCallback>,
    last_frame_ms: Option<u64>,
    frames: u64,
}

impl SchedulerInner {
    fn step(&mut self, dt: f32) {
        let SchedulerInner {
            springs,
            tick_callbacks,
            ..
        } = self;

        for (_, callback) in tick_callbacks.iter_mut() {
            callback(&mut *springs);
        }

        for (_, spring) in springs.iter_mut() {
            spring.step(dt);
        }
    }

    fn has_active(&self) -> bool {
        self.springs.iter().any(|(_, s)| !s.is_settled())
    }
}

/// The animation scheduler that ticks all active springs
///
/// This is held by the page runtime and shared with components via
/// [`SchedulerHandle`].
pub struct AnimationScheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                springs: SlotMap::with_key(),
                tick_callbacks: SlotMap::with_key(),
                last_frame_ms: None,
                frames: 0,
            })),
        }
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Advance all animations by `dt` seconds
    ///
    /// Returns true if any animations are still active (need another tick).
    pub fn tick(&self, dt: f32) -> bool {
        let mut inner = self.inner.borrow_mut();

        if dt.is_finite() && dt > 0.0 {
            let substeps = (dt / MAX_STEP_SECS).ceil().max(1.0) as u32;
            let step = dt / substeps as f32;
            for _ in 0..substeps {
                inner.step(step);
            }
        }

        inner.frames += 1;
        let active = inner.has_active();
        tracing::trace!(
            "animation frame {}: {} springs, active={}",
            inner.frames,
            inner.springs.len(),
            active
        );
        active
    }

    /// Advance to an absolute time in milliseconds
    ///
    /// The first call only records the time, so a freshly started loop does
    /// not integrate a huge initial step.
    pub fn tick_at(&self, now_ms: u64) -> bool {
        let last = self.inner.borrow_mut().last_frame_ms.replace(now_ms);
        let dt = match last {
            Some(last) if now_ms > last => (now_ms - last) as f32 / 1000.0,
            _ => 0.0,
        };
        self.tick(dt)
    }

    /// Check if any animations are still active
    pub fn has_active_animations(&self) -> bool {
        self.inner.borrow().has_active()
    }

    /// Get the number of registered springs
    pub fn spring_count(&self) -> usize {
        self.inner.borrow().springs.len()
    }

    /// Get the number of registered tick callbacks
    pub fn tick_callback_count(&self) -> usize {
        self.inner.borrow().tick_callbacks.len()
    }

    /// Number of frames ticked so far
    pub fn frame_count(&self) -> u64 {
        self.inner.borrow().frames
    }

    // =========================================================================
    // Direct Spring Access
    // =========================================================================

    pub fn add_spring(&self, spring: Spring) -> SpringId {
        self.inner.borrow_mut().springs.insert(spring)
    }

    pub fn get_spring(&self, id: SpringId) -> Option<Spring> {
        self.inner.borrow().springs.get(id).copied()
    }

    pub fn get_spring_value(&self, id: SpringId) -> Option<f32> {
        self.inner.borrow().springs.get(id).map(|s| s.value())
    }

    pub fn set_spring_target(&self, id: SpringId, target: f32) {
        if let Some(spring) = self.inner.borrow_mut().springs.get_mut(id) {
            spring.set_target(target);
        }
    }

    pub fn remove_spring(&self, id: SpringId) -> Option<Spring> {
        self.inner.borrow_mut().springs.remove(id)
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// A weak handle to the animation scheduler
///
/// This is passed to components that need to register animations.
/// It won't prevent the scheduler from being dropped, and every operation
/// safely no-ops once it is.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<RefCell<SchedulerInner>>,
}

impl SchedulerHandle {
    // =========================================================================
    // Spring Operations
    // =========================================================================

    /// Register a spring and return its ID
    pub fn register_spring(&self, spring: Spring) -> Option<SpringId> {
        self.inner
            .upgrade()
            .map(|inner| inner.borrow_mut().springs.insert(spring))
    }

    /// Update a spring's target
    pub fn set_spring_target(&self, id: SpringId, target: f32) {
        if let Some(inner) = self.inner.upgrade() {
            if let Some(spring) = inner.borrow_mut().springs.get_mut(id) {
                spring.set_target(target);
            }
        }
    }

    /// Get current spring value
    pub fn get_spring_value(&self, id: SpringId) -> Option<f32> {
        self.inner
            .upgrade()
            .and_then(|inner| inner.borrow().springs.get(id).map(|s| s.value()))
    }

    /// Check if a spring has settled (at rest at target)
    ///
    /// A spring that no longer exists is considered settled.
    pub fn is_spring_settled(&self, id: SpringId) -> bool {
        self.inner
            .upgrade()
            .and_then(|inner| inner.borrow().springs.get(id).map(|s| s.is_settled()))
            .unwrap_or(true)
    }

    /// Jump a spring to its target
    pub fn snap_spring(&self, id: SpringId) {
        if let Some(inner) = self.inner.upgrade() {
            if let Some(spring) = inner.borrow_mut().springs.get_mut(id) {
                spring.snap();
            }
        }
    }

    /// Remove a spring
    pub fn remove_spring(&self, id: SpringId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.borrow_mut().springs.remove(id);
        }
    }

    // =========================================================================
    // Tick Callbacks
    // =========================================================================

    /// Register a callback run before springs are stepped on each substep
    pub fn add_tick_callback<F>(&self, callback: F) -> Option<TickCallbackId>
    where
        F: FnMut(&mut Springs) + 'static,
    {
        self.inner
            .upgrade()
            .map(|inner| inner.borrow_mut().tick_callbacks.insert(Box::new(callback)))
    }

    pub fn remove_tick_callback(&self, id: TickCallbackId) {
        if let Some(inner) = self.inner.upgrade() {
            // Release the borrow before the callback's captures are dropped
            let removed = inner.borrow_mut().tick_callbacks.remove(id);
            drop(removed);
        }
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

// ============================================================================
// Animated Value
// ============================================================================

/// A spring-animated scalar that registers with the scheduler
///
/// # Example
///
/// ```rust
/// use folio_animation::{AnimatedValue, AnimationScheduler, SpringConfig};
///
/// let scheduler = AnimationScheduler::new();
/// let mut angle = AnimatedValue::new(scheduler.handle(), 20.0, SpringConfig::settle());
///
/// angle.set_target(165.0);
/// scheduler.tick(1.0 / 60.0);
/// assert!(angle.get() > 20.0);
/// ```
pub struct AnimatedValue {
    handle: SchedulerHandle,
    spring_id: Option<SpringId>,
    config: SpringConfig,
    precision: f32,
    /// The value held while no spring is registered
    current: f32,
    /// The target value we're animating towards
    target: f32,
}

impl AnimatedValue {
    /// Create a new animated value with the given initial value
    pub fn new(handle: SchedulerHandle, initial: f32, config: SpringConfig) -> Self {
        Self::with_precision(handle, initial, config, DEFAULT_PRECISION)
    }

    pub fn with_precision(
        handle: SchedulerHandle,
        initial: f32,
        config: SpringConfig,
        precision: f32,
    ) -> Self {
        // Don't register immediately - only when we have a target change
        Self {
            handle,
            spring_id: None,
            config,
            precision,
            current: initial,
            target: initial,
        }
    }

    /// Set the target value - starts animation if different from current
    pub fn set_target(&mut self, target: f32) {
        self.target = target;

        if let Some(id) = self.spring_id {
            self.handle.set_spring_target(id, target);
        } else if (target - self.current).abs() > 0.001 {
            let spring = Spring::with_precision(self.config, self.current, self.precision);
            if let Some(id) = self.handle.register_spring(spring) {
                self.spring_id = Some(id);
                self.handle.set_spring_target(id, target);
            }
        }
    }

    /// Get the current animated value
    pub fn get(&self) -> f32 {
        if let Some(id) = self.spring_id {
            self.handle.get_spring_value(id).unwrap_or(self.target)
        } else {
            self.current
        }
    }

    /// Set value immediately without animation
    pub fn set_immediate(&mut self, value: f32) {
        if let Some(id) = self.spring_id.take() {
            self.handle.remove_spring(id);
        }
        self.current = value;
        self.target = value;
    }

    /// Check if currently animating
    pub fn is_animating(&self) -> bool {
        match self.spring_id {
            Some(id) => !self.handle.is_spring_settled(id),
            None => false,
        }
    }

    /// Get the current target value
    pub fn target(&self) -> f32 {
        self.target
    }
}

impl Drop for AnimatedValue {
    fn drop(&mut self) {
        if let Some(id) = self.spring_id {
            self.handle.remove_spring(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheduler_tick() {
        let scheduler = AnimationScheduler::new();

        let id = scheduler.add_spring(Spring::new(SpringConfig::stiff(), 0.0));
        scheduler.set_spring_target(id, 100.0);

        assert!(scheduler.tick(1.0 / 60.0));

        let value = scheduler.get_spring_value(id).unwrap();
        assert!(value > 0.0);
    }

    #[test]
    fn test_tick_at_skips_first_frame() {
        let scheduler = AnimationScheduler::new();
        let id = scheduler.add_spring(Spring::new(SpringConfig::stiff(), 0.0));
        scheduler.set_spring_target(id, 100.0);

        scheduler.tick_at(5_000);
        assert_eq!(scheduler.get_spring_value(id), Some(0.0));

        scheduler.tick_at(5_016);
        assert!(scheduler.get_spring_value(id).unwrap() > 0.0);
    }

    #[test]
    fn test_long_frames_are_substepped() {
        let scheduler = AnimationScheduler::new();
        let id = scheduler.add_spring(Spring::new(SpringConfig::stiff(), 0.0));
        scheduler.set_spring_target(id, 100.0);

        // One long frame behaves like many short ones
        scheduler.tick(2.0);
        assert_eq!(scheduler.get_spring_value(id), Some(100.0));
        assert!(!scheduler.has_active_animations());
    }

    #[test]
    fn test_tick_callback_runs_before_step() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let id = scheduler.add_spring(Spring::new(SpringConfig::stiff(), 0.0));

        let callback = handle
            .add_tick_callback(move |springs| {
                if let Some(spring) = springs.get_mut(id) {
                    spring.set_target(50.0);
                }
            })
            .unwrap();

        scheduler.tick(1.0 / 60.0);
        assert_eq!(scheduler.get_spring(id).unwrap().target(), 50.0);

        handle.remove_tick_callback(callback);
        assert_eq!(scheduler.tick_callback_count(), 0);
    }

    #[test]
    fn test_animated_value() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();

        let mut value = AnimatedValue::new(handle, 0.0, SpringConfig::stiff());

        assert_eq!(value.get(), 0.0);
        assert!(!value.is_animating());
        assert_eq!(scheduler.spring_count(), 0);

        value.set_target(100.0);
        assert!(value.is_animating());

        scheduler.tick(1.0 / 60.0);
        assert!(value.get() > 0.0);

        drop(value);
        assert_eq!(scheduler.spring_count(), 0);
    }

    #[test]
    fn test_animated_value_set_immediate() {
        let scheduler = AnimationScheduler::new();
        let mut value = AnimatedValue::new(scheduler.handle(), 0.0, SpringConfig::stiff());

        value.set_target(10.0);
        value.set_immediate(3.0);

        assert_eq!(value.get(), 3.0);
        assert!(!value.is_animating());
        assert_eq!(scheduler.spring_count(), 0);
    }

    #[test]
    fn test_handle_weak_reference() {
        let handle = {
            let scheduler = AnimationScheduler::new();
            scheduler.handle()
        };

        assert!(!handle.is_alive());
        assert!(handle
            .register_spring(Spring::new(SpringConfig::stiff(), 0.0))
            .is_none());
        assert!(handle.is_spring_settled(SpringId::default()));
    }
}
