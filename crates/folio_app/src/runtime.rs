//! Folio page runtime
//!
//! Owns every subsystem a mounted page talks to: the clock, the timer queue,
//! the animation scheduler, the pointer dispatcher and the viewport. One
//! frame fires due timers first, then steps animations.

use std::cell::Cell;
use std::rc::Rc;

use folio_animation::{AnimationScheduler, SchedulerHandle};
use folio_core::{
    Clock, DispatcherHandle, ManualClock, PointerDispatcher, PointerEvent, SharedViewport,
    SystemClock, TimerHandle, TimerQueue, Viewport,
};

/// Frame interval used when advancing a manual clock
pub const FRAME_MS: u64 = 16;

/// The page runtime
pub struct PageRuntime {
    manual: Option<Rc<ManualClock>>,
    timers: TimerQueue,
    animations: AnimationScheduler,
    pointer: PointerDispatcher,
    viewport: SharedViewport,
}

impl PageRuntime {
    /// A runtime on an arbitrary clock
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self::build(clock, None)
    }

    /// A runtime on wall-clock time
    pub fn system() -> Self {
        Self::new(Rc::new(SystemClock::new()))
    }

    /// A deterministic runtime whose time only moves through [`advance`](Self::advance)
    pub fn manual() -> Self {
        let clock = Rc::new(ManualClock::new());
        Self::build(clock.clone(), Some(clock))
    }

    fn build(clock: Rc<dyn Clock>, manual: Option<Rc<ManualClock>>) -> Self {
        Self {
            manual,
            timers: TimerQueue::new(clock),
            animations: AnimationScheduler::new(),
            pointer: PointerDispatcher::new(),
            viewport: Rc::new(Cell::new(Viewport::default())),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    pub fn animations(&self) -> &AnimationScheduler {
        &self.animations
    }

    pub fn pointer(&self) -> &PointerDispatcher {
        &self.pointer
    }

    pub fn timer_handle(&self) -> TimerHandle {
        self.timers.handle()
    }

    pub fn scheduler_handle(&self) -> SchedulerHandle {
        self.animations.handle()
    }

    pub fn dispatcher_handle(&self) -> DispatcherHandle {
        self.pointer.handle()
    }

    // =========================================================================
    // Viewport
    // =========================================================================

    pub fn viewport(&self) -> Viewport {
        self.viewport.get()
    }

    pub fn shared_viewport(&self) -> SharedViewport {
        Rc::clone(&self.viewport)
    }

    pub fn resize(&self, width: f32, height: f32) {
        tracing::debug!("viewport resized to {}x{}", width, height);
        self.viewport.set(Viewport::new(width, height));
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Deliver a pointer move to every subscriber
    pub fn pointer_move(&self, x: f32, y: f32) -> usize {
        self.pointer.dispatch(&PointerEvent::new(x, y))
    }

    // =========================================================================
    // Frames
    // =========================================================================

    /// Run one frame at the current time
    pub fn frame(&self) -> FrameReport {
        let timers_fired = self.timers.run_due();
        let animating = self.animations.tick_at(self.now_ms());
        if timers_fired > 0 {
            tracing::trace!("frame at t={}ms fired {} timers", self.now_ms(), timers_fired);
        }
        FrameReport {
            timers_fired,
            animating,
        }
    }

    /// Move a manual clock forward by `ms`, running a frame every [`FRAME_MS`]
    ///
    /// The last frame lands exactly on the target time. On any other clock
    /// this runs a single frame and does not touch time.
    pub fn advance(&self, ms: u64) -> usize {
        let Some(clock) = &self.manual else {
            tracing::warn!("advance({}ms) on a runtime without a manual clock", ms);
            self.frame();
            return 1;
        };

        let target = clock.now_ms().saturating_add(ms);
        let mut frames = 0;
        loop {
            let now = clock.now_ms();
            if now >= target && frames > 0 {
                break;
            }
            clock.set(now.saturating_add(FRAME_MS).min(target));
            self.frame();
            frames += 1;
        }
        frames
    }

    /// Advance until no timers are pending and every animation is at rest
    ///
    /// Gives up after `limit_ms` and returns the time spent.
    pub fn run_until_idle(&self, limit_ms: u64) -> u64 {
        let start = self.now_ms();
        while self.now_ms() - start < limit_ms {
            self.advance(FRAME_MS);
            if self.is_idle() {
                break;
            }
        }
        self.now_ms() - start
    }

    pub fn is_idle(&self) -> bool {
        self.timers.pending_count() == 0 && !self.animations.has_active_animations()
    }

    pub fn stats(&self) -> RuntimeStats {
        RuntimeStats {
            now_ms: self.now_ms(),
            pending_timers: self.timers.pending_count(),
            springs: self.animations.spring_count(),
            tick_callbacks: self.animations.tick_callback_count(),
            pointer_listeners: self.pointer.listener_count(),
            frames: self.animations.frame_count(),
        }
    }
}

impl Default for PageRuntime {
    fn default() -> Self {
        Self::manual()
    }
}

/// What one frame did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameReport {
    pub timers_fired: usize,
    pub animating: bool,
}

/// Statistics about the runtime
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuntimeStats {
    pub now_ms: u64,
    pub pending_timers: usize,
    pub springs: usize,
    pub tick_callbacks: usize,
    pub pointer_listeners: usize,
    pub frames: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_animation::{AnimatedValue, SpringConfig};
    use std::cell::RefCell;

    #[test]
    fn test_advance_lands_on_target() {
        let runtime = PageRuntime::manual();
        let fired = Rc::new(RefCell::new(Vec::new()));

        let log = fired.clone();
        let handle = runtime.timer_handle();
        let _t = handle.schedule_scoped(100, "probe", move || log.borrow_mut().push(100));

        runtime.advance(99);
        assert!(fired.borrow().is_empty());
        assert_eq!(runtime.now_ms(), 99);

        runtime.advance(1);
        assert_eq!(*fired.borrow(), vec![100]);
    }

    #[test]
    fn test_advance_zero_runs_one_frame() {
        let runtime = PageRuntime::manual();
        let fired = Rc::new(Cell::new(false));

        let flag = fired.clone();
        runtime.timers().schedule(0, "zero", move || flag.set(true));

        assert_eq!(runtime.advance(0), 1);
        assert!(fired.get());
        assert_eq!(runtime.now_ms(), 0);
    }

    #[test]
    fn test_frames_step_animations() {
        let runtime = PageRuntime::manual();
        let mut value = AnimatedValue::new(runtime.scheduler_handle(), 0.0, SpringConfig::settle());
        value.set_target(100.0);

        runtime.advance(160);
        assert!(value.get() > 0.0);

        runtime.run_until_idle(10_000);
        assert!(runtime.is_idle());
        assert_eq!(value.get(), 100.0);
    }

    #[test]
    fn test_pointer_and_viewport() {
        let runtime = PageRuntime::manual();
        let seen = Rc::new(Cell::new(0.0));

        let sink = seen.clone();
        let _guard = runtime
            .dispatcher_handle()
            .subscribe(move |e| sink.set(e.y));

        assert_eq!(runtime.pointer_move(10.0, 42.0), 1);
        assert_eq!(seen.get(), 42.0);

        runtime.resize(800.0, 600.0);
        assert_eq!(runtime.shared_viewport().get().height, 600.0);
        assert_eq!(runtime.stats().pointer_listeners, 1);
    }
}
