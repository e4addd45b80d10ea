//! Email reveal sequencer
//!
//! Clicking the email link discloses the address in three stages:
//!
//! 1. `visible` at once: the label turns into the two halves of the address
//! 2. `splitting` after the split delay: the halves slide apart
//! 3. `merged` at the merge delay (measured from the click): one line
//!
//! The merge timer is scheduled from the split callback, so the stages can
//! only fire in order, but it targets `start + merge_delay` so a late split
//! never delays the merge. Both timers are held as
//! [`ScheduledTimer`] guards owned by the sequencer; dropping the sequencer
//! cancels whatever is still pending, and the callbacks only hold weak
//! references, so a callback that outlives the sequencer does nothing.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use folio_core::{ScheduledTimer, TimerHandle};
use smallvec::SmallVec;

/// Flags of one reveal sequence
///
/// Valid states satisfy `merged => splitting => visible`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RevealState {
    pub visible: bool,
    pub splitting: bool,
    pub merged: bool,
}

impl RevealState {
    pub const HIDDEN: RevealState = RevealState {
        visible: false,
        splitting: false,
        merged: false,
    };

    pub fn stage(&self) -> RevealStage {
        if self.merged {
            RevealStage::Merged
        } else if self.splitting {
            RevealStage::Splitting
        } else if self.visible {
            RevealStage::Visible
        } else {
            RevealStage::Hidden
        }
    }

    pub fn is_valid(&self) -> bool {
        (!self.merged || self.splitting) && (!self.splitting || self.visible)
    }
}

/// Position in the sequence, ordered from first to last
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RevealStage {
    Hidden,
    Visible,
    Splitting,
    Merged,
}

impl RevealStage {
    pub fn name(self) -> &'static str {
        match self {
            RevealStage::Hidden => "hidden",
            RevealStage::Visible => "visible",
            RevealStage::Splitting => "splitting",
            RevealStage::Merged => "merged",
        }
    }

    /// The flags implied by reaching this stage
    pub fn state(self) -> RevealState {
        RevealState {
            visible: self >= RevealStage::Visible,
            splitting: self >= RevealStage::Splitting,
            merged: self >= RevealStage::Merged,
        }
    }
}

/// Delays of the sequence, both measured from `start()`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevealTiming {
    pub split_delay_ms: u64,
    pub merge_delay_ms: u64,
}

impl RevealTiming {
    pub fn new(split_delay_ms: u64, merge_delay_ms: u64) -> Self {
        Self {
            split_delay_ms,
            merge_delay_ms,
        }
    }
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self::new(100, 1500)
    }
}

struct RevealShared {
    stage: Cell<RevealStage>,
    started_at_ms: Cell<Option<u64>>,
    pending: RefCell<SmallVec<[ScheduledTimer; 2]>>,
}

impl RevealShared {
    /// Move forward to `stage`; never backward
    fn reach(&self, stage: RevealStage) {
        if stage > self.stage.get() {
            tracing::debug!("email reveal: {:?} -> {:?}", self.stage.get(), stage);
            self.stage.set(stage);
        }
    }

    fn hold(&self, timer: ScheduledTimer) {
        let mut pending = self.pending.borrow_mut();
        pending.retain(|timer| timer.is_pending());
        pending.push(timer);
    }
}

/// The email reveal sequencer
pub struct EmailReveal {
    timers: TimerHandle,
    timing: RevealTiming,
    shared: Rc<RevealShared>,
}

impl EmailReveal {
    pub fn new(timers: TimerHandle, timing: RevealTiming) -> Self {
        Self {
            timers,
            timing,
            shared: Rc::new(RevealShared {
                stage: Cell::new(RevealStage::Hidden),
                started_at_ms: Cell::new(None),
                pending: RefCell::new(SmallVec::new()),
            }),
        }
    }

    pub fn state(&self) -> RevealState {
        self.shared.stage.get().state()
    }

    pub fn stage(&self) -> RevealStage {
        self.shared.stage.get()
    }

    pub fn timing(&self) -> RevealTiming {
        self.timing
    }

    pub fn is_started(&self) -> bool {
        self.shared.started_at_ms.get().is_some()
    }

    /// Time `start()` was first called
    pub fn started_at_ms(&self) -> Option<u64> {
        self.shared.started_at_ms.get()
    }

    /// Number of stage timers still waiting to fire
    pub fn pending_timers(&self) -> usize {
        self.shared
            .pending
            .borrow()
            .iter()
            .filter(|timer| timer.is_pending())
            .count()
    }

    /// Begin the sequence. Calls after the first have no effect.
    ///
    /// Returns true if this call started the sequence.
    pub fn start(&self) -> bool {
        if self.is_started() {
            tracing::trace!("email reveal already started");
            return false;
        }
        self.shared.started_at_ms.set(Some(self.timers.now_ms()));
        self.shared.reach(RevealStage::Visible);

        let weak = Rc::downgrade(&self.shared);
        let timers = self.timers.clone();
        let merge_due_ms = self.timers.now_ms() + self.timing.merge_delay_ms;

        let split = self
            .timers
            .schedule_scoped(self.timing.split_delay_ms, "email-split", move || {
                on_split(&weak, &timers, merge_due_ms);
            });
        self.shared.hold(split);
        true
    }

    /// Drop every pending stage timer; the state stays where it is
    pub fn cancel(&self) -> usize {
        let mut pending = self.shared.pending.borrow_mut();
        let cancelled = pending
            .iter_mut()
            .map(|timer| timer.cancel())
            .filter(|cancelled| *cancelled)
            .count();
        pending.clear();
        if cancelled > 0 {
            tracing::debug!("email reveal cancelled {} pending timers", cancelled);
        }
        cancelled
    }
}

fn on_split(shared: &Weak<RevealShared>, timers: &TimerHandle, merge_due_ms: u64) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    shared.reach(RevealStage::Splitting);

    // Absolute due time; a split that fired late must not push the merge
    let delay = merge_due_ms.saturating_sub(timers.now_ms());
    let weak = Rc::downgrade(&shared);
    let merge = timers.schedule_scoped(delay, "email-merge", move || {
        if let Some(shared) = weak.upgrade() {
            shared.reach(RevealStage::Merged);
        }
    });
    shared.hold(merge);
}

impl Drop for EmailReveal {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{ManualClock, TimerQueue};

    fn setup() -> (Rc<ManualClock>, TimerQueue) {
        let clock = Rc::new(ManualClock::new());
        let queue = TimerQueue::new(clock.clone());
        (clock, queue)
    }

    fn advance_to(clock: &ManualClock, queue: &TimerQueue, ms: u64) {
        clock.set(ms);
        queue.run_due();
    }

    #[test]
    fn test_stage_timeline() {
        let (clock, queue) = setup();
        let reveal = EmailReveal::new(queue.handle(), RevealTiming::default());

        assert_eq!(reveal.state(), RevealState::HIDDEN);
        assert!(reveal.start());
        assert_eq!(reveal.stage(), RevealStage::Visible);

        advance_to(&clock, &queue, 99);
        assert!(!reveal.state().splitting);

        advance_to(&clock, &queue, 100);
        assert_eq!(reveal.stage(), RevealStage::Splitting);

        advance_to(&clock, &queue, 1499);
        assert!(!reveal.state().merged);

        advance_to(&clock, &queue, 1500);
        assert_eq!(
            reveal.state(),
            RevealState {
                visible: true,
                splitting: true,
                merged: true
            }
        );
        assert_eq!(reveal.pending_timers(), 0);
    }

    #[test]
    fn test_start_is_idempotent() {
        let (clock, queue) = setup();
        let reveal = EmailReveal::new(queue.handle(), RevealTiming::default());

        assert!(reveal.start());
        advance_to(&clock, &queue, 50);
        assert!(!reveal.start());
        assert_eq!(reveal.started_at_ms(), Some(0));

        // A restart at t=50 would split at 150; the first timer holds
        advance_to(&clock, &queue, 100);
        assert!(reveal.state().splitting);
        assert!(!reveal.start());

        advance_to(&clock, &queue, 1500);
        assert!(reveal.state().merged);
        assert_eq!(queue.pending_count(), 0);
    }

    #[test]
    fn test_states_are_monotonic_and_valid() {
        let (clock, queue) = setup();
        let reveal = EmailReveal::new(queue.handle(), RevealTiming::default());
        reveal.start();

        let mut last = reveal.stage();
        for t in (0..=2000).step_by(10) {
            advance_to(&clock, &queue, t);
            let state = reveal.state();
            assert!(state.is_valid());
            assert!(reveal.stage() >= last);
            last = reveal.stage();
        }
        assert_eq!(last, RevealStage::Merged);
    }

    #[test]
    fn test_drop_cancels_pending_timers() {
        let (clock, queue) = setup();
        let reveal = EmailReveal::new(queue.handle(), RevealTiming::default());
        reveal.start();
        assert_eq!(queue.pending_count(), 1);

        drop(reveal);
        assert_eq!(queue.pending_count(), 0);

        advance_to(&clock, &queue, 2000);
        assert_eq!(queue.pending_count(), 0);
    }

    #[test]
    fn test_drop_after_split_cancels_merge() {
        let (clock, queue) = setup();
        let reveal = EmailReveal::new(queue.handle(), RevealTiming::default());
        reveal.start();

        advance_to(&clock, &queue, 100);
        assert_eq!(queue.pending_count(), 1);
        assert_eq!(reveal.pending_timers(), 1);

        drop(reveal);
        assert_eq!(queue.pending_count(), 0);
    }

    #[test]
    fn test_cancel_freezes_state() {
        let (clock, queue) = setup();
        let reveal = EmailReveal::new(queue.handle(), RevealTiming::default());
        reveal.start();
        advance_to(&clock, &queue, 100);

        assert_eq!(reveal.cancel(), 1);
        advance_to(&clock, &queue, 5000);
        assert_eq!(reveal.stage(), RevealStage::Splitting);
    }

    #[test]
    fn test_equal_delays_merge_in_same_run() {
        let (clock, queue) = setup();
        let reveal = EmailReveal::new(queue.handle(), RevealTiming::new(100, 100));
        reveal.start();

        advance_to(&clock, &queue, 100);
        assert_eq!(reveal.stage(), RevealStage::Merged);
    }

    #[test]
    fn test_late_split_still_merges_on_time() {
        let (clock, queue) = setup();
        let reveal = EmailReveal::new(queue.handle(), RevealTiming::default());
        reveal.start();

        // One run at the merge time fires the split and then the merge
        advance_to(&clock, &queue, 1500);
        assert_eq!(reveal.stage(), RevealStage::Merged);
        assert_eq!(reveal.pending_timers(), 0);
        assert_eq!(queue.next_due_ms(), None);
    }

    #[test]
    fn test_merge_measured_from_start_time() {
        let (clock, queue) = setup();
        clock.set(37);
        let reveal = EmailReveal::new(queue.handle(), RevealTiming::default());
        reveal.start();

        // Split fires 63ms late
        advance_to(&clock, &queue, 200);
        assert_eq!(reveal.stage(), RevealStage::Splitting);
        assert_eq!(queue.next_due_ms(), Some(1537));

        advance_to(&clock, &queue, 1536);
        assert!(!reveal.state().merged);
        advance_to(&clock, &queue, 1537);
        assert!(reveal.state().merged);
    }

    #[test]
    fn test_dead_queue_is_harmless() {
        let (_clock, queue) = setup();
        let handle = queue.handle();
        drop(queue);

        let reveal = EmailReveal::new(handle, RevealTiming::default());
        assert!(reveal.start());
        assert_eq!(reveal.stage(), RevealStage::Visible);
        assert_eq!(reveal.pending_timers(), 0);
    }

    #[test]
    fn test_stage_state_mapping() {
        assert_eq!(RevealStage::Hidden.state(), RevealState::HIDDEN);
        assert_eq!(RevealStage::Splitting.state().stage(), RevealStage::Splitting);
        assert!(!RevealState {
            visible: false,
            splitting: true,
            merged: false
        }
        .is_valid());
    }
}
