//! Deferred callbacks
//!
//! The [`TimerQueue`] is the event loop's `setTimeout`: callbacks are scheduled
//! relative to the queue's [`Clock`] and fired by [`TimerQueue::run_due`] once
//! their due time has passed.
//!
//! Components never hold the queue itself. They hold a weak [`TimerHandle`] and
//! keep each pending timer alive through a [`ScheduledTimer`] guard, which
//! cancels the timer when dropped. Unmounting a component therefore cancels
//! everything it scheduled.
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use folio_core::clock::ManualClock;
//! use folio_core::timer::TimerQueue;
//!
//! let clock = Rc::new(ManualClock::new());
//! let queue = TimerQueue::new(clock.clone());
//! let fired = Rc::new(Cell::new(false));
//!
//! let flag = fired.clone();
//! let _guard = queue.handle().schedule_scoped(100, "example", move || flag.set(true));
//!
//! clock.advance(99);
//! queue.run_due();
//! assert!(!fired.get());
//!
//! clock.advance(1);
//! queue.run_due();
//! assert!(fired.get());
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use slotmap::{new_key_type, SlotMap};

use crate::clock::Clock;

new_key_type! {
    /// Handle to a pending timer
    pub struct TimerId;
}

/// Callback run when a timer fires
pub type TimerCallback = Box<dyn FnOnce()>;

struct PendingTimer {
    due_ms: u64,
    /// Insertion order, breaks ties between timers due at the same time
    seq: u64,
    label: &'static str,
    callback: TimerCallback,
}

struct TimerQueueInner {
    timers: SlotMap<TimerId, PendingTimer>,
    next_seq: u64,
}

impl TimerQueueInner {
    fn insert(&mut self, due_ms: u64, label: &'static str, callback: TimerCallback) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(PendingTimer {
            due_ms,
            seq,
            label,
            callback,
        })
    }

    fn take_next_due(&mut self, now_ms: u64) -> Option<(TimerId, PendingTimer)> {
        let id = self
            .timers
            .iter()
            .filter(|(_, t)| t.due_ms <= now_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.seq))
            .map(|(id, _)| id)?;
        self.timers.remove(id).map(|timer| (id, timer))
    }
}

/// Owner of all pending timers
pub struct TimerQueue {
    inner: Rc<RefCell<TimerQueueInner>>,
    clock: Rc<dyn Clock>,
}

impl TimerQueue {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(TimerQueueInner {
                timers: SlotMap::with_key(),
                next_seq: 0,
            })),
            clock,
        }
    }

    /// The clock timers are measured against
    pub fn clock(&self) -> &Rc<dyn Clock> {
        &self.clock
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Get a weak handle for components to schedule through
    pub fn handle(&self) -> TimerHandle {
        TimerHandle {
            inner: Rc::downgrade(&self.inner),
            clock: Rc::clone(&self.clock),
        }
    }

    /// Schedule `callback` to run `delay_ms` from now
    pub fn schedule<F>(&self, delay_ms: u64, label: &'static str, callback: F) -> TimerId
    where
        F: FnOnce() + 'static,
    {
        let due_ms = self.clock.now_ms().saturating_add(delay_ms);
        let id = self
            .inner
            .borrow_mut()
            .insert(due_ms, label, Box::new(callback));
        tracing::trace!("timer '{}' scheduled for t={}ms", label, due_ms);
        id
    }

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&self, id: TimerId) -> bool {
        cancel_in(&self.inner, id)
    }

    /// Number of timers that have not fired yet
    pub fn pending_count(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Due time of the earliest pending timer
    pub fn next_due_ms(&self) -> Option<u64> {
        self.inner.borrow().timers.values().map(|t| t.due_ms).min()
    }

    /// Fire every timer whose due time has passed, in due order
    ///
    /// The queue is not borrowed while a callback runs, so callbacks may
    /// schedule or cancel timers. A zero-delay timer scheduled by a callback
    /// fires within the same call.
    ///
    /// Returns the number of callbacks invoked.
    pub fn run_due(&self) -> usize {
        let now_ms = self.clock.now_ms();
        let mut fired = 0;

        loop {
            let next = self.inner.borrow_mut().take_next_due(now_ms);
            let Some((_, timer)) = next else {
                break;
            };

            tracing::trace!(
                "timer '{}' fired at t={}ms (due {}ms)",
                timer.label,
                now_ms,
                timer.due_ms
            );
            (timer.callback)();
            fired += 1;
        }

        fired
    }
}

fn cancel_in(inner: &RefCell<TimerQueueInner>, id: TimerId) -> bool {
    // Drop the removed callback after the borrow is released; its captures may
    // hold guards that call back into the queue.
    let removed = inner.borrow_mut().timers.remove(id);
    match removed {
        Some(timer) => {
            tracing::trace!("timer '{}' cancelled", timer.label);
            true
        }
        None => false,
    }
}

/// A weak handle to the timer queue
///
/// All operations are no-ops once the queue has been dropped.
#[derive(Clone)]
pub struct TimerHandle {
    inner: Weak<RefCell<TimerQueueInner>>,
    clock: Rc<dyn Clock>,
}

impl TimerHandle {
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Schedule a timer, returning `None` if the queue is gone
    pub fn schedule<F>(&self, delay_ms: u64, label: &'static str, callback: F) -> Option<TimerId>
    where
        F: FnOnce() + 'static,
    {
        let inner = self.inner.upgrade()?;
        let due_ms = self.clock.now_ms().saturating_add(delay_ms);
        let id = inner.borrow_mut().insert(due_ms, label, Box::new(callback));
        tracing::trace!("timer '{}' scheduled for t={}ms", label, due_ms);
        Some(id)
    }

    /// Schedule a timer owned by the returned guard
    pub fn schedule_scoped<F>(&self, delay_ms: u64, label: &'static str, callback: F) -> ScheduledTimer
    where
        F: FnOnce() + 'static,
    {
        ScheduledTimer {
            handle: self.clone(),
            id: self.schedule(delay_ms, label, callback),
        }
    }

    pub fn cancel(&self, id: TimerId) -> bool {
        match self.inner.upgrade() {
            Some(inner) => cancel_in(&inner, id),
            None => false,
        }
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.borrow().timers.contains_key(id))
            .unwrap_or(false)
    }

    /// Check if the queue is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

/// A pending timer that is cancelled when this guard is dropped
#[must_use = "dropping a ScheduledTimer cancels it"]
pub struct ScheduledTimer {
    handle: TimerHandle,
    id: Option<TimerId>,
}

impl ScheduledTimer {
    pub fn id(&self) -> Option<TimerId> {
        self.id
    }

    /// Check if the timer is still waiting to fire
    pub fn is_pending(&self) -> bool {
        self.id.map(|id| self.handle.is_pending(id)).unwrap_or(false)
    }

    /// Cancel the timer. Calling this more than once is harmless.
    pub fn cancel(&mut self) -> bool {
        match self.id.take() {
            Some(id) => self.handle.cancel(id),
            None => false,
        }
    }
}

impl Drop for ScheduledTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
