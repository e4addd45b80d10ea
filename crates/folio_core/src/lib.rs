//! Folio Core Runtime
//!
//! The foundational, single-threaded event-loop primitives the page is built on:
//!
//! - **Clocks**: injectable millisecond time sources
//! - **Timers**: a `setTimeout`-style queue with scoped, cancel-on-drop handles
//! - **Pointer Events**: a process-wide pointer-move listener registry
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use folio_core::{ManualClock, PointerDispatcher, PointerEvent, TimerQueue};
//!
//! let clock = Rc::new(ManualClock::new());
//! let timers = TimerQueue::new(clock.clone());
//! let pointer = PointerDispatcher::new();
//!
//! let _listener = pointer.handle().subscribe(|e| println!("pointer at {}, {}", e.x, e.y));
//! let _timer = timers.handle().schedule_scoped(0, "mount", || println!("mounted"));
//!
//! timers.run_due();
//! pointer.dispatch(&PointerEvent::new(10.0, 20.0));
//! ```

pub mod clock;
pub mod events;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use events::{
    DispatcherHandle, ListenerGuard, ListenerId, PointerCallback, PointerDispatcher, PointerEvent,
    SharedViewport, Viewport,
};
pub use timer::{ScheduledTimer, TimerCallback, TimerHandle, TimerId, TimerQueue};
