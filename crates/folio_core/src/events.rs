//! Pointer input and viewport
//!
//! A single [`PointerDispatcher`] stands in for the window's `mousemove`
//! listener list. Hooks register through a weak [`DispatcherHandle`] and keep
//! their registration alive with a [`ListenerGuard`]; dropping the guard (or
//! calling [`ListenerGuard::remove`]) unsubscribes exactly once.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Handle to a registered pointer listener
    pub struct ListenerId;
}

/// A pointer-move event in client coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerEvent {
    pub x: f32,
    pub y: f32,
}

impl PointerEvent {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Listener callback. Uses Rc since input is single-threaded.
pub type PointerCallback = Rc<dyn Fn(&PointerEvent)>;

type Listeners = SlotMap<ListenerId, PointerCallback>;

/// Process-wide pointer-move listener registry
pub struct PointerDispatcher {
    listeners: Rc<RefCell<Listeners>>,
}

impl PointerDispatcher {
    pub fn new() -> Self {
        Self {
            listeners: Rc::new(RefCell::new(SlotMap::with_key())),
        }
    }

    pub fn handle(&self) -> DispatcherHandle {
        DispatcherHandle {
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    pub fn add_listener<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&PointerEvent) + 'static,
    {
        self.listeners.borrow_mut().insert(Rc::new(callback))
    }

    /// Remove a listener. Returns false if it was already removed.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let removed = self.listeners.borrow_mut().remove(id);
        removed.is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Deliver an event to every registered listener
    ///
    /// Listeners are snapshotted first, so a listener may unsubscribe itself
    /// (or others) while the event is being delivered.
    ///
    /// Returns the number of listeners invoked.
    pub fn dispatch(&self, event: &PointerEvent) -> usize {
        let snapshot: SmallVec<[PointerCallback; 4]> =
            self.listeners.borrow().values().cloned().collect();

        for listener in &snapshot {
            listener(event);
        }
        snapshot.len()
    }
}

impl Default for PointerDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// A weak handle to the pointer dispatcher
#[derive(Clone)]
pub struct DispatcherHandle {
    listeners: Weak<RefCell<Listeners>>,
}

impl DispatcherHandle {
    /// Subscribe for as long as the returned guard lives
    pub fn subscribe<F>(&self, callback: F) -> ListenerGuard
    where
        F: Fn(&PointerEvent) + 'static,
    {
        let id = self
            .listeners
            .upgrade()
            .map(|listeners| listeners.borrow_mut().insert(Rc::new(callback)));

        if id.is_none() {
            tracing::warn!("pointer subscription requested after dispatcher was dropped");
        }

        ListenerGuard {
            handle: self.clone(),
            id,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.listeners.strong_count() > 0
    }

    fn remove(&self, id: ListenerId) -> bool {
        match self.listeners.upgrade() {
            Some(listeners) => {
                let removed = listeners.borrow_mut().remove(id);
                removed.is_some()
            }
            None => false,
        }
    }
}

/// A live pointer subscription
#[must_use = "dropping a ListenerGuard unsubscribes it"]
pub struct ListenerGuard {
    handle: DispatcherHandle,
    id: Option<ListenerId>,
}

impl ListenerGuard {
    pub fn is_subscribed(&self) -> bool {
        self.id.is_some()
    }

    /// Unsubscribe. Only the first call has an effect.
    pub fn remove(&mut self) -> bool {
        match self.id.take() {
            Some(id) => {
                let removed = self.handle.remove(id);
                if removed {
                    tracing::debug!("pointer listener removed");
                }
                removed
            }
            None => false,
        }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.remove();
    }
}

/// Size of the visible area in CSS pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

/// Viewport shared between the runtime and the hooks that read it at event time
pub type SharedViewport = Rc<Cell<Viewport>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_reaches_listeners() {
        let dispatcher = PointerDispatcher::new();
        let last = Rc::new(Cell::new(PointerEvent::default()));

        let l = last.clone();
        dispatcher.add_listener(move |e| l.set(*e));

        assert_eq!(dispatcher.dispatch(&PointerEvent::new(3.0, 4.0)), 1);
        assert_eq!(last.get(), PointerEvent::new(3.0, 4.0));
    }

    #[test]
    fn test_guard_removes_once() {
        let dispatcher = PointerDispatcher::new();
        let mut guard = dispatcher.handle().subscribe(|_| {});
        assert_eq!(dispatcher.listener_count(), 1);

        assert!(guard.remove());
        assert!(!guard.remove());
        assert!(!guard.is_subscribed());
        assert_eq!(dispatcher.listener_count(), 0);
        assert_eq!(dispatcher.dispatch(&PointerEvent::new(1.0, 1.0)), 0);
    }

    #[test]
    fn test_guard_drop_unsubscribes() {
        let dispatcher = PointerDispatcher::new();
        {
            let _guard = dispatcher.handle().subscribe(|_| {});
            assert_eq!(dispatcher.listener_count(), 1);
        }
        assert_eq!(dispatcher.listener_count(), 0);
    }

    #[test]
    fn test_listener_can_unsubscribe_during_dispatch() {
        let dispatcher = PointerDispatcher::new();
        let guard: Rc<RefCell<Option<ListenerGuard>>> = Rc::new(RefCell::new(None));

        let slot = guard.clone();
        let g = dispatcher.handle().subscribe(move |_| {
            if let Some(mut g) = slot.borrow_mut().take() {
                g.remove();
            }
        });
        *guard.borrow_mut() = Some(g);

        assert_eq!(dispatcher.dispatch(&PointerEvent::new(0.0, 0.0)), 1);
        assert_eq!(dispatcher.listener_count(), 0);
    }

    #[test]
    fn test_subscribe_after_drop_is_inert() {
        let handle = PointerDispatcher::new().handle();
        assert!(!handle.is_alive());

        let mut guard = handle.subscribe(|_| {});
        assert!(!guard.is_subscribed());
        assert!(!guard.remove());
    }
}
