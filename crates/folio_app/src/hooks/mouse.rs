//! Pointer position tracking

use std::cell::Cell;
use std::rc::Rc;

use folio_core::{DispatcherHandle, ListenerGuard, PointerEvent};

/// The latest pointer coordinates; no history is kept
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerPosition {
    pub x: f32,
    pub y: f32,
}

impl From<&PointerEvent> for PointerPosition {
    fn from(event: &PointerEvent) -> Self {
        Self {
            x: event.x,
            y: event.y,
        }
    }
}

/// Follows pointer-move events for as long as it is mounted
///
/// The listener is registered at mount and removed by [`unmount`](Self::unmount)
/// or on drop, whichever comes first. Events after that never reach the
/// tracker.
pub struct MouseTracker {
    position: Rc<Cell<PointerPosition>>,
    listener: ListenerGuard,
}

impl MouseTracker {
    pub fn mount(dispatcher: &DispatcherHandle) -> Self {
        Self::mount_with(dispatcher, |_| {})
    }

    /// Mount and also call `on_move` with every new position
    pub fn mount_with<F>(dispatcher: &DispatcherHandle, on_move: F) -> Self
    where
        F: Fn(PointerPosition) + 'static,
    {
        let position = Rc::new(Cell::new(PointerPosition::default()));

        let sink = Rc::downgrade(&position);
        let listener = dispatcher.subscribe(move |event| {
            let Some(position) = sink.upgrade() else {
                return;
            };
            let next = PointerPosition::from(event);
            position.set(next);
            on_move(next);
        });

        Self { position, listener }
    }

    pub fn position(&self) -> PointerPosition {
        self.position.get()
    }

    pub fn is_mounted(&self) -> bool {
        self.listener.is_subscribed()
    }

    /// Remove the listener. Returns false if it was already removed.
    pub fn unmount(&mut self) -> bool {
        self.listener.remove()
    }
}
