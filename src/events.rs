//! Change notifications
//!
//! Grids publish a `GridChanged` event on every content change. Listeners are
//! called synchronously, before the mutating call returns. Everything here is
//! single-threaded (`Rc`/`RefCell`); the editor runs on the page's event loop.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::models::GridId;

/// A grid's content changed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridChanged {
    pub grid: GridId,
}

type Listener = Box<dyn FnMut(&GridChanged)>;

/// Fan-out channel from grids to the components that own them
///
/// Cloning the bus yields another handle to the same listener list.
/// Listeners must not subscribe from inside a notification.
#[derive(Clone, Default)]
pub struct ChangeBus {
    listeners: Rc<RefCell<Vec<Listener>>>,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl FnMut(&GridChanged) + 'static) {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    pub fn publish(&self, event: GridChanged) {
        for listener in self.listeners.borrow_mut().iter_mut() {
            listener(&event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl fmt::Debug for ChangeBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Records notifications so an owner can react once its own call is finished
///
/// The owner (collection manager, controller) cannot be re-borrowed from inside
/// a listener, so it queues the ids and drains them after each operation.
#[derive(Clone, Debug, Default)]
pub struct ChangeQueue {
    pending: Rc<RefCell<Vec<GridId>>>,
}

impl ChangeQueue {
    /// Create a queue subscribed to `bus`
    pub fn attach(bus: &ChangeBus) -> Self {
        let queue = Self::default();
        let pending = Rc::clone(&queue.pending);
        bus.subscribe(move |event| pending.borrow_mut().push(event.grid));
        queue
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Take every queued notification, oldest first
    pub fn drain(&self) -> Vec<GridId> {
        std::mem::take(&mut *self.pending.borrow_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_reaches_every_listener() {
        let bus = ChangeBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        for tag in 0..2 {
            let seen = Rc::clone(&seen);
            bus.subscribe(move |event| seen.borrow_mut().push((tag, event.grid)));
        }

        bus.publish(GridChanged { grid: GridId(7) });

        assert_eq!(*seen.borrow(), vec![(0, GridId(7)), (1, GridId(7))]);
    }

    #[test]
    fn test_clones_share_listeners() {
        let bus = ChangeBus::new();
        let queue = ChangeQueue::attach(&bus);
        let other = bus.clone();

        other.publish(GridChanged { grid: GridId(1) });
        other.publish(GridChanged { grid: GridId(2) });

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.drain(), vec![GridId(1), GridId(2)]);
        assert!(queue.is_empty());
    }
}
