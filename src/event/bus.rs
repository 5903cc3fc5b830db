use std::cell::RefCell;

use crate::event::{EditorEvent, EventHandler};

/// Fans editor events out to subscribers, in subscription order.
///
/// Handlers run synchronously on the emitting thread and cannot reach the bus
/// themselves, so an emit never re-enters.
#[derive(Default)]
pub struct EventBus {
    handlers: RefCell<Vec<Box<dyn EventHandler>>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handlers = self.handlers.borrow();
        f.debug_list().entries(handlers.iter().map(|h| h.name())).finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        log::debug!("event bus: subscribed {}", handler.name());
        self.handlers.borrow_mut().push(handler);
    }

    pub fn emit(&self, event: &EditorEvent) {
        for handler in self.handlers.borrow_mut().iter_mut() {
            handler.handle_event(event);
        }
    }
}
