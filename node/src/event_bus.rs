//! Fan-out of ledger events to in-process subscribers.

use fast_engine::FastEvent;

/// Synchronous fan-out event bus for committed ledger events.
///
/// Listeners are invoked inline after a message commits; a failed message
/// never reaches them.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&FastEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&FastEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &FastEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
