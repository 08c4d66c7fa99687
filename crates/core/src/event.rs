// Notifications from the output unit
// Stream errors arrive on the device thread, so listeners must be cheap

use crate::state::OutputState;
use parking_lot::Mutex;
use std::sync::Arc;

/// Output event types
#[derive(Debug, Clone, PartialEq)]
pub enum OutputEvent {
    /// Output state changed
    StateChanged {
        old_state: OutputState,
        new_state: OutputState,
    },

    /// Volume changed
    VolumeChanged { value: u8, factor: f32 },

    /// The device reported a stream error
    StreamError { message: String },
}

/// Output listener trait
/// Implementations should be lightweight and non-blocking
pub trait OutputListener: Send + Sync {
    fn on_event(&self, event: OutputEvent);
}

/// Fans events out to every registered listener
#[derive(Clone)]
pub struct EventDispatcher {
    listeners: Arc<Mutex<Vec<Arc<dyn OutputListener>>>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn add_listener(&self, listener: Arc<dyn OutputListener>) {
        self.listeners.lock().push(listener);
    }

    pub fn clear_listeners(&self) {
        self.listeners.lock().clear();
    }

    pub fn dispatch(&self, event: OutputEvent) {
        // Snapshot so listeners may re-register without deadlocking
        let listeners: Vec<Arc<dyn OutputListener>> = self.listeners.lock().clone();
        for listener in listeners.iter() {
            listener.on_event(event.clone());
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Simple listener implementation for testing
#[cfg(test)]
pub struct TestListener {
    events: Mutex<Vec<OutputEvent>>,
}

#[cfg(test)]
impl TestListener {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn get_events(&self) -> Vec<OutputEvent> {
        self.events.lock().clone()
    }
}

#[cfg(test)]
impl OutputListener for TestListener {
    fn on_event(&self, event: OutputEvent) {
        self.events.lock().push(event);
    }
}
