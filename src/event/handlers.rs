use std::sync::Arc;

use parking_lot::Mutex;

use crate::event::{EditorEvent, EventHandler};

/// Mirrors every editor event into the `log` facade
#[derive(Debug, Default)]
pub struct LogHandler;

impl EventHandler for LogHandler {
    fn name(&self) -> &'static str {
        "log"
    }

    fn handle_event(&mut self, event: &EditorEvent) {
        match event {
            EditorEvent::ElementAdded { .. }
            | EditorEvent::ElementRemoved { .. }
            | EditorEvent::SessionCleared { .. }
            | EditorEvent::BackgroundChanged { .. }
            | EditorEvent::ExportFinished { .. }
            | EditorEvent::FormUpdated { .. } => log::info!("{:?}", event),
            EditorEvent::ExportFailed { generation, message } => {
                log::error!("Export {} failed: {}", generation, message)
            }
            EditorEvent::ExportDiscarded { generation, current } => {
                log::warn!("Discarded stale export {} (session is at {})", generation, current)
            }
            _ => log::debug!("{:?}", event),
        }
    }
}

/// Records events into a shared list, so a host (or a test) can inspect them
/// after handing the handler to the bus.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<EditorEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<EditorEvent> {
        self.events.lock().clone()
    }
}

impl EventHandler for EventLog {
    fn name(&self) -> &'static str {
        "event_log"
    }

    fn handle_event(&mut self, event: &EditorEvent) {
        self.events.lock().push(event.clone());
    }
}
