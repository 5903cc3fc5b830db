mod bus;
mod events;
mod handlers;

pub use bus::EventBus;
pub use events::EditorEvent;
pub use handlers::{EventLog, LogHandler};

pub trait EventHandler {
    /// Short name used in logs and debug output.
    fn name(&self) -> &'static str;

    fn handle_event(&mut self, event: &EditorEvent);
}
