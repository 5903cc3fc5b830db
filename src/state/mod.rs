mod editor_state;
mod session;

pub use editor_state::{DragState, DragTarget, Mode, PromptRequest};
pub use session::{DrawingSession, NumberCounters, UndoOutcome};
