use crate::config::EditorConfig;
use crate::state::DrawingSession;

/// Context for command execution: the session being edited and the active tunables.
#[derive(Debug)]
pub struct CommandContext<'a> {
    pub session: &'a mut DrawingSession,
    pub config: &'a EditorConfig,
}

impl<'a> CommandContext<'a> {
    pub fn new(session: &'a mut DrawingSession, config: &'a EditorConfig) -> Self {
        Self { session, config }
    }
}
