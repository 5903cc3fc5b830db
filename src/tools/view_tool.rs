use egui::PointerButton;

use super::{PointerContext, Tool};
use crate::command::Command;
use crate::state::DrawingSession;

/// Primary drag pans; elements are left alone.
///
/// Pan movement itself is driven by the editor, which also pans with the middle button in every mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewTool;

impl Tool for ViewTool {
    fn name(&self) -> &'static str {
        "view"
    }

    fn on_pointer_down(&mut self, ptr: &PointerContext, _session: &DrawingSession) -> Option<Command> {
        (ptr.button == PointerButton::Primary).then_some(Command::BeginPan { cursor: ptr.local })
    }

    fn on_pointer_up(&mut self, _ptr: &PointerContext, session: &DrawingSession) -> Option<Command> {
        session.is_panning().then_some(Command::EndPan)
    }
}
