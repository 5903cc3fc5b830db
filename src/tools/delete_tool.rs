use egui::PointerButton;

use super::{PointerContext, Tool};
use crate::command::Command;
use crate::geometry::hit_testing::topmost_element;
use crate::state::DrawingSession;

/// Removes the clicked element, no questions asked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteTool;

impl Tool for DeleteTool {
    fn name(&self) -> &'static str {
        "delete"
    }

    fn on_pointer_down(&mut self, ptr: &PointerContext, session: &DrawingSession) -> Option<Command> {
        if ptr.button != PointerButton::Primary {
            return None;
        }
        topmost_element(session.elements(), ptr.drawing, ptr.tolerance).map(|e| Command::DeleteElement(e.id()))
    }
}
