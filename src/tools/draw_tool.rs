use egui::PointerButton;

use super::{PointerContext, Tool};
use crate::command::Command;
use crate::element::ElementKind;
use crate::state::{DrawingSession, PromptRequest};

/// Places points of a new element; labels are placed in a single click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawTool {
    kind: ElementKind,
}

impl DrawTool {
    pub fn new(kind: ElementKind) -> Self {
        Self { kind }
    }
}

impl Tool for DrawTool {
    fn name(&self) -> &'static str {
        self.kind.name()
    }

    fn on_pointer_down(&mut self, ptr: &PointerContext, _session: &DrawingSession) -> Option<Command> {
        match (ptr.button, self.kind) {
            (PointerButton::Secondary, ElementKind::Label) => None,
            (PointerButton::Secondary, _) => Some(Command::CloseShape),
            (PointerButton::Primary, ElementKind::Label) => {
                Some(Command::RequestPrompt(PromptRequest::NewLabel { at: ptr.snap.point }))
            }
            (PointerButton::Primary, _) => Some(Command::AddPoint(ptr.snap.point)),
            _ => None,
        }
    }

    // The second click of the pair already added a point at the same spot;
    // closing drops that duplicate.
    fn on_double_click(&mut self, _ptr: &PointerContext, _session: &DrawingSession) -> Option<Command> {
        (self.kind != ElementKind::Label).then_some(Command::CloseShape)
    }
}
