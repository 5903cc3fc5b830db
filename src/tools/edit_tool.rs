use egui::PointerButton;

use super::{PointerContext, Tool};
use crate::command::Command;
use crate::element::{Element, ElementKind};
use crate::geometry::hit_testing::{hit_vertex, topmost_badge, topmost_element};
use crate::state::{DragTarget, DrawingSession, PromptRequest};

/// Selects elements and drags them, their vertices or their badges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditTool;

impl EditTool {
    /// Handles of the selected element win over badges, badges over bodies.
    fn drag_target<'a>(ptr: &PointerContext, session: &'a DrawingSession) -> Option<(&'a Element, DragTarget)> {
        if let Some(selected) = session.selected().and_then(|id| session.element(id)) {
            if let Some(index) = hit_vertex(selected, ptr.drawing, ptr.handle_radius) {
                return Some((selected, DragTarget::Vertex(index)));
            }
        }
        if let Some(element) = topmost_badge(session.elements(), ptr.drawing, ptr.tolerance) {
            // A label is nothing but its badge, so grabbing it moves the anchor point.
            let target = match element.kind() {
                ElementKind::Label => DragTarget::WholeElement,
                _ => DragTarget::LabelOffset,
            };
            return Some((element, target));
        }
        topmost_element(session.elements(), ptr.drawing, ptr.tolerance).map(|e| (e, DragTarget::WholeElement))
    }
}

impl Tool for EditTool {
    fn name(&self) -> &'static str {
        "edit"
    }

    fn on_pointer_down(&mut self, ptr: &PointerContext, session: &DrawingSession) -> Option<Command> {
        if ptr.button != PointerButton::Primary {
            return None;
        }
        match Self::drag_target(ptr, session) {
            Some((element, target)) => Some(Command::BeginDrag {
                element_id: element.id(),
                target,
                at: ptr.drawing,
            }),
            None => Some(Command::Select(None)),
        }
    }

    fn on_pointer_move(&mut self, ptr: &PointerContext, session: &DrawingSession) -> Option<Command> {
        session.drag().map(|_| Command::DragTo(ptr.drawing))
    }

    fn on_pointer_up(&mut self, _ptr: &PointerContext, session: &DrawingSession) -> Option<Command> {
        session.drag().map(|_| Command::EndDrag)
    }

    fn on_double_click(&mut self, ptr: &PointerContext, session: &DrawingSession) -> Option<Command> {
        let element = topmost_badge(session.elements(), ptr.drawing, ptr.tolerance)
            .or_else(|| topmost_element(session.elements(), ptr.drawing, ptr.tolerance))?;
        let request = match element.kind() {
            ElementKind::Lot | ElementKind::Building => PromptRequest::EditNumber {
                element_id: element.id(),
                current: element.number()?,
            },
            ElementKind::Label => PromptRequest::EditText {
                element_id: element.id(),
                current: element.text().unwrap_or_default().to_owned(),
            },
            ElementKind::Block | ElementKind::Street => return None,
        };
        Some(Command::RequestPrompt(request))
    }
}
