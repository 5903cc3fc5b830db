use egui::{PointerButton, Pos2, Vec2};

use crate::command::Command;
use crate::geometry::snap::SnapResult;
use crate::state::{DrawingSession, Mode};

mod delete_tool;
mod draw_tool;
mod edit_tool;
mod view_tool;

pub use delete_tool::DeleteTool;
pub use draw_tool::DrawTool;
pub use edit_tool::EditTool;
pub use view_tool::ViewTool;

/// Where a pointer event landed, in every coordinate space a tool may need.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerContext {
    /// Absolute screen position
    pub screen: Pos2,
    /// Position relative to the canvas origin, in screen pixels
    pub local: Vec2,
    /// Raw drawing-space position
    pub drawing: Pos2,
    /// Snapped drawing-space position
    pub snap: SnapResult,
    pub button: PointerButton,
    /// Pick tolerance in drawing units, already divided by the zoom scale
    pub tolerance: f32,
    /// Vertex handle radius in drawing units
    pub handle_radius: f32,
}

/// Tool trait defines how one interaction mode turns pointer events into commands
pub trait Tool {
    fn name(&self) -> &'static str;

    /// Handle pointer press on the canvas.
    fn on_pointer_down(&mut self, ptr: &PointerContext, session: &DrawingSession) -> Option<Command>;

    /// Handle pointer movement, pressed or not.
    fn on_pointer_move(&mut self, _ptr: &PointerContext, _session: &DrawingSession) -> Option<Command> {
        None
    }

    /// Handle pointer release.
    fn on_pointer_up(&mut self, _ptr: &PointerContext, _session: &DrawingSession) -> Option<Command> {
        None
    }

    /// Handle a double-click, reported after the second release.
    fn on_double_click(&mut self, _ptr: &PointerContext, _session: &DrawingSession) -> Option<Command> {
        None
    }
}

/// Enum representing all available tools, one per mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolType {
    Draw(DrawTool),
    Edit(EditTool),
    Delete(DeleteTool),
    View(ViewTool),
}

impl ToolType {
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::View => Self::View(ViewTool),
            Mode::Draw(kind) => Self::Draw(DrawTool::new(kind)),
            Mode::Edit => Self::Edit(EditTool),
            Mode::Delete => Self::Delete(DeleteTool),
        }
    }
}

impl Tool for ToolType {
    fn name(&self) -> &'static str {
        match self {
            Self::Draw(tool) => tool.name(),
            Self::Edit(tool) => tool.name(),
            Self::Delete(tool) => tool.name(),
            Self::View(tool) => tool.name(),
        }
    }

    fn on_pointer_down(&mut self, ptr: &PointerContext, session: &DrawingSession) -> Option<Command> {
        match self {
            Self::Draw(tool) => tool.on_pointer_down(ptr, session),
            Self::Edit(tool) => tool.on_pointer_down(ptr, session),
            Self::Delete(tool) => tool.on_pointer_down(ptr, session),
            Self::View(tool) => tool.on_pointer_down(ptr, session),
        }
    }

    fn on_pointer_move(&mut self, ptr: &PointerContext, session: &DrawingSession) -> Option<Command> {
        match self {
            Self::Draw(tool) => tool.on_pointer_move(ptr, session),
            Self::Edit(tool) => tool.on_pointer_move(ptr, session),
            Self::Delete(tool) => tool.on_pointer_move(ptr, session),
            Self::View(tool) => tool.on_pointer_move(ptr, session),
        }
    }

    fn on_pointer_up(&mut self, ptr: &PointerContext, session: &DrawingSession) -> Option<Command> {
        match self {
            Self::Draw(tool) => tool.on_pointer_up(ptr, session),
            Self::Edit(tool) => tool.on_pointer_up(ptr, session),
            Self::Delete(tool) => tool.on_pointer_up(ptr, session),
            Self::View(tool) => tool.on_pointer_up(ptr, session),
        }
    }

    fn on_double_click(&mut self, ptr: &PointerContext, session: &DrawingSession) -> Option<Command> {
        match self {
            Self::Draw(tool) => tool.on_double_click(ptr, session),
            Self::Edit(tool) => tool.on_double_click(ptr, session),
            Self::Delete(tool) => tool.on_double_click(ptr, session),
            Self::View(tool) => tool.on_double_click(ptr, session),
        }
    }
}
