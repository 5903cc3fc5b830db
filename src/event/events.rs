use egui::Vec2;

use crate::element::{ElementId, ElementKind};
use crate::state::Mode;

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    ModeChanged {
        old: Mode,
        new: Mode,
    },
    PointAdded {
        count: usize,
    },
    PointRemoved {
        remaining: usize,
    },
    ShapeAborted {
        discarded: usize,
    },
    ElementAdded {
        id: ElementId,
        kind: ElementKind,
        number: Option<u32>,
    },
    ElementRemoved {
        id: ElementId,
        kind: ElementKind,
        number: Option<u32>,
    },
    ElementChanged {
        id: ElementId,
    },
    SelectionChanged {
        selected: Option<ElementId>,
    },
    ViewChanged {
        scale: f32,
        offset: Vec2,
    },
    PromptRequested,
    SessionCleared {
        generation: u64,
    },
    BackgroundChanged {
        generation: u64,
    },
    ExportFinished {
        generation: u64,
        bytes: usize,
    },
    ExportFailed {
        generation: u64,
        message: String,
    },
    ExportDiscarded {
        generation: u64,
        current: u64,
    },
    FormUpdated {
        field: &'static str,
    },
}
