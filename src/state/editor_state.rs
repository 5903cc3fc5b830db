//! The interaction modes of the drawing tool.
//!
//! ```text
//!             select mode (clears in-progress shape and selection)
//!   ┌──────┐ ◄───────────────────────────────────────► ┌──────────────┐
//!   │ View │                                           │ Draw(kind)   │──┐ click: add point
//!   └──────┘ ◄──────────┐               ┌────────────► └──────────────┘◄─┘ Enter/close/dbl/right: commit
//!       ▲               │               │
//!       ▼               ▼               ▼
//!   ┌──────┐        ┌────────┐
//!   │ Edit │ ◄────► │ Delete │
//!   └──────┘        └────────┘
//! ```
//!
//! Every mode can reach every other mode; the transition itself always clears
//! transient state. Exporting is an action, not a mode.
use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

use crate::element::{ElementId, ElementKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// No element interaction, primary drag pans
    #[default]
    View,
    /// Placing points of a new element of the given kind
    Draw(ElementKind),
    /// Selecting and dragging elements, vertices and badges
    Edit,
    /// Click removes an element
    Delete,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::View => "view",
            Mode::Draw(kind) => kind.name(),
            Mode::Edit => "edit",
            Mode::Delete => "delete",
        }
    }

    pub fn drawing_kind(&self) -> Option<ElementKind> {
        match self {
            Mode::Draw(kind) => Some(*kind),
            Mode::View | Mode::Edit | Mode::Delete => None,
        }
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, Mode::Draw(_))
    }

    /// The crosshair and snap glyph show in every mode except view.
    pub fn shows_cursor(&self) -> bool {
        !matches!(self, Mode::View)
    }
}

/// What part of an element a drag moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragTarget {
    /// Rigid translation of every point
    WholeElement,
    /// A single vertex, by index
    Vertex(usize),
    /// The number/label badge offset
    LabelOffset,
}

/// A drag in progress, anchored to the element as it was when the drag began.
///
/// Every update recomputes from this snapshot, so repeated moves never accumulate error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragState {
    pub element_id: ElementId,
    pub target: DragTarget,
    /// Drawing-space pointer position at mouse-down
    pub start: Pos2,
    pub original_points: Vec<Pos2>,
    pub original_offset: Vec2,
}

impl DragState {
    /// Points after moving the pointer to `pos`.
    pub fn points_at(&self, pos: Pos2) -> Vec<Pos2> {
        let delta = pos - self.start;
        match self.target {
            DragTarget::WholeElement => self.original_points.iter().map(|p| *p + delta).collect(),
            DragTarget::Vertex(index) => {
                let mut points = self.original_points.clone();
                if let Some(point) = points.get_mut(index) {
                    *point += delta;
                }
                points
            }
            DragTarget::LabelOffset => self.original_points.clone(),
        }
    }

    /// Badge offset after moving the pointer to `pos`.
    pub fn offset_at(&self, pos: Pos2) -> Vec2 {
        match self.target {
            DragTarget::LabelOffset => self.original_offset + (pos - self.start),
            DragTarget::WholeElement | DragTarget::Vertex(_) => self.original_offset,
        }
    }
}

/// A value the user is asked to type, answered through `Editor::resolve_prompt`.
///
/// Cancelling leaves everything unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PromptRequest {
    /// Text for a label about to be placed
    NewLabel { at: Pos2 },
    /// New number of a lot or building
    EditNumber { element_id: ElementId, current: u32 },
    /// New text of a label
    EditText { element_id: ElementId, current: String },
}

impl PromptRequest {
    pub fn title(&self) -> &'static str {
        match self {
            PromptRequest::NewLabel { .. } => "Texto de la etiqueta",
            PromptRequest::EditNumber { .. } => "Número",
            PromptRequest::EditText { .. } => "Editar etiqueta",
        }
    }

    pub fn initial_value(&self) -> String {
        match self {
            PromptRequest::NewLabel { .. } => String::new(),
            PromptRequest::EditNumber { current, .. } => current.to_string(),
            PromptRequest::EditText { current, .. } => current.clone(),
        }
    }
}
