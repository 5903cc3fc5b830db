use egui::Pos2;
use serde::{Deserialize, Serialize};

use super::{DragState, Mode, PromptRequest};
use crate::element::{Element, ElementId, ElementKind, MIN_SHAPE_POINTS, factory};
use crate::geometry::snap::SnapResult;
use crate::viewport::{PanState, Viewport};

/// Per-kind number sequences. They only grow, so deleted numbers are never handed out again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberCounters {
    lot: u32,
    building: u32,
}

impl NumberCounters {
    fn slot(&mut self, kind: ElementKind) -> Option<&mut u32> {
        match kind {
            ElementKind::Lot => Some(&mut self.lot),
            ElementKind::Building => Some(&mut self.building),
            ElementKind::Block | ElementKind::Street | ElementKind::Label => None,
        }
    }

    /// Hand out the next number for `kind`, or `None` for unnumbered kinds.
    pub(crate) fn next(&mut self, kind: ElementKind) -> Option<u32> {
        self.slot(kind).map(|n| {
            *n += 1;
            *n
        })
    }

    /// Make sure later numbers stay above `number`.
    pub(crate) fn observe(&mut self, kind: ElementKind, number: u32) {
        if let Some(n) = self.slot(kind) {
            *n = (*n).max(number);
        }
    }

    pub fn last(&self, kind: ElementKind) -> Option<u32> {
        match kind {
            ElementKind::Lot => Some(self.lot),
            ElementKind::Building => Some(self.building),
            ElementKind::Block | ElementKind::Street | ElementKind::Label => None,
        }
    }
}

/// What an undo removed.
#[derive(Debug, Clone, PartialEq)]
pub enum UndoOutcome {
    /// The last point of the in-progress shape
    Point { remaining: usize },
    /// The most recently committed element
    Element(Element),
    Nothing,
}

/// The whole state of one drawing session.
///
/// The session exclusively owns its elements; insertion order is both the
/// drawing order and the undo order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingSession {
    pub(crate) elements: Vec<Element>,
    pub(crate) current_points: Vec<Pos2>,
    pub(crate) viewport: Viewport,
    pub(crate) mode: Mode,
    pub(crate) selected: Option<ElementId>,
    pub(crate) drag: Option<DragState>,
    pub(crate) prompt: Option<PromptRequest>,
    pub(crate) counters: NumberCounters,
    pub(crate) show_background: bool,
    /// Bumped whenever the session is reset or the background changes,
    /// so results computed against an older state can be recognised.
    pub(crate) generation: u64,
    #[serde(skip)]
    pub(crate) pan: Option<PanState>,
    #[serde(skip)]
    pub(crate) cursor: Option<SnapResult>,
}

impl Default for DrawingSession {
    fn default() -> Self {
        Self {
            elements: Vec::new(),
            current_points: Vec::new(),
            viewport: Viewport::default(),
            mode: Mode::default(),
            selected: None,
            drag: None,
            prompt: None,
            counters: NumberCounters::default(),
            show_background: true,
            generation: 0,
            pan: None,
            cursor: None,
        }
    }
}

impl DrawingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub(crate) fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id() == id)
    }

    pub fn elements_of(&self, kind: ElementKind) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(move |e| e.kind() == kind)
    }

    pub fn current_points(&self) -> &[Pos2] {
        &self.current_points
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    pub fn prompt(&self) -> Option<&PromptRequest> {
        self.prompt.as_ref()
    }

    pub fn cursor(&self) -> Option<SnapResult> {
        self.cursor
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_some()
    }

    pub fn show_background(&self) -> bool {
        self.show_background
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn counters(&self) -> &NumberCounters {
        &self.counters
    }

    /// Drop selection, drag and pan state.
    pub(crate) fn clear_transient(&mut self) {
        self.selected = None;
        self.drag = None;
        self.pan = None;
    }

    /// Switch mode. Always clears the in-progress shape and any selection.
    pub(crate) fn set_mode(&mut self, mode: Mode) -> Mode {
        let old = self.mode;
        self.mode = mode;
        self.current_points.clear();
        self.clear_transient();
        self.prompt = None;
        if !mode.shows_cursor() {
            self.cursor = None;
        }
        old
    }

    /// Commit the in-progress points as a new element of `kind`.
    ///
    /// Consecutive duplicates are dropped first (a double-click lands twice on
    /// the same spot). Fewer than [`MIN_SHAPE_POINTS`] points is a no-op.
    pub(crate) fn commit_shape(&mut self, kind: ElementKind) -> Option<&Element> {
        let mut points = self.current_points.clone();
        points.dedup();
        if kind == ElementKind::Label || points.len() < MIN_SHAPE_POINTS {
            return None;
        }
        let number = self.counters.next(kind);
        let element = factory::create_shape(kind, points, number)?;
        self.current_points.clear();
        self.elements.push(element);
        self.elements.last()
    }

    pub(crate) fn push_element(&mut self, element: Element) -> &Element {
        self.elements.push(element);
        &self.elements[self.elements.len() - 1]
    }

    /// Remove an element by id. Unknown ids are ignored.
    pub(crate) fn remove_element(&mut self, id: ElementId) -> Option<Element> {
        let index = self.elements.iter().position(|e| e.id() == id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.drag.as_ref().is_some_and(|d| d.element_id == id) {
            self.drag = None;
        }
        Some(self.elements.remove(index))
    }

    /// Remove the last in-progress point, or else the last committed element.
    pub(crate) fn undo(&mut self) -> UndoOutcome {
        if self.current_points.pop().is_some() {
            return UndoOutcome::Point {
                remaining: self.current_points.len(),
            };
        }
        match self.elements.last().map(|e| e.id()) {
            Some(id) => self.remove_element(id).map_or(UndoOutcome::Nothing, UndoOutcome::Element),
            None => UndoOutcome::Nothing,
        }
    }

    /// True if another element of the same kind already carries `number`.
    pub(crate) fn number_taken(&self, kind: ElementKind, number: u32, except: ElementId) -> bool {
        self.elements_of(kind)
            .any(|e| e.id() != except && e.number() == Some(number))
    }

    /// Forget everything drawn and start over.
    pub(crate) fn reset(&mut self) {
        let generation = self.generation + 1;
        let show_background = self.show_background;
        *self = Self {
            generation,
            show_background,
            ..Self::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn session_with_points(points: &[Pos2]) -> DrawingSession {
        let mut session = DrawingSession::new();
        session.set_mode(Mode::Draw(ElementKind::Lot));
        session.current_points.extend_from_slice(points);
        session
    }

    #[test]
    fn test_commit_needs_two_points() {
        let mut session = session_with_points(&[pos2(1.0, 1.0)]);
        assert!(session.commit_shape(ElementKind::Lot).is_none());
        assert_eq!(session.current_points().len(), 1);
        assert!(session.elements().is_empty());
    }

    #[test]
    fn test_commit_drops_double_click_duplicate() {
        let mut session = session_with_points(&[pos2(1.0, 1.0), pos2(5.0, 1.0), pos2(5.0, 1.0)]);
        let element = session.commit_shape(ElementKind::Street).unwrap();
        assert_eq!(element.points(), &[pos2(1.0, 1.0), pos2(5.0, 1.0)]);
        assert!(session.current_points().is_empty());
    }

    #[test]
    fn test_mode_change_clears_transient_state() {
        let mut session = session_with_points(&[pos2(1.0, 1.0), pos2(2.0, 2.0)]);
        session.selected = Some(ElementId::new());
        let old = session.set_mode(Mode::Edit);
        assert_eq!(old, Mode::Draw(ElementKind::Lot));
        assert!(session.current_points().is_empty());
        assert!(session.selected().is_none());
    }

    #[test]
    fn test_reset_bumps_generation() {
        let mut session = session_with_points(&[pos2(1.0, 1.0), pos2(2.0, 2.0)]);
        session.commit_shape(ElementKind::Lot);
        session.reset();
        assert_eq!(session.generation(), 1);
        assert!(session.elements().is_empty());
        assert_eq!(session.counters().last(ElementKind::Lot), Some(0));
    }

    #[test]
    fn test_session_serializes() {
        let mut session = session_with_points(&[pos2(1.0, 1.0), pos2(2.0, 2.0)]);
        session.commit_shape(ElementKind::Lot);
        let json = serde_json::to_string(&session).unwrap();
        let restored: DrawingSession = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.elements(), session.elements());
        assert_eq!(restored.mode(), session.mode());
    }
}
