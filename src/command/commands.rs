use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

use super::{CommandContext, CommandError, CommandResult};
use crate::element::{Element, ElementId, ElementKind, factory};
use crate::event::EditorEvent;
use crate::state::{DragState, DragTarget, Mode, PromptRequest, UndoOutcome};
use crate::viewport::PanState;

/// Every mutation of a drawing session.
///
/// Commands that reference an element id tolerate the id being gone:
/// they succeed with `Ok(None)` and change nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Switch interaction mode, clearing the in-progress shape and selection
    SetMode(Mode),

    /// Append a (snapped) point to the in-progress shape
    AddPoint(Pos2),

    /// Commit the in-progress shape; fewer than two points is a no-op
    CloseShape,

    /// Throw away the in-progress shape, staying in draw mode
    AbortShape,

    /// Remove the last in-progress point, else the last committed element
    Undo,

    /// Commit a one-point label
    PlaceLabel { at: Pos2, text: String },

    DeleteElement(ElementId),

    Select(Option<ElementId>),

    /// Select an element and snapshot it for dragging
    BeginDrag {
        element_id: ElementId,
        target: DragTarget,
        at: Pos2,
    },

    /// Move the active drag to a drawing-space position
    DragTo(Pos2),

    EndDrag,

    SetNumber { element_id: ElementId, number: u32 },

    SetText { element_id: ElementId, text: String },

    /// Ask the user for a value; answered through the editor
    RequestPrompt(PromptRequest),

    CancelPrompt,

    /// Start panning; `cursor` is container-local pixels
    BeginPan { cursor: Vec2 },

    PanTo { cursor: Vec2 },

    EndPan,

    /// One wheel step at a container-local cursor position
    Zoom { cursor: Vec2, delta: f32 },

    /// Identity pan/zoom and no selection
    ResetView,

    /// Abort the in-progress shape, or reset the view if there is none
    Escape,

    SetShowBackground(bool),

    /// Forget every element and start over
    ClearSession,
}

impl Command {
    /// Execute the command with the given context
    pub fn execute(&self, ctx: &mut CommandContext<'_>) -> CommandResult {
        let session = &mut *ctx.session;
        match self {
            Command::SetMode(mode) => {
                let old = session.set_mode(*mode);
                Ok(Some(EditorEvent::ModeChanged { old, new: *mode }))
            }

            Command::AddPoint(point) => match session.mode().drawing_kind() {
                Some(kind) if kind != ElementKind::Label => {
                    session.current_points.push(*point);
                    Ok(Some(EditorEvent::PointAdded {
                        count: session.current_points.len(),
                    }))
                }
                _ => Ok(None),
            },

            Command::CloseShape => {
                let Some(kind) = session.mode().drawing_kind() else {
                    return Ok(None);
                };
                Ok(session.commit_shape(kind).map(added))
            }

            Command::AbortShape => {
                let discarded = session.current_points.len();
                if discarded == 0 {
                    return Ok(None);
                }
                session.current_points.clear();
                Ok(Some(EditorEvent::ShapeAborted { discarded }))
            }

            Command::Undo => Ok(match session.undo() {
                UndoOutcome::Point { remaining } => Some(EditorEvent::PointRemoved { remaining }),
                UndoOutcome::Element(element) => Some(removed(&element)),
                UndoOutcome::Nothing => None,
            }),

            Command::PlaceLabel { at, text } => {
                let text = text.trim();
                if text.is_empty() {
                    return Err(CommandError::EmptyText);
                }
                Ok(Some(added(session.push_element(factory::create_label(*at, text)))))
            }

            Command::DeleteElement(id) => Ok(session.remove_element(*id).map(|e| removed(&e))),

            Command::Select(selected) => {
                let selected = selected.filter(|id| session.element(*id).is_some());
                if session.selected == selected {
                    return Ok(None);
                }
                session.selected = selected;
                Ok(Some(EditorEvent::SelectionChanged { selected }))
            }

            Command::BeginDrag {
                element_id,
                target,
                at,
            } => {
                let Some(element) = session.element(*element_id) else {
                    return Ok(None);
                };
                session.drag = Some(DragState {
                    element_id: *element_id,
                    target: *target,
                    start: *at,
                    original_points: element.points().to_vec(),
                    original_offset: element.label_offset(),
                });
                let changed = session.selected != Some(*element_id);
                session.selected = Some(*element_id);
                Ok(changed.then_some(EditorEvent::SelectionChanged {
                    selected: Some(*element_id),
                }))
            }

            Command::DragTo(pos) => {
                let Some(drag) = session.drag.clone() else {
                    return Ok(None);
                };
                let Some(element) = session.element_mut(drag.element_id) else {
                    session.drag = None;
                    return Ok(None);
                };
                match drag.target {
                    DragTarget::WholeElement => {
                        element.translate_from(&drag.original_points, *pos - drag.start);
                    }
                    DragTarget::Vertex(index) => {
                        let Some(target) = drag.points_at(*pos).get(index).copied() else {
                            return Ok(None);
                        };
                        element.set_vertex(index, target);
                    }
                    DragTarget::LabelOffset => element.set_label_offset(drag.offset_at(*pos)),
                }
                Ok(Some(EditorEvent::ElementChanged { id: drag.element_id }))
            }

            Command::EndDrag => {
                if let Some(drag) = session.drag.take() {
                    log::debug!("Finished {:?} drag of {}", drag.target, drag.element_id);
                }
                Ok(None)
            }

            Command::SetNumber { element_id, number } => {
                let Some(kind) = session.element(*element_id).map(|e| e.kind()) else {
                    return Ok(None);
                };
                if !kind.is_numbered() {
                    return Ok(None);
                }
                if session.number_taken(kind, *number, *element_id) {
                    return Err(CommandError::DuplicateNumber { kind, number: *number });
                }
                session.counters.observe(kind, *number);
                if let Some(element) = session.element_mut(*element_id) {
                    element.set_number(*number);
                }
                Ok(Some(EditorEvent::ElementChanged { id: *element_id }))
            }

            Command::SetText { element_id, text } => {
                let text = text.trim();
                if text.is_empty() {
                    return Err(CommandError::EmptyText);
                }
                match session.element_mut(*element_id) {
                    Some(element) if element.kind() == ElementKind::Label => {
                        element.set_text(text.to_owned());
                        Ok(Some(EditorEvent::ElementChanged { id: *element_id }))
                    }
                    _ => Ok(None),
                }
            }

            Command::RequestPrompt(request) => {
                session.drag = None;
                session.prompt = Some(request.clone());
                Ok(Some(EditorEvent::PromptRequested))
            }

            Command::CancelPrompt => {
                session.prompt = None;
                Ok(None)
            }

            Command::BeginPan { cursor } => {
                session.pan = Some(PanState::begin(*cursor, &session.viewport));
                Ok(None)
            }

            Command::PanTo { cursor } => {
                let Some(pan) = session.pan else {
                    return Ok(None);
                };
                pan.update(*cursor, &mut session.viewport);
                Ok(Some(view_changed(session.viewport.scale, session.viewport.offset)))
            }

            Command::EndPan => {
                session.pan = None;
                Ok(None)
            }

            Command::Zoom { cursor, delta } => {
                if session.viewport.zoom_at(*cursor, *delta, ctx.config.zoom_limits()) {
                    Ok(Some(view_changed(session.viewport.scale, session.viewport.offset)))
                } else {
                    Ok(None)
                }
            }

            Command::ResetView => {
                session.viewport.reset();
                session.clear_transient();
                Ok(Some(view_changed(session.viewport.scale, session.viewport.offset)))
            }

            Command::Escape => {
                if !session.current_points.is_empty() {
                    return Command::AbortShape.execute(ctx);
                }
                Command::ResetView.execute(ctx)
            }

            Command::SetShowBackground(show) => {
                session.show_background = *show;
                Ok(None)
            }

            Command::ClearSession => {
                session.reset();
                Ok(Some(EditorEvent::SessionCleared {
                    generation: session.generation,
                }))
            }
        }
    }
}

fn added(element: &Element) -> EditorEvent {
    EditorEvent::ElementAdded {
        id: element.id(),
        kind: element.kind(),
        number: element.number(),
    }
}

fn removed(element: &Element) -> EditorEvent {
    EditorEvent::ElementRemoved {
        id: element.id(),
        kind: element.kind(),
        number: element.number(),
    }
}

fn view_changed(scale: f32, offset: Vec2) -> EditorEvent {
    EditorEvent::ViewChanged { scale, offset }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::state::DrawingSession;
    use egui::{pos2, vec2};

    fn run(session: &mut DrawingSession, command: Command) -> CommandResult {
        let config = EditorConfig::default();
        command.execute(&mut CommandContext::new(session, &config))
    }

    fn draw(session: &mut DrawingSession, kind: ElementKind, points: &[Pos2]) -> ElementId {
        run(session, Command::SetMode(Mode::Draw(kind))).unwrap();
        for p in points {
            run(session, Command::AddPoint(*p)).unwrap();
        }
        match run(session, Command::CloseShape).unwrap() {
            Some(EditorEvent::ElementAdded { id, .. }) => id,
            other => panic!("expected an element, got {:?}", other),
        }
    }

    const SQUARE: [Pos2; 4] = [
        pos2(100.0, 100.0),
        pos2(300.0, 100.0),
        pos2(300.0, 300.0),
        pos2(100.0, 300.0),
    ];

    #[test]
    fn test_add_point_outside_draw_mode_is_ignored() {
        let mut session = DrawingSession::new();
        assert_eq!(run(&mut session, Command::AddPoint(pos2(1.0, 1.0))), Ok(None));
        run(&mut session, Command::SetMode(Mode::Draw(ElementKind::Label))).unwrap();
        assert_eq!(run(&mut session, Command::AddPoint(pos2(1.0, 1.0))), Ok(None));
        assert!(session.current_points().is_empty());
    }

    #[test]
    fn test_lots_and_buildings_number_independently() {
        let mut session = DrawingSession::new();
        draw(&mut session, ElementKind::Lot, &SQUARE);
        draw(&mut session, ElementKind::Building, &SQUARE);
        draw(&mut session, ElementKind::Lot, &SQUARE);
        draw(&mut session, ElementKind::Block, &SQUARE);
        let numbers: Vec<_> = session.elements().iter().map(|e| e.number()).collect();
        assert_eq!(numbers, vec![Some(1), Some(1), Some(2), None]);
    }

    #[test]
    fn test_undo_does_not_free_numbers() {
        let mut session = DrawingSession::new();
        draw(&mut session, ElementKind::Lot, &SQUARE);
        draw(&mut session, ElementKind::Lot, &SQUARE);
        run(&mut session, Command::Undo).unwrap();
        draw(&mut session, ElementKind::Lot, &SQUARE);
        assert_eq!(session.elements()[1].number(), Some(3));
    }

    #[test]
    fn test_escape_aborts_then_resets_view() {
        let mut session = DrawingSession::new();
        session.viewport.scale = 3.0;
        run(&mut session, Command::SetMode(Mode::Draw(ElementKind::Street))).unwrap();
        run(&mut session, Command::AddPoint(pos2(5.0, 5.0))).unwrap();

        let first = run(&mut session, Command::Escape).unwrap();
        assert_eq!(first, Some(EditorEvent::ShapeAborted { discarded: 1 }));
        assert_eq!(session.mode(), Mode::Draw(ElementKind::Street));
        assert_eq!(session.viewport().scale, 3.0);

        run(&mut session, Command::Escape).unwrap();
        assert!(session.viewport().is_identity());
    }

    #[test]
    fn test_vertex_drag_is_anchored_to_snapshot() {
        let mut session = DrawingSession::new();
        let id = draw(&mut session, ElementKind::Lot, &SQUARE);
        run(&mut session, Command::SetMode(Mode::Edit)).unwrap();
        run(
            &mut session,
            Command::BeginDrag { element_id: id, target: DragTarget::Vertex(2), at: pos2(300.0, 300.0) },
        )
        .unwrap();
        for p in [pos2(350.0, 320.0), pos2(200.0, 900.0), pos2(310.0, 305.0)] {
            run(&mut session, Command::DragTo(p)).unwrap();
        }
        run(&mut session, Command::EndDrag).unwrap();

        let element = session.element(id).unwrap();
        assert_eq!(element.points()[2], pos2(310.0, 305.0));
        assert_eq!(element.points()[0], SQUARE[0]);
        assert_eq!(session.selected(), Some(id));
        assert!(session.drag().is_none());
    }

    #[test]
    fn test_label_drag_moves_only_the_badge() {
        let mut session = DrawingSession::new();
        let id = draw(&mut session, ElementKind::Lot, &SQUARE);
        run(
            &mut session,
            Command::BeginDrag { element_id: id, target: DragTarget::LabelOffset, at: pos2(200.0, 200.0) },
        )
        .unwrap();
        run(&mut session, Command::DragTo(pos2(230.0, 190.0))).unwrap();
        let element = session.element(id).unwrap();
        assert_eq!(element.label_offset(), vec2(30.0, -10.0));
        assert_eq!(element.points(), &SQUARE);
    }

    #[test]
    fn test_stale_ids_are_no_ops() {
        let mut session = DrawingSession::new();
        let id = draw(&mut session, ElementKind::Lot, &SQUARE);
        run(&mut session, Command::DeleteElement(id)).unwrap();

        assert_eq!(run(&mut session, Command::DeleteElement(id)), Ok(None));
        assert_eq!(
            run(&mut session, Command::BeginDrag { element_id: id, target: DragTarget::WholeElement, at: pos2(0.0, 0.0) }),
            Ok(None)
        );
        assert_eq!(run(&mut session, Command::SetNumber { element_id: id, number: 9 }), Ok(None));
        assert_eq!(run(&mut session, Command::Select(Some(id))), Ok(None));
    }

    #[test]
    fn test_renumber_rejects_duplicates_and_raises_counter() {
        let mut session = DrawingSession::new();
        let first = draw(&mut session, ElementKind::Lot, &SQUARE);
        let second = draw(&mut session, ElementKind::Lot, &SQUARE);

        assert_eq!(
            run(&mut session, Command::SetNumber { element_id: second, number: 1 }),
            Err(CommandError::DuplicateNumber { kind: ElementKind::Lot, number: 1 })
        );
        assert_eq!(session.element(second).unwrap().number(), Some(2));

        run(&mut session, Command::SetNumber { element_id: first, number: 7 }).unwrap();
        let third = draw(&mut session, ElementKind::Lot, &SQUARE);
        assert_eq!(session.element(third).unwrap().number(), Some(8));
    }

    #[test]
    fn test_labels_need_text() {
        let mut session = DrawingSession::new();
        let result = run(&mut session, Command::PlaceLabel { at: pos2(5.0, 5.0), text: "   ".into() });
        assert_eq!(result, Err(CommandError::EmptyText));
        assert!(session.elements().is_empty());

        run(&mut session, Command::PlaceLabel { at: pos2(5.0, 5.0), text: " Calle 8 ".into() }).unwrap();
        assert_eq!(session.elements()[0].text(), Some("Calle 8"));
    }

    #[test]
    fn test_pan_follows_cursor() {
        let mut session = DrawingSession::new();
        run(&mut session, Command::BeginPan { cursor: vec2(100.0, 100.0) }).unwrap();
        run(&mut session, Command::PanTo { cursor: vec2(130.0, 80.0) }).unwrap();
        run(&mut session, Command::EndPan).unwrap();
        assert_eq!(session.viewport().offset, vec2(30.0, -20.0));
        assert!(!session.is_panning());
        assert_eq!(run(&mut session, Command::PanTo { cursor: vec2(0.0, 0.0) }), Ok(None));
    }
}
