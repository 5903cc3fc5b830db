use morpho_study::command::Command;
use morpho_study::element::{ElementKind, factory};
use morpho_study::geometry::snap::SnapKind;
use morpho_study::input::{InputEvent, InputLocation, KeyAction};
use morpho_study::state::Mode;
use morpho_study::Editor;
use egui::{PointerButton, Pos2, Rect, pos2, vec2};

// Screen and drawing coordinates coincide on this canvas at identity zoom.
fn container() -> Rect {
    Rect::from_min_size(Pos2::ZERO, vec2(1000.0, 1000.0))
}

fn at(x: f32, y: f32) -> InputLocation {
    InputLocation {
        position: pos2(x, y),
        is_in_canvas: true,
    }
}

fn click(editor: &mut Editor, x: f32, y: f32) {
    press_and_release(editor, (x, y), (x, y));
}

fn press_and_release(editor: &mut Editor, from: (f32, f32), to: (f32, f32)) {
    let button = PointerButton::Primary;
    let (x, y) = from;
    editor.handle_event(&InputEvent::PointerMove { location: at(x, y) }, container());
    editor.handle_event(&InputEvent::PointerDown { location: at(x, y), button }, container());
    let (x, y) = to;
    if to != from {
        editor.handle_event(&InputEvent::PointerMove { location: at(x, y) }, container());
    }
    editor.handle_event(&InputEvent::PointerUp { location: at(x, y), button }, container());
}

fn key(editor: &mut Editor, action: KeyAction) {
    editor.handle_event(&InputEvent::Key(action), container());
}

fn draw_lot(editor: &mut Editor, x: f32) {
    editor.execute(Command::SetMode(Mode::Draw(ElementKind::Lot))).unwrap();
    for p in [pos2(x, 0.0), pos2(x + 50.0, 0.0), pos2(x + 50.0, 50.0)] {
        editor.execute(Command::AddPoint(p)).unwrap();
    }
    editor.execute(Command::CloseShape).unwrap();
}

fn lot_numbers(editor: &Editor) -> Vec<u32> {
    editor
        .session()
        .elements_of(ElementKind::Lot)
        .filter_map(|e| e.number())
        .collect()
}

#[test]
fn test_building_click_snaps_onto_lot_corner() {
    let mut editor = Editor::default();
    editor.execute(Command::SetMode(Mode::Draw(ElementKind::Lot))).unwrap();
    for (x, y) in [(100.0, 100.0), (300.0, 100.0), (300.0, 300.0), (100.0, 300.0)] {
        click(&mut editor, x, y);
    }
    editor.execute(Command::CloseShape).unwrap();

    editor.execute(Command::SetMode(Mode::Draw(ElementKind::Building))).unwrap();
    editor.handle_event(&InputEvent::PointerMove { location: at(108.0, 95.0) }, container());
    let cursor = editor.session().cursor().unwrap();
    assert_eq!(cursor.kind, SnapKind::Vertex);

    click(&mut editor, 108.0, 95.0);
    assert_eq!(editor.session().current_points(), &[pos2(100.0, 100.0)]);
}

#[test]
fn test_click_on_edge_lands_on_the_line() {
    let mut editor = Editor::default();
    editor.execute(Command::SetMode(Mode::Draw(ElementKind::Block))).unwrap();
    for (x, y) in [(100.0, 100.0), (500.0, 100.0), (500.0, 500.0)] {
        click(&mut editor, x, y);
    }
    editor.execute(Command::CloseShape).unwrap();

    editor.execute(Command::SetMode(Mode::Draw(ElementKind::Street))).unwrap();
    click(&mut editor, 300.0, 106.0);
    assert_eq!(editor.session().current_points(), &[pos2(300.0, 100.0)]);
}

#[test]
fn test_lot_numbers_are_never_reused() {
    let mut editor = Editor::default();
    for x in [0.0, 100.0, 200.0] {
        draw_lot(&mut editor, x);
    }
    assert_eq!(lot_numbers(&editor), vec![1, 2, 3]);

    let second = editor
        .session()
        .elements_of(ElementKind::Lot)
        .find(|e| e.number() == Some(2))
        .unwrap()
        .id();
    editor.execute(Command::DeleteElement(second)).unwrap();
    draw_lot(&mut editor, 300.0);
    assert_eq!(lot_numbers(&editor), vec![1, 3, 4]);
}

#[test]
fn test_undo_restores_prior_state() {
    let mut editor = Editor::default();
    draw_lot(&mut editor, 0.0);
    let before = editor.session().elements().to_vec();

    draw_lot(&mut editor, 100.0);
    editor.execute(Command::Undo).unwrap();
    assert_eq!(editor.session().elements(), before.as_slice());

    editor.execute(Command::AddPoint(pos2(1.0, 1.0))).unwrap();
    editor.execute(Command::Undo).unwrap();
    assert!(editor.session().current_points().is_empty());
    assert_eq!(editor.session().elements(), before.as_slice());
}

#[test]
fn test_closed_and_open_kinds_have_different_edges() {
    let points = vec![pos2(0.0, 0.0), pos2(10.0, 0.0), pos2(10.0, 10.0)];
    let block = factory::create_shape(ElementKind::Block, points.clone(), None).unwrap();
    let street = factory::create_shape(ElementKind::Street, points, None).unwrap();
    assert_eq!(block.edges().len(), 3);
    assert_eq!(street.edges().len(), 2);
    assert_eq!(block.edges()[2], (pos2(10.0, 10.0), pos2(0.0, 0.0)));
}

#[test]
fn test_mode_switch_drops_unfinished_shape() {
    let mut editor = Editor::default();
    editor.execute(Command::SetMode(Mode::Draw(ElementKind::Block))).unwrap();
    click(&mut editor, 10.0, 10.0);
    click(&mut editor, 200.0, 10.0);
    editor.execute(Command::SetMode(Mode::Edit)).unwrap();
    assert!(editor.session().current_points().is_empty());
    assert!(editor.session().elements().is_empty());
}

#[test]
fn test_enter_commits_clicked_lot() {
    let mut editor = Editor::default();
    editor.execute(Command::SetMode(Mode::Draw(ElementKind::Lot))).unwrap();
    for (x, y) in [(100.0, 100.0), (300.0, 100.0), (300.0, 300.0), (100.0, 300.0)] {
        click(&mut editor, x, y);
    }
    key(&mut editor, KeyAction::CloseShape);

    let lots: Vec<_> = editor.session().elements_of(ElementKind::Lot).collect();
    assert_eq!(lots.len(), 1);
    assert_eq!(
        lots[0].points(),
        &[pos2(100.0, 100.0), pos2(300.0, 100.0), pos2(300.0, 300.0), pos2(100.0, 300.0)]
    );
    assert_eq!(lots[0].number(), Some(1));
    assert!(editor.session().current_points().is_empty());
}

#[test]
fn test_undo_key_removes_point_then_element() {
    let mut editor = Editor::default();
    draw_lot(&mut editor, 0.0);
    click(&mut editor, 500.0, 500.0);
    click(&mut editor, 600.0, 500.0);

    key(&mut editor, KeyAction::Undo);
    assert_eq!(editor.session().current_points(), &[pos2(500.0, 500.0)]);
    assert_eq!(editor.session().elements().len(), 1);

    key(&mut editor, KeyAction::Undo);
    key(&mut editor, KeyAction::Undo);
    assert!(editor.session().current_points().is_empty());
    assert!(editor.session().elements().is_empty());

    // Nothing left: still fine.
    key(&mut editor, KeyAction::Undo);
    assert!(editor.session().elements().is_empty());
}

#[test]
fn test_delete_click_removes_only_element_under_cursor() {
    let mut editor = Editor::default();
    for x in [0.0, 100.0, 200.0] {
        draw_lot(&mut editor, x);
    }
    editor.execute(Command::SetMode(Mode::Delete)).unwrap();
    click(&mut editor, 140.0, 10.0);
    assert_eq!(lot_numbers(&editor), vec![1, 3]);

    click(&mut editor, 700.0, 700.0);
    assert_eq!(lot_numbers(&editor), vec![1, 3]);
}

#[test]
fn test_delete_click_on_label_text_removes_it() {
    let mut editor = Editor::default();
    editor.execute(Command::PlaceLabel { at: pos2(500.0, 500.0), text: "Av. Daniel León Borja".into() }).unwrap();
    editor.execute(Command::SetMode(Mode::Delete)).unwrap();
    click(&mut editor, 540.0, 500.0);
    assert!(editor.session().elements().is_empty());
}

#[test]
fn test_primary_drag_pans_in_view_mode() {
    let mut editor = Editor::default();
    draw_lot(&mut editor, 0.0);
    editor.execute(Command::SetMode(Mode::View)).unwrap();
    let before = editor.session().elements().to_vec();

    press_and_release(&mut editor, (100.0, 100.0), (160.0, 90.0));
    assert_eq!(editor.session().viewport().offset, vec2(60.0, -10.0));
    assert!(!editor.session().is_panning());
    assert_eq!(editor.session().elements(), before.as_slice());
}
