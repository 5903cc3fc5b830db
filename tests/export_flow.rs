use std::io::Cursor;

use morpho_study::command::Command;
use morpho_study::config::EditorConfig;
use morpho_study::element::ElementKind;
use morpho_study::error::ExportError;
use morpho_study::form::SharedFormState;
use morpho_study::state::Mode;
use morpho_study::Editor;
use egui::pos2;
use image::{ImageFormat, Rgba, RgbaImage};

fn small_editor() -> Editor {
    Editor::new(EditorConfig {
        export_size: 500,
        ..EditorConfig::default()
    })
}

fn png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba(color));
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
    bytes
}

fn draw_block(editor: &mut Editor) {
    editor.execute(Command::SetMode(Mode::Draw(ElementKind::Block))).unwrap();
    for p in [pos2(100.0, 100.0), pos2(900.0, 100.0), pos2(900.0, 900.0), pos2(100.0, 900.0)] {
        editor.execute(Command::AddPoint(p)).unwrap();
    }
    editor.execute(Command::CloseShape).unwrap();
}

#[test]
fn test_export_flattens_photo_and_shapes_into_form() {
    let mut editor = small_editor();
    editor.load_background_bytes(&png(64, 48, [0, 128, 0, 255])).unwrap();
    draw_block(&mut editor);

    let image = editor.export_now().unwrap();
    let decoded = image::load_from_memory(&image.png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (500, 500));
    // Photo stretched to the square, untouched away from the outline.
    assert_eq!(decoded.get_pixel(250, 250), &Rgba([0, 128, 0, 255]));
    // The block outline is red.
    let edge = decoded.get_pixel(250, 50);
    assert!(edge[0] > 200 && edge[1] < 60, "unexpected edge color {:?}", edge);

    let form = SharedFormState::new();
    editor.save_to_form(image.clone(), &mut form.clone());
    assert_eq!(form.update_count(), 1);
    assert_eq!(form.study_image(), Some(image.png));
}

#[test]
fn test_hidden_background_exports_on_plain_fill() {
    let mut editor = small_editor();
    editor.execute(Command::SetShowBackground(false)).unwrap();
    draw_block(&mut editor);

    let decoded = image::load_from_memory(&editor.export_now().unwrap().png)
        .unwrap()
        .to_rgba8();
    assert_eq!(decoded.get_pixel(250, 250), &Rgba([255, 255, 255, 255]));
}

#[test]
fn test_export_requires_a_photo_when_shown() {
    let mut editor = small_editor();
    draw_block(&mut editor);
    assert!(matches!(editor.export_now(), Err(ExportError::MissingBackground)));
}

#[test]
fn test_background_export_after_new_study_is_dropped() {
    let mut editor = small_editor();
    editor.load_background_bytes(&png(8, 8, [10, 10, 10, 255])).unwrap();
    let job = editor.begin_export().unwrap();
    editor.reset_session();

    let outcome = futures::executor::block_on(job.finish());
    assert!(editor.complete_export(outcome).is_none());
    assert!(editor.background().is_none());
}
