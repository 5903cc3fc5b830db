use egui::Rect;

use crate::background::BackgroundTextures;
use crate::editor::Editor;
use crate::input::InputHandler;
use crate::renderer::Renderer;

/// The drawing canvas: routes input into the editor, then paints background and scene.
pub fn central_panel(
    ctx: &egui::Context,
    editor: &mut Editor,
    input: &mut InputHandler,
    textures: Option<&BackgroundTextures>,
) -> Rect {
    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(egui::Color32::from_gray(60)))
        .show(ctx, |ui| {
            let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let canvas_rect = response.rect;

            for event in input.process_input(ctx, canvas_rect) {
                editor.handle_event(&event, canvas_rect);
            }

            if editor.session().mode().shows_cursor() && response.hovered() {
                ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
            }

            let painter = painter.with_clip_rect(canvas_rect);
            let renderer = Renderer::new(canvas_rect, editor.session().viewport());
            match (editor.background(), textures) {
                (Some(background), Some(textures)) if editor.session().show_background() => {
                    renderer.paint_background(&painter, background, textures);
                }
                _ => renderer.paint_blank(&painter),
            }
            renderer.paint_scene(&painter, &editor.scene());
            canvas_rect
        })
        .inner
}
