use egui::{Align2, Color32, FontId, Rect, Response, Sense, Stroke, Ui, vec2};

/// A full-width toggle for one interaction mode, with an optional legend swatch.
pub struct ModeButton<'a> {
    pub label: &'a str,
    pub swatch: Option<Color32>,
    pub selected: bool,
}

impl<'a> ModeButton<'a> {
    pub fn new(label: &'a str, swatch: Option<Color32>, selected: bool) -> Self {
        Self { label, swatch, selected }
    }

    pub fn show(&self, ui: &mut Ui) -> Response {
        let button_size = vec2(ui.available_width(), 28.0);
        let (rect, response) = ui.allocate_exact_size(button_size, Sense::click());

        if ui.is_rect_visible(rect) {
            let bg_color = if self.selected {
                Color32::from_rgb(100, 181, 246) // light blue when selected
            } else if response.hovered() {
                Color32::from_gray(60)
            } else {
                Color32::from_gray(40)
            };
            ui.painter().rect_filled(rect, 4.0, bg_color);

            let mut text_left = rect.left() + 8.0;
            if let Some(color) = self.swatch {
                let swatch = Rect::from_min_size(rect.left_center() + vec2(8.0, -6.0), vec2(12.0, 12.0));
                ui.painter().rect_filled(swatch, 2.0, color);
                ui.painter().rect_stroke(swatch, 2.0, Stroke::new(1.0, Color32::BLACK));
                text_left = swatch.right() + 8.0;
            }

            let text_color = if self.selected { Color32::BLACK } else { Color32::WHITE };
            ui.painter().text(
                egui::pos2(text_left, rect.center().y),
                Align2::LEFT_CENTER,
                self.label,
                FontId::proportional(15.0),
                text_color,
            );

            if self.selected {
                ui.painter()
                    .rect_stroke(rect, 4.0, Stroke::new(2.0, Color32::from_rgb(33, 150, 243)));
            }
        }

        response
    }
}
