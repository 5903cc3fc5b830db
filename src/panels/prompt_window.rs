use crate::state::PromptRequest;

/// What the user did with an open prompt this frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAnswer {
    Submit(String),
    Cancel,
}

/// A non-blocking value prompt. `buffer` holds the text across frames.
pub fn prompt_window(
    ctx: &egui::Context,
    request: &PromptRequest,
    buffer: &mut String,
    error: Option<&str>,
) -> Option<PromptAnswer> {
    let mut answer = None;
    egui::Window::new(request.title())
        .id(egui::Id::new("value_prompt"))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            let edit = ui.text_edit_singleline(buffer);
            if !edit.has_focus() {
                edit.request_focus();
            }
            if ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                answer = Some(PromptAnswer::Submit(buffer.clone()));
            }
            if let Some(error) = error {
                ui.colored_label(egui::Color32::from_rgb(220, 38, 38), error);
            }
            ui.horizontal(|ui| {
                if ui.button("Aceptar").clicked() {
                    answer = Some(PromptAnswer::Submit(buffer.clone()));
                }
                if ui.button("Cancelar").clicked() || ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    answer = Some(PromptAnswer::Cancel);
                }
            });
        });
    answer
}
