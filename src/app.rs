use crate::background::BackgroundTextures;
use crate::config::EditorConfig;
use crate::editor::Editor;
use crate::export::ExportJob;
use crate::file_handler::FileHandler;
use crate::form::SharedFormState;
use crate::input::InputHandler;
use crate::panels::{self, DropTarget, PanelAction, PanelState, PromptAnswer};
use crate::state::PromptRequest;

/// Storage key of the persisted [`EditorConfig`].
const CONFIG_KEY: &str = "morpho_study_config";

struct PendingExport {
    job: ExportJob,
    save: bool,
}

/// The desktop/web shell around an [`Editor`].
pub struct StudyApp {
    editor: Editor,
    input: InputHandler,
    files: FileHandler,
    textures: Option<BackgroundTextures>,
    export: Option<PendingExport>,
    form: SharedFormState,
    panel: PanelState,
    /// The prompt `prompt_buffer` was filled for
    prompt_shown: Option<PromptRequest>,
    prompt_buffer: String,
    prompt_error: Option<String>,
}

impl Default for StudyApp {
    fn default() -> Self {
        Self::with_config(EditorConfig::default())
    }
}

impl StudyApp {
    /// Called once before the first frame.
    ///
    /// An explicit config wins over the one saved from the previous run.
    pub fn new(cc: &eframe::CreationContext<'_>, config: Option<EditorConfig>) -> Self {
        let config = config
            .or_else(|| cc.storage.and_then(|storage| eframe::get_value(storage, CONFIG_KEY)))
            .unwrap_or_default();
        Self::with_config(config)
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            editor: Editor::new(config),
            input: InputHandler::new(),
            files: FileHandler::new(),
            textures: None,
            export: None,
            form: SharedFormState::new(),
            panel: PanelState::default(),
            prompt_shown: None,
            prompt_buffer: String::new(),
            prompt_error: None,
        }
    }

    /// Where saved studies end up. Clones share the same fields.
    pub fn form(&self) -> SharedFormState {
        self.form.clone()
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        for dropped in self.files.take_dropped_images(ctx) {
            let result = match self.panel.drop_target {
                DropTarget::Photo => self.editor.load_background_bytes(&dropped.bytes).map(|_| true),
                DropTarget::Reference => self.editor.load_reference_bytes(&dropped.bytes),
            };
            match result {
                Ok(true) => self.panel.status = None,
                Ok(false) => self.panel.status = Some("Cargue primero una foto de fondo.".to_owned()),
                Err(err) => {
                    log::warn!("Ignoring {}: {}", dropped.name, err);
                    self.panel.status = Some(format!("No se pudo leer {}", dropped.name));
                }
            }
        }
    }

    /// Rebuild GPU textures when the background changed since the last upload.
    fn sync_textures(&mut self, ctx: &egui::Context) {
        let generation = self.editor.session().generation();
        match self.editor.background() {
            Some(background) => {
                if self.textures.as_ref().is_none_or(|t| t.generation() != generation) {
                    self.textures = Some(BackgroundTextures::upload(ctx, background, generation));
                }
            }
            None => self.textures = None,
        }
    }

    fn start_export(&mut self, save: bool) {
        match self.editor.begin_export() {
            Ok(job) => {
                self.export = Some(PendingExport { job, save });
                self.panel.status = Some("Exportando…".to_owned());
            }
            Err(err) => self.panel.status = Some(format!("No se pudo exportar: {}", err)),
        }
    }

    fn poll_export(&mut self, ctx: &egui::Context) {
        let Some(pending) = &mut self.export else {
            return;
        };
        let Some(outcome) = pending.job.poll() else {
            ctx.request_repaint();
            return;
        };
        let save = pending.save;
        self.export = None;

        match self.editor.complete_export(outcome) {
            Some(Ok(image)) if save => {
                self.editor.save_to_form(image, &mut self.form);
                self.panel.status = Some("Estudio guardado en el formulario.".to_owned());
            }
            Some(Ok(_)) => self.panel.status = None,
            Some(Err(err)) => self.panel.status = Some(format!("Error al exportar: {}", err)),
            // The session moved on; the result belongs to nothing.
            None => self.panel.status = None,
        }
    }

    fn apply(&mut self, action: PanelAction) {
        match action {
            PanelAction::Execute(command) => match self.editor.execute(command) {
                Ok(_) => self.panel.status = None,
                Err(err) => self.panel.status = Some(format!("No se pudo aplicar: {}", err)),
            },
            PanelAction::SetReferenceOpacity(opacity) => self.editor.set_reference_opacity(opacity),
            PanelAction::ClearReference => self.editor.clear_reference(),
            PanelAction::NewStudy => {
                self.editor.reset_session();
                self.panel.status = None;
            }
            PanelAction::Save => self.start_export(true),
        }
    }

    fn show_prompt(&mut self, ctx: &egui::Context) {
        let Some(request) = self.editor.session().prompt().cloned() else {
            self.prompt_shown = None;
            self.prompt_error = None;
            return;
        };
        if self.prompt_shown.as_ref() != Some(&request) {
            self.prompt_buffer = request.initial_value();
            self.prompt_error = None;
            self.prompt_shown = Some(request.clone());
        }
        let answer = panels::prompt_window(ctx, &request, &mut self.prompt_buffer, self.prompt_error.as_deref());
        let result = match answer {
            Some(PromptAnswer::Submit(text)) => self.editor.resolve_prompt(Some(text)),
            Some(PromptAnswer::Cancel) => self.editor.resolve_prompt(None),
            None => return,
        };
        match result {
            Ok(_) => {
                self.prompt_shown = None;
                self.prompt_error = None;
            }
            Err(err) => self.prompt_error = Some(err.to_string()),
        }
    }
}

impl eframe::App for StudyApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, CONFIG_KEY, self.editor.config());
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.poll_export(ctx);
        self.sync_textures(ctx);

        self.panel.export_running = self.export.is_some();
        for action in panels::tools_panel(ctx, &self.editor, &mut self.panel) {
            self.apply(action);
        }
        // A reset or a new reference may have landed through the panel.
        self.sync_textures(ctx);

        panels::central_panel(ctx, &mut self.editor, &mut self.input, self.textures.as_ref());
        self.show_prompt(ctx);
        self.files.preview_files_being_dropped(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::element::ElementKind;
    use crate::state::Mode;
    use egui::pos2;

    #[test]
    fn test_rejected_panel_command_is_reported() {
        let mut app = StudyApp::default();
        app.apply(PanelAction::Execute(Command::PlaceLabel {
            at: pos2(10.0, 10.0),
            text: "  ".into(),
        }));
        let status = app.panel.status.clone().unwrap_or_default();
        assert!(status.contains("label text cannot be empty"), "{}", status);
        assert!(app.editor().session().elements().is_empty());

        app.apply(PanelAction::Execute(Command::SetMode(Mode::Draw(ElementKind::Lot))));
        assert_eq!(app.panel.status, None);
    }
}
