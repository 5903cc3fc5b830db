use egui::{PointerButton, Pos2, Rect};
use image::RgbaImage;

use crate::background::{BackgroundImage, decode_rgba};
use crate::command::{Command, CommandContext, CommandError, CommandResult};
use crate::config::EditorConfig;
use crate::error::{ExportError, ImageLoadError};
use crate::event::{EditorEvent, EventBus, EventHandler, LogHandler};
use crate::export::{BackgroundSnapshot, ExportJob, ExportOutcome, ExportRequest, ExportedImage, RasterExporter};
use crate::form::{FormStore, FormUpdate};
use crate::geometry::hit_testing::HANDLE_RADIUS_PX;
use crate::geometry::snap::find_snap;
use crate::input::{InputEvent, InputLocation, KeyAction};
use crate::scene::{Scene, SceneOptions};
use crate::state::{DrawingSession, PromptRequest};
use crate::tools::{PointerContext, Tool, ToolType};
use crate::viewport::to_drawing_space;

/// The drawing core: one session, its background, and everything that mutates them.
///
/// Runs headless; the egui app only feeds it [`InputEvent`]s and paints what it holds.
#[derive(Debug)]
pub struct Editor {
    session: DrawingSession,
    config: EditorConfig,
    background: Option<BackgroundImage>,
    bus: EventBus,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        let session = DrawingSession {
            show_background: config.show_background,
            ..DrawingSession::default()
        };
        Self::with_session(session, config)
    }

    pub fn with_session(session: DrawingSession, config: EditorConfig) -> Self {
        let bus = EventBus::new();
        bus.subscribe(Box::new(LogHandler));
        Self {
            session,
            config,
            background: None,
            bus,
        }
    }

    pub fn session(&self) -> &DrawingSession {
        &self.session
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EditorConfig) {
        self.config = config;
    }

    pub fn background(&self) -> Option<&BackgroundImage> {
        self.background.as_ref()
    }

    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.bus.subscribe(handler);
    }

    /// Run one command and broadcast what it did.
    pub fn execute(&mut self, command: Command) -> CommandResult {
        let result = command.execute(&mut CommandContext::new(&mut self.session, &self.config));
        match &result {
            Ok(Some(event)) => self.bus.emit(event),
            Ok(None) => {}
            Err(err) => log::warn!("{:?} rejected: {}", command, err),
        }
        result
    }

    fn run(&mut self, command: Option<Command>) {
        if let Some(command) = command {
            // Rejections are already logged and leave the session untouched.
            let _ = self.execute(command);
        }
    }

    fn pointer(&self, location: InputLocation, button: PointerButton, container: Rect) -> PointerContext {
        let viewport = self.session.viewport();
        let drawing = to_drawing_space(location.position, container, viewport);
        let scale = viewport.scale.max(f32::EPSILON);
        PointerContext {
            screen: location.position,
            local: location.position - container.min,
            drawing,
            snap: find_snap(
                drawing,
                self.session.elements(),
                self.session.current_points(),
                viewport.scale,
                self.config.snap_radii(),
            ),
            button,
            tolerance: self.config.hit_tolerance_px / scale,
            handle_radius: HANDLE_RADIUS_PX / scale,
        }
    }

    /// Feed one input event. `container` is the canvas rectangle on screen.
    ///
    /// Everything is ignored while a prompt is waiting for an answer.
    pub fn handle_event(&mut self, event: &InputEvent, container: Rect) {
        if self.session.prompt.is_some() {
            return;
        }
        let mut tool = ToolType::for_mode(self.session.mode());

        match *event {
            InputEvent::Key(action) => self.run(Some(match action {
                KeyAction::CloseShape => Command::CloseShape,
                KeyAction::Escape => Command::Escape,
                KeyAction::Undo => Command::Undo,
            })),

            InputEvent::Wheel { location, delta } => self.run(Some(Command::Zoom {
                cursor: location.position - container.min,
                delta,
            })),

            InputEvent::PointerLeave => self.session.cursor = None,

            InputEvent::PointerMove { location } => {
                let ptr = self.pointer(location, PointerButton::Primary, container);
                self.session.cursor = self.session.mode().shows_cursor().then_some(ptr.snap);
                if self.session.is_panning() {
                    self.run(Some(Command::PanTo { cursor: ptr.local }));
                } else {
                    let command = tool.on_pointer_move(&ptr, &self.session);
                    self.run(command);
                }
            }

            InputEvent::PointerDown { location, button } => {
                let ptr = self.pointer(location, button, container);
                if button == PointerButton::Middle {
                    self.run(Some(Command::BeginPan { cursor: ptr.local }));
                } else {
                    let command = tool.on_pointer_down(&ptr, &self.session);
                    self.run(command);
                }
            }

            InputEvent::PointerUp { location, button } => {
                let ptr = self.pointer(location, button, container);
                if button == PointerButton::Middle {
                    self.run(Some(Command::EndPan));
                } else {
                    let command = tool.on_pointer_up(&ptr, &self.session);
                    self.run(command);
                }
            }

            InputEvent::DoubleClick { location, button } => {
                if button == PointerButton::Primary {
                    let ptr = self.pointer(location, button, container);
                    let command = tool.on_double_click(&ptr, &self.session);
                    self.run(command);
                }
            }
        }
    }

    /// Answer the open prompt. `None` cancels and leaves everything unchanged.
    ///
    /// A rejected answer keeps the prompt open so it can be corrected.
    pub fn resolve_prompt(&mut self, answer: Option<String>) -> CommandResult {
        let Some(request) = self.session.prompt.take() else {
            return Ok(None);
        };
        let Some(answer) = answer else {
            log::debug!("Prompt cancelled: {:?}", request);
            return Ok(None);
        };

        let command = match &request {
            PromptRequest::NewLabel { at } => Ok(Command::PlaceLabel {
                at: *at,
                text: answer,
            }),
            PromptRequest::EditNumber { element_id, .. } => answer
                .trim()
                .parse::<u32>()
                .map(|number| Command::SetNumber {
                    element_id: *element_id,
                    number,
                })
                .map_err(|_| CommandError::InvalidNumber(answer.clone())),
            PromptRequest::EditText { element_id, .. } => Ok(Command::SetText {
                element_id: *element_id,
                text: answer,
            }),
        };

        let result = command.and_then(|command| self.execute(command));
        if let Err(err) = &result {
            log::warn!("Prompt answer rejected: {}", err);
            self.session.prompt = Some(request);
        }
        result
    }

    fn bump_generation(&mut self) {
        self.session.generation += 1;
        self.bus.emit(&EditorEvent::BackgroundChanged {
            generation: self.session.generation,
        });
    }

    pub fn set_background(&mut self, background: Option<BackgroundImage>) {
        self.background = background;
        self.bump_generation();
    }

    /// Decode and install a new photo. On failure the current background stays.
    pub fn load_background_bytes(&mut self, bytes: &[u8]) -> Result<(), ImageLoadError> {
        let background = BackgroundImage::from_bytes(bytes)?;
        let [w, h] = background.size();
        log::info!("Loaded background {}x{}", w, h);
        self.set_background(Some(background));
        Ok(())
    }

    /// Lay a reference raster over the photo. Without a photo there is nothing to lay it on.
    pub fn set_reference(&mut self, image: RgbaImage) -> bool {
        let Some(background) = &mut self.background else {
            log::warn!("Ignoring reference overlay: no background loaded");
            return false;
        };
        background.set_reference(image);
        self.bump_generation();
        true
    }

    pub fn load_reference_bytes(&mut self, bytes: &[u8]) -> Result<bool, ImageLoadError> {
        let image = decode_rgba(bytes)?;
        Ok(self.set_reference(image))
    }

    pub fn clear_reference(&mut self) {
        if let Some(background) = &mut self.background {
            if background.reference().is_some() {
                background.clear_reference();
                self.bump_generation();
            }
        }
    }

    pub fn set_reference_opacity(&mut self, opacity: f32) {
        if let Some(background) = &mut self.background {
            background.set_reference_opacity(opacity);
        }
    }

    /// The "New" action: forget the background and every element.
    pub fn reset_session(&mut self) {
        self.background = None;
        self.run(Some(Command::ClearSession));
    }

    pub fn scene(&self) -> Scene {
        Scene::build(&self.session, SceneOptions::interactive(self.config.hatch_spacing))
    }

    /// Snapshot what an export of the current session needs.
    pub fn export_request(&self) -> Result<ExportRequest, ExportError> {
        let background = if self.session.show_background() {
            let background = self.background.as_ref().ok_or(ExportError::MissingBackground)?;
            Some(BackgroundSnapshot {
                photo: background.photo().clone(),
                reference: background.reference().map(|r| (r.image().clone(), r.opacity())),
            })
        } else {
            None
        };
        Ok(ExportRequest {
            generation: self.session.generation(),
            scene: Scene::build(&self.session, SceneOptions::export(self.config.hatch_spacing)),
            size: self.config.export_size,
            background,
            fill: self.config.export_background,
        })
    }

    /// Start an export in the background; hand its outcome to [`Editor::complete_export`].
    pub fn begin_export(&self) -> Result<ExportJob, ExportError> {
        let request = self.export_request()?;
        log::info!("Exporting generation {} at {}px", request.generation, request.size);
        Ok(ExportJob::spawn(request))
    }

    /// Render on the calling thread.
    pub fn export_now(&self) -> Result<ExportedImage, ExportError> {
        let request = self.export_request()?;
        let outcome = ExportOutcome {
            generation: request.generation,
            result: RasterExporter::render(&request),
        };
        self.complete_export(outcome).unwrap_or(Err(ExportError::WorkerGone))
    }

    /// Accept a finished export, unless the session moved on since it started.
    ///
    /// Stale outcomes return `None` and must not be applied.
    pub fn complete_export(&self, outcome: ExportOutcome) -> Option<Result<ExportedImage, ExportError>> {
        let current = self.session.generation();
        if outcome.generation != current {
            self.bus.emit(&EditorEvent::ExportDiscarded {
                generation: outcome.generation,
                current,
            });
            return None;
        }
        match &outcome.result {
            Ok(image) => self.bus.emit(&EditorEvent::ExportFinished {
                generation: outcome.generation,
                bytes: image.png.len(),
            }),
            Err(err) => self.bus.emit(&EditorEvent::ExportFailed {
                generation: outcome.generation,
                message: err.to_string(),
            }),
        }
        Some(outcome.result)
    }

    /// Hand the exported picture to the form, the one call the editor makes into host state.
    pub fn save_to_form(&self, image: ExportedImage, store: &mut dyn FormStore) {
        let update = FormUpdate::study_image(image.png);
        let field = update.field;
        store.update_form(update);
        self.bus.emit(&EditorEvent::FormUpdated { field });
    }

    /// Drawing-space position under a screen point.
    pub fn drawing_position(&self, screen: Pos2, container: Rect) -> Pos2 {
        to_drawing_space(screen, container, self.session.viewport())
    }
}
