#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod background;
pub mod command;
pub mod components;
pub mod config;
pub mod editor;
pub mod element;
pub mod error;
pub mod event;
pub mod export;
pub mod file_handler;
pub mod form;
pub mod geometry;
pub mod input;
pub mod panels;
pub mod renderer;
pub mod scene;
pub mod state;
pub mod text;
pub mod tools;
pub mod viewport;

pub use app::StudyApp;
pub use background::BackgroundImage;
pub use command::{Command, CommandError, CommandResult};
pub use config::EditorConfig;
pub use editor::Editor;
pub use element::{Element, ElementId, ElementKind};
pub use event::{EditorEvent, EventBus, EventHandler};
pub use export::{ExportJob, ExportedImage, RasterExporter};
pub use form::{FormStore, FormUpdate, SharedFormState};
pub use input::{InputEvent, InputHandler, InputLocation};
pub use renderer::Renderer;
pub use scene::Scene;
pub use state::{DrawingSession, Mode};
pub use tools::{Tool, ToolType};
pub use viewport::Viewport;
