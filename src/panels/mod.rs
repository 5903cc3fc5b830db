mod central_panel;
mod prompt_window;
mod tools_panel;

pub use central_panel::central_panel;
pub use prompt_window::{PromptAnswer, prompt_window};
pub use tools_panel::{DropTarget, PanelAction, PanelState, tools_panel};
