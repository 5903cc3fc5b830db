mod commands;
mod context;

use thiserror::Error;

use crate::element::ElementKind;
use crate::event::EditorEvent;

pub use commands::Command;
pub use context::CommandContext;

/// Result type for command operations. `Ok(None)` means the command changed nothing worth announcing.
pub type CommandResult = Result<Option<EditorEvent>, CommandError>;

/// Errors that can occur during command execution.
///
/// None of them leave the session modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("{kind:?} number {number} is already in use")]
    DuplicateNumber { kind: ElementKind, number: u32 },

    #[error("label text cannot be empty")]
    EmptyText,

    #[error("not a valid number: {0:?}")]
    InvalidNumber(String),
}
