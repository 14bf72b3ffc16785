//! Backend commands queued from UI to backend worker.

use shared::domain::TodoId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    LoadAll,
    Add { text: String },
    Toggle { id: TodoId },
    Delete { id: TodoId },
}

/// Payload-free discriminant of a [`BackendCommand`], reported back with its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    LoadAll,
    Add,
    Toggle,
    Delete,
}

impl CommandKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CommandKind::LoadAll => "load_all",
            CommandKind::Add => "add",
            CommandKind::Toggle => "toggle",
            CommandKind::Delete => "delete",
        }
    }
}

impl BackendCommand {
    pub fn kind(&self) -> CommandKind {
        match self {
            BackendCommand::LoadAll => CommandKind::LoadAll,
            BackendCommand::Add { .. } => CommandKind::Add,
            BackendCommand::Toggle { .. } => CommandKind::Toggle,
            BackendCommand::Delete { .. } => CommandKind::Delete,
        }
    }
}
