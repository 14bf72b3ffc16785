//! UI/backend events and error modeling for the task list window.

use client_core::Outcome;
use shared::protocol::Todo;

use crate::backend_bridge::commands::CommandKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Info(String),
    Error(UiError),
    TodosChanged(Vec<Todo>),
    /// A queued command has been answered by the controller.
    CommandFinished {
        command: CommandKind,
        outcome: Outcome,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Configuration,
    Transport,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    General,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("no store url")
            || message_lower.contains("invalid store url")
            || message_lower.contains("unsupported store url")
            || message_lower.contains("store url is empty")
        {
            UiErrorCategory::Configuration
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("transport")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_line(&self) -> String {
        let label = match self.category {
            UiErrorCategory::Configuration => "Configuration",
            UiErrorCategory::Transport => "Connection",
            UiErrorCategory::Unknown => "Error",
        };
        format!("{label}: {}", self.message)
    }
}
