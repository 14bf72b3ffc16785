//! View state of the task list window and the transitions applied to it.
//!
//! Rows are never edited here: the window only mirrors the snapshots the
//! backend controller publishes.

use client_core::Outcome;
use shared::{domain::TodoId, protocol::Todo};

use crate::backend_bridge::commands::{BackendCommand, CommandKind};
use crate::controller::events::{UiErrorContext, UiEvent};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TodoViewState {
    pub todos: Vec<Todo>,
    pub draft: String,
    pub in_flight: usize,
    /// Transient queue problems; cleared by the next queued command.
    pub status: String,
    /// Set once if the backend could not start; never cleared.
    pub startup_error: Option<String>,
}

impl TodoViewState {
    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    /// Command for the submit button. The draft is left alone until the
    /// backend confirms the insert.
    pub fn submit(&self) -> BackendCommand {
        BackendCommand::Add {
            text: self.draft.clone(),
        }
    }

    pub fn toggle(&self, id: TodoId) -> BackendCommand {
        BackendCommand::Toggle { id }
    }

    pub fn delete(&self, id: TodoId) -> BackendCommand {
        BackendCommand::Delete { id }
    }

    pub fn mark_dispatched(&mut self) {
        self.in_flight += 1;
    }

    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => {
                tracing::info!("{message}");
            }
            UiEvent::Error(err) => {
                tracing::error!(
                    category = ?err.category(),
                    context = ?err.context(),
                    "{}",
                    err.message()
                );
                match err.context() {
                    UiErrorContext::BackendStartup => self.startup_error = Some(err.status_line()),
                    UiErrorContext::General => self.status = err.status_line(),
                }
            }
            UiEvent::TodosChanged(todos) => {
                self.todos = todos;
            }
            UiEvent::CommandFinished { command, outcome } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                if command == CommandKind::Add && outcome == Outcome::Applied {
                    self.draft.clear();
                }
            }
        }
    }
}
