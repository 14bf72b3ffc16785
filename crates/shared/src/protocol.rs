use serde::{Deserialize, Serialize};

use crate::domain::TodoId;

/// A task row as the store returns it.
///
/// `id` is assigned by the store; a row only exists client-side once the
/// store has handed it back. Other columns the store returns (such as
/// `created_at`, which only drives server-side ordering) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl Todo {
    pub fn new(id: i64, text: impl Into<String>, completed: bool) -> Self {
        Self {
            id: TodoId(id),
            text: text.into(),
            completed,
        }
    }
}

/// Insert payload. Carries no id: the store assigns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTodo {
    pub text: String,
}

impl NewTodo {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Partial update sent by toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPatch {
    pub completed: bool,
}
