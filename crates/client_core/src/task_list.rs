//! In-memory task list and the patches applied to it from store responses.

use shared::{domain::TodoId, protocol::Todo};

/// Ordered task rows, newest first.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskList {
    todos: Vec<Todo>,
}

/// Pre-removal copy of the whole list kept while a delete is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteSnapshot {
    previous: Vec<Todo>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    /// Seeds the list from a full listing; the store's order is kept as-is.
    pub fn replace_all(&mut self, rows: Vec<Todo>) {
        self.todos = rows;
    }

    /// Newly confirmed rows are assumed newest and go first.
    pub fn prepend(&mut self, row: Todo) {
        self.todos.insert(0, row);
    }

    /// Replaces the row whose id matches `row.id` with the store's copy.
    ///
    /// Rows that are no longer present locally are not re-added. Returns
    /// whether anything was replaced.
    pub fn merge(&mut self, row: Todo) -> bool {
        match self.todos.iter_mut().find(|todo| todo.id == row.id) {
            Some(slot) => {
                *slot = row;
                true
            }
            None => false,
        }
    }

    /// Removes `id` ahead of the store confirming it.
    ///
    /// Returns `None` (and leaves the list untouched) when `id` is absent.
    pub fn remove_optimistic(&mut self, id: TodoId) -> Option<DeleteSnapshot> {
        self.get(id)?;
        let previous = self.todos.clone();
        self.todos.retain(|todo| todo.id != id);
        Some(DeleteSnapshot { previous })
    }

    /// Restores the full list captured by `remove_optimistic`.
    ///
    /// Anything that happened to the list between the removal and the
    /// rollback is overwritten.
    pub fn rollback(&mut self, snapshot: DeleteSnapshot) {
        self.todos = snapshot.previous;
    }
}

#[cfg(test)]
#[path = "tests/task_list_tests.rs"]
mod tests;
