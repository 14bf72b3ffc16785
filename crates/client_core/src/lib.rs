use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    domain::TodoId,
    protocol::{NewTodo, Todo, TodoPatch},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, warn};

pub mod config;
pub mod error;
pub mod rest_store;
pub mod task_list;

pub use error::StoreError;
pub use rest_store::RestRowStore;
pub use task_list::{DeleteSnapshot, TaskList};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Table-shaped persistence the controller talks to.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// All rows, newest `created_at` first.
    async fn select_all(&self) -> Result<Vec<Todo>, StoreError>;
    /// Inserts one row and returns what the store stored.
    async fn insert(&self, row: NewTodo) -> Result<Vec<Todo>, StoreError>;
    async fn update(&self, id: TodoId, patch: TodoPatch) -> Result<Vec<Todo>, StoreError>;
    async fn delete(&self, id: TodoId) -> Result<(), StoreError>;
}

pub struct MissingRowStore;

#[async_trait]
impl RowStore for MissingRowStore {
    async fn select_all(&self) -> Result<Vec<Todo>, StoreError> {
        Err(StoreError::Unavailable("no store url configured".into()))
    }

    async fn insert(&self, _row: NewTodo) -> Result<Vec<Todo>, StoreError> {
        Err(StoreError::Unavailable("no store url configured".into()))
    }

    async fn update(&self, id: TodoId, _patch: TodoPatch) -> Result<Vec<Todo>, StoreError> {
        Err(StoreError::Unavailable(format!(
            "no store url configured (update of todo {id})"
        )))
    }

    async fn delete(&self, id: TodoId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable(format!(
            "no store url configured (delete of todo {id})"
        )))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    LoadAll,
    Add,
    Toggle,
    Delete,
}

impl StoreOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreOperation::LoadAll => "load_all",
            StoreOperation::Add => "add",
            StoreOperation::Toggle => "toggle",
            StoreOperation::Delete => "delete",
        }
    }
}

/// Result of a controller operation as seen by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The store confirmed the request.
    Applied,
    /// Nothing was sent (empty text, unknown id).
    Skipped,
    /// The request failed and was logged.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    TodosChanged(Vec<Todo>),
    StoreFailed {
        operation: StoreOperation,
        message: String,
    },
}

/// Owns the task list and reconciles it with the row store.
///
/// The list lock is only held for synchronous patches, never across a
/// store call, so overlapping operations interleave freely and are not
/// serialized per id.
pub struct TodoController {
    store: Arc<dyn RowStore>,
    inner: Mutex<TaskList>,
    events: broadcast::Sender<ControllerEvent>,
}

impl TodoController {
    pub fn new(store: Arc<dyn RowStore>) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            store,
            inner: Mutex::new(TaskList::new()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub async fn todos(&self) -> Vec<Todo> {
        self.inner.lock().await.todos().to_vec()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }

    pub async fn load_all(&self) -> Outcome {
        match self.store.select_all().await {
            Ok(rows) => {
                info!(count = rows.len(), "loaded todos");
                let mut list = self.inner.lock().await;
                list.replace_all(rows);
                self.publish(&list);
                Outcome::Applied
            }
            Err(err) => {
                self.report_failure(StoreOperation::LoadAll, &err);
                Outcome::Failed
            }
        }
    }

    /// Inserts `text` and prepends the stored row once confirmed.
    ///
    /// The list is untouched until the store answers. On `Applied` the
    /// caller clears its input; on `Failed` the input keeps its value.
    pub async fn add(&self, text: &str) -> Outcome {
        if text.is_empty() {
            debug!("ignoring add with empty text");
            return Outcome::Skipped;
        }

        match self.store.insert(NewTodo::new(text)).await {
            Ok(rows) => {
                match rows.into_iter().next() {
                    Some(row) => {
                        info!(id = %row.id, "todo added");
                        let mut list = self.inner.lock().await;
                        list.prepend(row);
                        self.publish(&list);
                    }
                    None => warn!("insert confirmed without returning a row"),
                }
                Outcome::Applied
            }
            Err(err) => {
                self.report_failure(StoreOperation::Add, &err);
                Outcome::Failed
            }
        }
    }

    pub async fn toggle(&self, id: TodoId) -> Outcome {
        let current = {
            let list = self.inner.lock().await;
            match list.get(id) {
                Some(todo) => todo.completed,
                None => {
                    debug!(%id, "ignoring toggle of unknown todo");
                    return Outcome::Skipped;
                }
            }
        };

        // Sends the value currently held, not its negation. The checkbox
        // only flips when the store returns a row with a different value.
        let patch = TodoPatch { completed: current };
        match self.store.update(id, patch).await {
            Ok(rows) => {
                if let Some(row) = rows.into_iter().next() {
                    let mut list = self.inner.lock().await;
                    let returned_id = row.id;
                    if list.merge(row) {
                        self.publish(&list);
                    } else {
                        debug!(id = %returned_id, "updated todo no longer listed");
                    }
                }
                Outcome::Applied
            }
            Err(err) => {
                self.report_failure(StoreOperation::Toggle, &err);
                Outcome::Failed
            }
        }
    }

    /// Removes `id` immediately and rolls the whole list back if the
    /// store refuses or the request fails.
    pub async fn delete(&self, id: TodoId) -> Outcome {
        let snapshot = {
            let mut list = self.inner.lock().await;
            let Some(snapshot) = list.remove_optimistic(id) else {
                debug!(%id, "ignoring delete of unknown todo");
                return Outcome::Skipped;
            };
            self.publish(&list);
            snapshot
        };

        match self.store.delete(id).await {
            Ok(()) => {
                info!(%id, "todo deleted");
                Outcome::Applied
            }
            Err(err) => {
                self.report_failure(StoreOperation::Delete, &err);
                let mut list = self.inner.lock().await;
                list.rollback(snapshot);
                self.publish(&list);
                Outcome::Failed
            }
        }
    }

    fn publish(&self, list: &TaskList) {
        let _ = self
            .events
            .send(ControllerEvent::TodosChanged(list.todos().to_vec()));
    }

    fn report_failure(&self, operation: StoreOperation, err: &StoreError) {
        error!(
            operation = operation.as_str(),
            store_reported = err.is_store_reported(),
            "row store request failed: {err}"
        );
        let _ = self.events.send(ControllerEvent::StoreFailed {
            operation,
            message: err.to_string(),
        });
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
