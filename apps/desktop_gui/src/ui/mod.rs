//! UI layer: the task list window.

pub mod app;

pub use app::TodoGuiApp;
