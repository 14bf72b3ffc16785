use std::{fmt::Write as _, sync::Arc};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use client_core::{
    config::{load_settings, StoreSettings},
    Outcome, RestRowStore, TodoController,
};
use shared::{
    domain::{TodoId, EMPTY_STATE_MESSAGE},
    protocol::Todo,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "todo", about = "Task list kept in a hosted row store")]
struct Args {
    /// Base URL of the row store; overrides todo.toml and environment.
    #[arg(long)]
    store_url: Option<String>,
    #[arg(long)]
    api_key: Option<String>,
    #[arg(long)]
    table: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Print all tasks, newest first.
    List,
    Add {
        text: String,
    },
    Toggle {
        id: i64,
    },
    Delete {
        id: i64,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::List => "list",
            Command::Add { .. } => "add",
            Command::Toggle { .. } => "toggle",
            Command::Delete { .. } => "delete",
        }
    }
}

fn apply_overrides(settings: &mut StoreSettings, args: &Args) {
    if let Some(v) = &args.store_url {
        settings.store_url = Some(v.clone());
    }
    if let Some(v) = &args.api_key {
        settings.api_key = Some(v.clone());
    }
    if let Some(v) = &args.table {
        settings.table = v.clone();
    }
}

fn render_todos(todos: &[Todo]) -> String {
    if todos.is_empty() {
        return format!("{EMPTY_STATE_MESSAGE}\n");
    }

    let mut out = String::new();
    for todo in todos {
        let mark = if todo.completed { 'x' } else { ' ' };
        let _ = writeln!(out, "[{mark}] {:>5}  {}", todo.id, todo.text);
    }
    out
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    apply_overrides(&mut settings, &args);
    let store = RestRowStore::from_settings(&settings)?;
    tracing::info!(table_url = %store.table_url(), "using row store");

    let controller = TodoController::new(Arc::new(store));
    if controller.load_all().await == Outcome::Failed {
        bail!("could not load tasks from the row store");
    }

    let outcome = match &args.command {
        Command::List => Outcome::Applied,
        Command::Add { text } => controller.add(text).await,
        Command::Toggle { id } => controller.toggle(TodoId(*id)).await,
        Command::Delete { id } => controller.delete(TodoId(*id)).await,
    };

    print!("{}", render_todos(&controller.todos().await));

    match outcome {
        Outcome::Applied => Ok(()),
        Outcome::Skipped => {
            eprintln!("{}: nothing to do", args.command.name());
            Ok(())
        }
        Outcome::Failed => bail!("{} failed; the row store refused or was unreachable", args.command.name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_empty_state_message() {
        assert_eq!(render_todos(&[]), "No tasks yet\n");
    }

    #[test]
    fn renders_checkbox_column() {
        let rendered = render_todos(&[
            Todo::new(5, "buy milk", true),
            Todo::new(1, "x", false),
        ]);
        assert_eq!(rendered, "[x]     5  buy milk\n[ ]     1  x\n");
    }

    #[test]
    fn cli_flags_override_loaded_settings() {
        let args = Args::parse_from([
            "todo",
            "--store-url",
            "https://flag.example",
            "--table",
            "tasks",
            "add",
            "buy milk",
        ]);
        assert_eq!(
            args.command,
            Command::Add {
                text: "buy milk".into()
            }
        );

        let mut settings = StoreSettings {
            store_url: Some("https://file.example".into()),
            api_key: Some("file-key".into()),
            ..StoreSettings::default()
        };
        apply_overrides(&mut settings, &args);
        assert_eq!(settings.store_url.as_deref(), Some("https://flag.example"));
        assert_eq!(settings.api_key.as_deref(), Some("file-key"));
        assert_eq!(settings.table, "tasks");
    }

    #[test]
    fn parses_id_subcommands() {
        let args = Args::parse_from(["todo", "delete", "42"]);
        assert_eq!(args.command, Command::Delete { id: 42 });
        assert_eq!(args.command.name(), "delete");
    }
}
