mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::config::{load_settings, StoreSettings};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::TodoGuiApp;

#[derive(Parser, Debug)]
#[command(name = "todo_gui", about = "Task list window backed by a hosted row store")]
struct Args {
    #[arg(long)]
    store_url: Option<String>,
    #[arg(long)]
    api_key: Option<String>,
}

fn startup_settings(args: Args, mut settings: StoreSettings) -> StoreSettings {
    if let Some(v) = args.store_url {
        settings.store_url = Some(v);
    }
    if let Some(v) = args.api_key {
        settings.api_key = Some(v);
    }
    settings
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let settings = startup_settings(Args::parse(), load_settings());

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(settings, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("ToDo List")
            .with_inner_size([480.0, 640.0])
            .with_min_inner_size([320.0, 360.0]),
        ..Default::default()
    };
    eframe::run_native(
        "ToDo List",
        options,
        Box::new(|_cc| Ok(Box::new(TodoGuiApp::new(cmd_tx, ui_rx)))),
    )
}
