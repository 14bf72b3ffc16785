//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{
    config::StoreSettings, ControllerEvent, MissingRowStore, RestRowStore, RowStore,
    TodoController,
};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use tokio::sync::broadcast::error::RecvError;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(settings: StoreSettings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let store = open_store(&settings, &ui_tx);
            let controller = TodoController::new(store);
            let forwarder = tokio::spawn(forward_controller_events(
                controller.subscribe_events(),
                ui_tx.clone(),
            ));
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            // Each command runs on its own task; commands are not serialized.
            while let Ok(cmd) = cmd_rx.recv() {
                let controller = Arc::clone(&controller);
                let ui_tx = ui_tx.clone();
                tokio::spawn(async move {
                    let command = cmd.kind();
                    let outcome = run_command(&controller, cmd).await;
                    if !deliver(&ui_tx, UiEvent::CommandFinished { command, outcome }) {
                        tracing::debug!(command = command.as_str(), "ui gone; dropping command result");
                    }
                });
            }

            tracing::info!("ui command queue closed; stopping backend worker");
            forwarder.abort();
        });
    });
}

fn open_store(settings: &StoreSettings, ui_tx: &Sender<UiEvent>) -> Arc<dyn RowStore> {
    match RestRowStore::from_settings(settings) {
        Ok(store) => {
            tracing::info!(table_url = %store.table_url(), "using row store");
            Arc::new(store)
        }
        Err(err) => {
            tracing::error!("row store unavailable: {err:#}");
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                UiErrorContext::BackendStartup,
                format!("{err:#}"),
            )));
            Arc::new(MissingRowStore)
        }
    }
}

/// Hands `event` to the window, waiting for room when the queue is full.
/// Returns false only once the window has gone away.
fn deliver(ui_tx: &Sender<UiEvent>, event: UiEvent) -> bool {
    let event = match ui_tx.try_send(event) {
        Ok(()) => return true,
        Err(TrySendError::Disconnected(_)) => return false,
        Err(TrySendError::Full(event)) => event,
    };
    tracing::debug!("ui event queue full; waiting for the window to drain it");
    tokio::task::block_in_place(|| ui_tx.send(event)).is_ok()
}

async fn run_command(controller: &TodoController, cmd: BackendCommand) -> client_core::Outcome {
    match cmd {
        BackendCommand::LoadAll => controller.load_all().await,
        BackendCommand::Add { text } => controller.add(&text).await,
        BackendCommand::Toggle { id } => controller.toggle(id).await,
        BackendCommand::Delete { id } => controller.delete(id).await,
    }
}

async fn forward_controller_events(
    mut events: tokio::sync::broadcast::Receiver<ControllerEvent>,
    ui_tx: Sender<UiEvent>,
) {
    loop {
        match events.recv().await {
            Ok(ControllerEvent::TodosChanged(todos)) => {
                if !deliver(&ui_tx, UiEvent::TodosChanged(todos)) {
                    break;
                }
            }
            // Already logged by the controller; the window does not show these.
            Ok(ControllerEvent::StoreFailed { operation, .. }) => {
                tracing::debug!(operation = operation.as_str(), "store failure not surfaced");
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "ui forwarder lagged behind controller events");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
