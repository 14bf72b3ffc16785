//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext};

/// Queues `cmd` for the backend worker. Returns false when the command
/// was dropped, with `status` describing why; a queued command clears it.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> bool {
    let kind = cmd.kind();

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = kind.as_str(), "queued ui->backend command");
            status.clear();
            true
        }
        Err(TrySendError::Full(_)) => {
            *status = UiError::from_message(
                UiErrorContext::General,
                "UI command queue is full; please retry",
            )
            .status_line();
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = UiError::from_message(
                UiErrorContext::General,
                "Backend command processor disconnected (possible startup/runtime failure); restart the app",
            )
            .status_line();
            false
        }
    }
}
