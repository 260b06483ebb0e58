//! Command orchestration helpers from UI actions to backend command queue.

use std::time::Instant;

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{events::UiEvent, reducer::FormViewState};

pub const QUEUE_FULL_MESSAGE: &str = "Очередь запросов переполнена, повторите попытку";
pub const BACKEND_DISCONNECTED_MESSAGE: &str =
    "Фоновый обработчик остановлен, перезапустите приложение";

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    view: &mut FormViewState,
    now: Instant,
) {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            tracing::warn!(command = cmd_name, "ui->backend command queue is full");
            view.apply(UiEvent::BackendFailed(QUEUE_FULL_MESSAGE.to_string()), now);
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::error!(command = cmd_name, "ui->backend command queue disconnected");
            view.apply(
                UiEvent::BackendFailed(BACKEND_DISCONNECTED_MESSAGE.to_string()),
                now,
            );
        }
    }
}
