//! Backend worker thread: owns the tokio runtime and the form controller.

use std::{sync::Arc, thread};

use client_core::{
    ClientSettings, DirectoryDownloadSink, FormController, FormEvent, HttpInvoiceApi,
};
use crossbeam_channel::{Receiver, Sender};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: ClientSettings) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::BackendFailed(format!(
                    "backend worker startup failure: failed to build runtime: {err}"
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let api = match HttpInvoiceApi::new(&settings) {
                Ok(api) => api,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::BackendFailed(format!(
                        "backend worker startup failure: {err:#}"
                    )));
                    tracing::error!("failed to build invoice client: {err:#}");
                    return;
                }
            };
            tracing::info!(
                endpoint = %api.endpoint(),
                download_dir = %settings.download_dir.display(),
                "backend worker ready"
            );

            let controller = Arc::new(FormController::new(
                api,
                DirectoryDownloadSink::new(&settings.download_dir),
            ));

            let events = controller.subscribe_events();
            let events_tx = ui_tx.clone();
            let weak = Arc::downgrade(&controller);
            thread::spawn(move || {
                forward_events(events, events_tx, move || {
                    weak.upgrade().is_some_and(|controller| controller.is_loading())
                })
            });

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Submit { form } => {
                        let controller = Arc::clone(&controller);
                        tokio::spawn(async move {
                            controller.set_form(form).await;
                            let outcome = controller.submit().await;
                            tracing::debug!(success = outcome.is_success(), "submit cycle finished");
                        });
                    }
                }
            }
            tracing::info!("ui command queue closed; backend worker stopping");
        });
    });
}

/// Relays controller events to the UI queue, waiting for room instead of dropping.
///
/// After a broadcast lag the current loading flag is re-sent so the form
/// never stays stuck in the busy state.
fn forward_events(
    mut events: broadcast::Receiver<FormEvent>,
    ui_tx: Sender<UiEvent>,
    is_loading: impl Fn() -> bool,
) {
    loop {
        let event = match events.blocking_recv() {
            Ok(event) => UiEvent::from(event),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "ui event forwarder lagged");
                UiEvent::LoadingChanged(is_loading())
            }
            Err(RecvError::Closed) => break,
        };
        if ui_tx.send(event).is_err() {
            tracing::info!("ui event queue closed; forwarder stopping");
            break;
        }
    }
}
