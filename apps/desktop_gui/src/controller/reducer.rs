//! UI-side form state and the transitions driven by backend events.

use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use client_core::Notification;
use shared::form::{FieldErrors, FormState};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

pub const TOAST_TTL: Duration = Duration::from_secs(5);
const MAX_TOASTS: usize = 4;

#[derive(Debug, Clone)]
pub struct Toast {
    pub notification: Notification,
    pub expires_at: Instant,
}

#[derive(Debug, Default)]
pub struct FormViewState {
    pub form: FormState,
    pub errors: FieldErrors,
    pub loading: bool,
    /// A submit was queued and the backend has not answered yet.
    pub submit_queued: bool,
    pub toasts: VecDeque<Toast>,
}

impl FormViewState {
    pub fn is_busy(&self) -> bool {
        self.loading || self.submit_queued
    }

    /// Returns the command to queue, or `None` while a submit is in flight.
    pub fn begin_submit(&mut self) -> Option<BackendCommand> {
        if self.is_busy() {
            return None;
        }
        self.submit_queued = true;
        Some(BackendCommand::Submit {
            form: self.form.clone(),
        })
    }

    pub fn apply(&mut self, event: UiEvent, now: Instant) {
        match event {
            UiEvent::LoadingChanged(loading) => self.loading = loading,
            // Every submit cycle starts by publishing the validation result.
            UiEvent::ErrorsChanged(errors) => {
                self.errors = errors;
                self.submit_queued = false;
            }
            UiEvent::Notify(notification) => self.push_toast(notification, now),
            UiEvent::BackendFailed(message) => {
                self.loading = false;
                self.submit_queued = false;
                self.push_toast(Notification::error(message), now);
            }
        }
    }

    pub fn push_toast(&mut self, notification: Notification, now: Instant) {
        while self.toasts.len() >= MAX_TOASTS {
            self.toasts.pop_front();
        }
        self.toasts.push_back(Toast {
            notification,
            expires_at: now + TOAST_TTL,
        });
    }

    pub fn expire_toasts(&mut self, now: Instant) {
        self.toasts.retain(|toast| toast.expires_at > now);
    }

    pub fn dismiss_toast(&mut self, index: usize) {
        self.toasts.remove(index);
    }
}
