//! Events delivered from the backend worker to the UI thread.

use client_core::{FormEvent, Notification};
use shared::form::FieldErrors;

#[derive(Debug, Clone)]
pub enum UiEvent {
    LoadingChanged(bool),
    ErrorsChanged(FieldErrors),
    Notify(Notification),
    BackendFailed(String),
}

impl From<FormEvent> for UiEvent {
    fn from(event: FormEvent) -> Self {
        match event {
            FormEvent::LoadingChanged(loading) => UiEvent::LoadingChanged(loading),
            FormEvent::ErrorsChanged(errors) => UiEvent::ErrorsChanged(errors),
            FormEvent::Notification(notification) => UiEvent::Notify(notification),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_events_map_one_to_one() {
        assert!(matches!(
            UiEvent::from(FormEvent::LoadingChanged(true)),
            UiEvent::LoadingChanged(true)
        ));
        let note = Notification::success("ok");
        match UiEvent::from(FormEvent::Notification(note.clone())) {
            UiEvent::Notify(mapped) => assert_eq!(mapped, note),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
