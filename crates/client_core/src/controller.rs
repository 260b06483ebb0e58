//! Form state container: values, validation errors, the loading flag and the
//! submit cycle that turns a valid form into a downloaded document.

use std::{
    path::PathBuf,
    sync::atomic::{AtomicBool, Ordering},
};

use shared::{
    error::SubmitError,
    form::{validate, FieldErrors, FormState},
    protocol::InvoiceRequest,
};
use tokio::sync::{broadcast, Mutex};
use tracing::{error, info, warn};

use crate::{download::DownloadSink, InvoiceApi};

pub const FIX_FORM_ERRORS_MESSAGE: &str = "Пожалуйста, исправьте ошибки в форме";
pub const DOWNLOAD_SUCCESS_MESSAGE: &str = "Документ успешно загружен";
pub const DOWNLOAD_FAILURE_PREFIX: &str = "Произошла ошибка при загрузке документа";
pub const BUSY_MESSAGE: &str = "Документ уже запрошен, дождитесь завершения";

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }

    pub fn for_failure(err: &SubmitError) -> Self {
        match err {
            SubmitError::Validation(_) => Self::error(FIX_FORM_ERRORS_MESSAGE),
            SubmitError::Busy => Self::error(BUSY_MESSAGE),
            other => Self::error(format!("{DOWNLOAD_FAILURE_PREFIX}: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub enum FormEvent {
    LoadingChanged(bool),
    ErrorsChanged(FieldErrors),
    Notification(Notification),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    pub filename: String,
    pub path: PathBuf,
    pub size_bytes: usize,
}

#[derive(Debug, Clone)]
pub enum SubmissionOutcome {
    Success(DownloadedFile),
    Failure(SubmitError),
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Success(_))
    }

    pub fn notification(&self) -> Notification {
        match self {
            SubmissionOutcome::Success(_) => Notification::success(DOWNLOAD_SUCCESS_MESSAGE),
            SubmissionOutcome::Failure(err) => Notification::for_failure(err),
        }
    }
}

#[derive(Debug, Default)]
struct FormInner {
    form: FormState,
    errors: FieldErrors,
}

/// Holds `loading == true` for one submit cycle and clears it on drop.
struct LoadingGuard<'a> {
    loading: &'a AtomicBool,
    events: &'a broadcast::Sender<FormEvent>,
}

impl<'a> LoadingGuard<'a> {
    fn acquire(
        loading: &'a AtomicBool,
        events: &'a broadcast::Sender<FormEvent>,
    ) -> Option<Self> {
        loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        let _ = events.send(FormEvent::LoadingChanged(true));
        Some(Self { loading, events })
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.loading.store(false, Ordering::Release);
        let _ = self.events.send(FormEvent::LoadingChanged(false));
    }
}

pub struct FormController<A, S> {
    api: A,
    sink: S,
    inner: Mutex<FormInner>,
    loading: AtomicBool,
    events: broadcast::Sender<FormEvent>,
}

impl<A: InvoiceApi, S: DownloadSink> FormController<A, S> {
    pub fn new(api: A, sink: S) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            api,
            sink,
            inner: Mutex::new(FormInner::default()),
            loading: AtomicBool::new(false),
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<FormEvent> {
        self.events.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub async fn form(&self) -> FormState {
        self.inner.lock().await.form.clone()
    }

    pub async fn errors(&self) -> FieldErrors {
        self.inner.lock().await.errors.clone()
    }

    pub async fn set_form(&self, form: FormState) {
        self.inner.lock().await.form = form;
    }

    pub async fn set_requisites(&self, requisites: impl Into<String>) {
        self.inner.lock().await.form.requisites = requisites.into();
    }

    pub async fn set_cards_count(&self, cards_count: i64) {
        self.inner.lock().await.form.cards_count = cards_count;
    }

    pub async fn set_email(&self, email: impl Into<String>) {
        self.inner.lock().await.form.email = email.into();
    }

    fn notify(&self, notification: Notification) {
        let _ = self.events.send(FormEvent::Notification(notification));
    }

    /// Validates the current form and, if it is valid, requests and saves the document.
    ///
    /// Every outcome is also announced as a [`FormEvent::Notification`].
    pub async fn submit(&self) -> SubmissionOutcome {
        let (form, errors) = {
            let mut guard = self.inner.lock().await;
            guard.errors = validate(&guard.form);
            (guard.form.clone(), guard.errors.clone())
        };
        let _ = self.events.send(FormEvent::ErrorsChanged(errors.clone()));

        if !errors.is_empty() {
            info!(invalid_fields = errors.iter().count(), "form has validation errors");
            return self.finish(SubmissionOutcome::Failure(SubmitError::Validation(errors)));
        }

        let Some(_loading) = LoadingGuard::acquire(&self.loading, &self.events) else {
            warn!("submit ignored: previous request still in flight");
            return self.finish(SubmissionOutcome::Failure(SubmitError::Busy));
        };

        let outcome = match self.download(&form).await {
            Ok(file) => SubmissionOutcome::Success(file),
            Err(err) => {
                error!(code = ?err.code(), "invoice request failed: {err}");
                SubmissionOutcome::Failure(err)
            }
        };
        self.finish(outcome)
    }

    fn finish(&self, outcome: SubmissionOutcome) -> SubmissionOutcome {
        self.notify(outcome.notification());
        outcome
    }

    async fn download(&self, form: &FormState) -> Result<DownloadedFile, SubmitError> {
        let document = self
            .api
            .request_invoice(&InvoiceRequest::from(form))
            .await?;
        let path = self.sink.save(&document.filename, &document.bytes).await?;
        Ok(DownloadedFile {
            filename: document.filename,
            path,
            size_bytes: document.bytes.len(),
        })
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
