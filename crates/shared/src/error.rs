use std::path::PathBuf;

use thiserror::Error;

use crate::form::FieldErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Validation,
    Busy,
    Http,
    Transport,
    Download,
}

/// Everything that can end a submit cycle without a downloaded document.
#[derive(Debug, Clone, Error)]
pub enum SubmitError {
    #[error("form has {} invalid field(s)", .0.iter().count())]
    Validation(FieldErrors),
    #[error("a submission is already in progress")]
    Busy,
    #[error("{body}")]
    Http { status: u16, body: String },
    #[error("{0}")]
    Transport(String),
    #[error("failed to save '{}': {message}", .path.display())]
    Download { path: PathBuf, message: String },
}

impl SubmitError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SubmitError::Validation(_) => ErrorCode::Validation,
            SubmitError::Busy => ErrorCode::Busy,
            SubmitError::Http { .. } => ErrorCode::Http,
            SubmitError::Transport(_) => ErrorCode::Transport,
            SubmitError::Download { .. } => ErrorCode::Download,
        }
    }

    pub fn download(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        SubmitError::Download {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            SubmitError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
