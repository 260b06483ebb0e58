//! Backend commands queued from UI to backend worker.

use shared::form::FormState;

pub enum BackendCommand {
    Submit { form: FormState },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Submit { .. } => "submit",
        }
    }
}
